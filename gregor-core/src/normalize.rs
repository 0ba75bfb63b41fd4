//! Item normalization.
//!
//! Flattens a pushed [`State`] into [`GregorItem`]s, keeping a record only
//! when both its metadata and its item are present. Partial records are
//! expected now and then; they are counted and logged, never fatal.

use gregor_types::{GregorItem, RawRecord, State};

/// Result of normalizing one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Actionable items in snapshot order.
    pub items: Vec<GregorItem>,
    /// Number of raw records in the snapshot.
    pub raw: usize,
}

impl Normalized {
    /// Records dropped for missing metadata or item.
    pub fn dropped(&self) -> usize {
        self.raw.saturating_sub(self.items.len())
    }

    /// Whether any record was dropped.
    pub fn has_loss(&self) -> bool {
        self.dropped() > 0
    }
}

/// Keep the complete records of `state`.
pub fn normalize(state: State) -> Normalized {
    let raw = state.items.len();
    let items: Vec<GregorItem> = state
        .items
        .into_iter()
        .filter_map(|RawRecord { md, item }| match (md, item) {
            (Some(md), Some(item)) => Some(GregorItem { md, item }),
            _ => None,
        })
        .collect();

    let normalized = Normalized { items, raw };
    if normalized.has_loss() {
        tracing::warn!(
            "Lost {} of {} gregor items while filtering incomplete records",
            normalized.dropped(),
            raw
        );
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use gregor_types::{Item, Metadata, MsgId};

    fn md() -> Metadata {
        Metadata::new(MsgId::random())
    }

    #[test]
    fn keeps_complete_records() {
        let state = State::from_items(vec![
            GregorItem::new("tlf", "a"),
            GregorItem::new("sawChatBanner", ""),
        ]);
        let normalized = normalize(state);
        assert_eq!(normalized.items.len(), 2);
        assert_eq!(normalized.raw, 2);
        assert!(!normalized.has_loss());
    }

    #[test]
    fn drops_partial_records_and_counts_them() {
        let state = State {
            items: vec![
                RawRecord::complete(md(), Item::new("tlf", "")),
                RawRecord {
                    md: Some(md()),
                    item: None,
                },
                RawRecord {
                    md: None,
                    item: Some(Item::new("tlf", "")),
                },
                RawRecord::default(),
            ],
        };
        let normalized = normalize(state);
        assert_eq!(normalized.items.len(), 1);
        assert_eq!(normalized.raw, 4);
        assert_eq!(normalized.dropped(), 3);
        assert!(normalized.has_loss());
    }

    #[test]
    fn preserves_snapshot_order() {
        let state = State::from_items(vec![
            GregorItem::new("a", ""),
            GregorItem::new("b", ""),
            GregorItem::new("c", ""),
        ]);
        let categories: Vec<_> = normalize(state)
            .items
            .iter()
            .map(|i| i.category().to_string())
            .collect();
        assert_eq!(categories, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_state_has_no_loss() {
        let normalized = normalize(State::default());
        assert!(normalized.items.is_empty());
        assert!(!normalized.has_loss());
    }

    #[test]
    fn kept_never_exceeds_raw() {
        for missing in 0..4 {
            let mut items: Vec<RawRecord> =
                (0..4).map(|_| GregorItem::new("x", "").into()).collect();
            for record in items.iter_mut().take(missing) {
                record.item = None;
            }
            let normalized = normalize(State { items });
            assert!(normalized.items.len() <= normalized.raw);
            assert_eq!(normalized.dropped(), missing);
        }
    }
}
