//! The category handler catalog.
//!
//! Each [`Handler`] pairs a [`MatchRule`] with an action. [`route_items`]
//! evaluates every entry of [`CATALOG`] over one normalized snapshot, in
//! table order. Handlers never see each other's output and each degrades to
//! a safe default on malformed input, so one bad item cannot take down its
//! siblings or the rest of the push.
//!
//! Chosen channels and exploding modes are recomputed from scratch on every
//! push: the intent carries the complete replacement value.

use std::collections::BTreeSet;

use gregor_types::GregorItem;

use crate::error::parse_decimal;
use crate::rules::{
    CHOSEN_CHANNELS_CATEGORY, EXPLODING_MODE_PREFIX, SAW_CHAT_BANNER_CATEGORY,
    SAW_SUBTEAMS_BANNER_CATEGORY, SEEN_EXPLODING_CATEGORY, TLF_CATEGORY,
};
use crate::{BannerKind, ExplodingMode, Intent, MatchRule, ParseError, Platform, SeenMessages};

/// Default age after which an exploding-messages acknowledgement goes stale
/// and the feature is badged as new again (3 days).
pub const DEFAULT_NEW_EXPLODING_THRESHOLD_MS: i64 = 3 * 24 * 60 * 60 * 1000;

/// Mutable state and facts shared by the handlers of one push.
#[derive(Debug)]
pub struct HandlerContext<'a> {
    /// Seen-message map, written only by the TLF handler.
    pub seen: &'a mut SeenMessages,
    /// Runtime the router serves.
    pub platform: Platform,
    /// Wall-clock time of the push, epoch milliseconds.
    pub now_ms: i64,
    /// Staleness threshold for the exploding acknowledgement.
    pub new_exploding_threshold_ms: i64,
    /// Output: TLF ids seen for the first time in this push.
    pub new_tlf: usize,
}

impl<'a> HandlerContext<'a> {
    /// Context with the default threshold and desktop platform.
    pub fn new(seen: &'a mut SeenMessages, now_ms: i64) -> Self {
        Self {
            seen,
            platform: Platform::Desktop,
            now_ms,
            new_exploding_threshold_ms: DEFAULT_NEW_EXPLODING_THRESHOLD_MS,
            new_tlf: 0,
        }
    }
}

/// Signature of a handler action.
pub type HandlerFn = fn(&[&GregorItem], &mut HandlerContext<'_>) -> Vec<Intent>;

/// One routing table entry.
pub struct Handler {
    /// Name for logs.
    pub name: &'static str,
    /// Which items the handler receives.
    pub rule: MatchRule,
    /// The action, run once per push over the selected items.
    pub run: HandlerFn,
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

/// Every category handler, in evaluation order.
pub static CATALOG: &[Handler] = &[
    Handler {
        name: "tlf_update",
        rule: MatchRule::Exact(TLF_CATEGORY),
        run: handle_tlf_update,
    },
    Handler {
        name: "chat_banner_seen",
        rule: MatchRule::Exact(SAW_CHAT_BANNER_CATEGORY),
        run: handle_chat_banner,
    },
    Handler {
        name: "subteams_banner_seen",
        rule: MatchRule::Exact(SAW_SUBTEAMS_BANNER_CATEGORY),
        run: handle_subteams_banner,
    },
    Handler {
        name: "chosen_channels",
        rule: MatchRule::Exact(CHOSEN_CHANNELS_CATEGORY),
        run: handle_chosen_channels,
    },
    Handler {
        name: "exploding_modes",
        rule: MatchRule::Prefix(EXPLODING_MODE_PREFIX),
        run: handle_exploding_modes,
    },
    Handler {
        name: "exploding_seen_flag",
        rule: MatchRule::Exact(SEEN_EXPLODING_CATEGORY),
        run: handle_exploding_seen,
    },
];

/// Run the whole catalog over one snapshot's items.
pub fn route_items(items: &[GregorItem], ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    let mut intents = Vec::new();
    for handler in CATALOG {
        let selected: Vec<&GregorItem> = items
            .iter()
            .filter(|item| handler.rule.matches(item.category()))
            .collect();
        let produced = (handler.run)(&selected, ctx);
        tracing::debug!(
            "Handler {} ({}) matched {} items, emitted {} intents",
            handler.name,
            handler.rule,
            selected.len(),
            produced.len()
        );
        intents.extend(produced);
    }
    intents
}

fn handle_tlf_update(items: &[&GregorItem], ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    let fresh = ctx.seen.mark_seen(items.iter().map(|item| &item.md.msg_id));
    ctx.new_tlf += fresh;
    if fresh == 0 {
        return Vec::new();
    }
    // No folder list to refresh on mobile.
    if !ctx.platform.has_favorites_surface() {
        tracing::debug!("Skipping favorites refresh for {} new tlf items", fresh);
        return Vec::new();
    }
    vec![Intent::RefreshFavorites]
}

fn handle_chat_banner(items: &[&GregorItem], _ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    banner_seen(items, BannerKind::Chat)
}

fn handle_subteams_banner(items: &[&GregorItem], _ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    banner_seen(items, BannerKind::Subteams)
}

fn banner_seen(items: &[&GregorItem], banner: BannerKind) -> Vec<Intent> {
    if items.is_empty() {
        Vec::new()
    } else {
        vec![Intent::SetTeamBannerSeen { banner }]
    }
}

fn handle_chosen_channels(items: &[&GregorItem], _ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    let teams = match items.first() {
        Some(item) => parse_chosen_channels(&item.item.body).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed chosen channels body: {}", e);
            BTreeSet::new()
        }),
        None => BTreeSet::new(),
    };
    vec![Intent::SetChosenChannels { teams }]
}

/// Parse a chosen-channels body: a JSON array of team names.
///
/// An empty body is an empty set. Anything else that is not an array of
/// strings is an error, so callers never see a partial set.
pub fn parse_chosen_channels(body: &[u8]) -> Result<BTreeSet<String>, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeSet::new());
    }
    let teams: Vec<String> = serde_json::from_slice(body).map_err(ParseError::json)?;
    Ok(teams.into_iter().collect())
}

fn handle_exploding_modes(items: &[&GregorItem], _ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    if items.is_empty() {
        return vec![Intent::UpdateExplodingModes { modes: Vec::new() }];
    }
    tracing::info!("Got push state with {} exploding modes", items.len());

    let modes = items
        .iter()
        .filter_map(|item| match parse_exploding_mode(item) {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::warn!(
                    "Got dirty exploding mode for category {}: {}",
                    item.category(),
                    e
                );
                None
            }
        })
        .collect();
    vec![Intent::UpdateExplodingModes { modes }]
}

/// Parse one `exploding:<conversation>` item with a seconds body.
pub fn parse_exploding_mode(item: &GregorItem) -> Result<ExplodingMode, ParseError> {
    let conversation_id = MatchRule::Prefix(EXPLODING_MODE_PREFIX)
        .remainder(item.category())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ParseError::InvalidCategory(item.category().to_string()))?;
    let seconds = parse_decimal::<i64>(&item.item.body)?;
    Ok(ExplodingMode {
        conversation_id: conversation_id.to_string(),
        seconds,
    })
}

fn handle_exploding_seen(items: &[&GregorItem], ctx: &mut HandlerContext<'_>) -> Vec<Intent> {
    let new = is_exploding_new(
        items.first().copied(),
        ctx.now_ms,
        ctx.new_exploding_threshold_ms,
    );
    vec![Intent::SetExplodingNew { new }]
}

/// Whether exploding messages count as new.
///
/// New unless the acknowledgement item holds an epoch-millisecond time no
/// older than `threshold_ms`.
pub fn is_exploding_new(item: Option<&GregorItem>, now_ms: i64, threshold_ms: i64) -> bool {
    let Some(item) = item else {
        return true;
    };
    match parse_decimal::<i64>(&item.item.body) {
        Ok(when) => now_ms.saturating_sub(when) > threshold_ms,
        Err(e) => {
            tracing::warn!("Unreadable exploding acknowledgement time: {}", e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn route(items: &[GregorItem], seen: &mut SeenMessages) -> Vec<Intent> {
        let mut ctx = HandlerContext::new(seen, NOW);
        route_items(items, &mut ctx)
    }

    fn of_kind<'a>(intents: &'a [Intent], kind: &str) -> Vec<&'a Intent> {
        intents.iter().filter(|i| i.kind() == kind).collect()
    }

    // ===========================================
    // Catalog Tests
    // ===========================================

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|h| h.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn empty_push_emits_replacement_defaults() {
        let mut seen = SeenMessages::new();
        let intents = route(&[], &mut seen);
        assert_eq!(
            intents,
            vec![
                Intent::SetChosenChannels {
                    teams: BTreeSet::new()
                },
                Intent::UpdateExplodingModes { modes: vec![] },
                Intent::SetExplodingNew { new: true },
            ]
        );
    }

    #[test]
    fn unknown_categories_are_ignored() {
        let mut seen = SeenMessages::new();
        let intents = route(&[GregorItem::new("somethingElse", "1")], &mut seen);
        assert_eq!(intents.len(), 3);
        assert!(of_kind(&intents, "refresh_favorites").is_empty());
    }

    // ===========================================
    // TLF Tests
    // ===========================================

    #[test]
    fn new_tlf_item_refreshes_favorites_once() {
        let mut seen = SeenMessages::new();
        let items = vec![GregorItem::new("tlf", "")];

        let first = route(&items, &mut seen);
        assert_eq!(of_kind(&first, "refresh_favorites").len(), 1);
        assert!(seen.is_seen(&items[0].md.msg_id));

        let second = route(&items, &mut seen);
        assert!(of_kind(&second, "refresh_favorites").is_empty());
    }

    #[test]
    fn several_new_tlf_items_refresh_once() {
        let mut seen = SeenMessages::new();
        let items = vec![GregorItem::new("tlf", ""), GregorItem::new("tlf", "")];
        let mut ctx = HandlerContext::new(&mut seen, NOW);
        let intents = route_items(&items, &mut ctx);
        assert_eq!(ctx.new_tlf, 2);
        assert_eq!(of_kind(&intents, "refresh_favorites").len(), 1);
    }

    #[test]
    fn already_seen_tlf_item_is_silent() {
        let item = GregorItem::new("tlf", "");
        let mut seen = SeenMessages::from_encoded([item.md.msg_id.encoded()]);
        let intents = route(&[item], &mut seen);
        assert!(of_kind(&intents, "refresh_favorites").is_empty());
    }

    #[test]
    fn mobile_marks_seen_without_refresh() {
        let mut seen = SeenMessages::new();
        let items = vec![GregorItem::new("tlf", "")];
        let mut ctx = HandlerContext::new(&mut seen, NOW);
        ctx.platform = Platform::Mobile;
        let intents = route_items(&items, &mut ctx);
        assert_eq!(ctx.new_tlf, 1);
        assert!(of_kind(&intents, "refresh_favorites").is_empty());
        assert!(seen.is_seen(&items[0].md.msg_id));
    }

    #[test]
    fn non_tlf_items_are_never_marked_seen() {
        let mut seen = SeenMessages::new();
        route(&[GregorItem::new("sawChatBanner", "")], &mut seen);
        assert!(seen.is_empty());
    }

    // ===========================================
    // Banner Tests
    // ===========================================

    #[test]
    fn banners_acknowledged_when_present() {
        let mut seen = SeenMessages::new();
        let intents = route(
            &[
                GregorItem::new("sawChatBanner", ""),
                GregorItem::new("sawSubteamsBanner", ""),
            ],
            &mut seen,
        );
        let banners = of_kind(&intents, "set_team_banner_seen");
        assert_eq!(
            banners,
            vec![
                &Intent::SetTeamBannerSeen {
                    banner: BannerKind::Chat
                },
                &Intent::SetTeamBannerSeen {
                    banner: BannerKind::Subteams
                },
            ]
        );
    }

    // ===========================================
    // Chosen Channels Tests
    // ===========================================

    #[test]
    fn chosen_channels_parses_team_set() {
        let mut seen = SeenMessages::new();
        let intents = route(
            &[GregorItem::new(
                "chosenChannelsForTeam",
                r#"["team1","team2","team1"]"#,
            )],
            &mut seen,
        );
        let expected: BTreeSet<String> = ["team1", "team2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            of_kind(&intents, "set_chosen_channels"),
            vec![&Intent::SetChosenChannels { teams: expected }]
        );
    }

    #[test]
    fn malformed_chosen_channels_is_empty_set() {
        for body in [r#"["team1", 2]"#, "not json", r#"{"team1": true}"#, "   "] {
            assert_eq!(
                parse_chosen_channels(body.as_bytes()).unwrap_or_default(),
                BTreeSet::new(),
                "body {:?}",
                body
            );
        }
        let mut seen = SeenMessages::new();
        let intents = route(&[GregorItem::new("chosenChannelsForTeam", "[oops")], &mut seen);
        assert_eq!(
            of_kind(&intents, "set_chosen_channels"),
            vec![&Intent::SetChosenChannels {
                teams: BTreeSet::new()
            }]
        );
    }

    // ===========================================
    // Exploding Mode Tests
    // ===========================================

    #[test]
    fn exploding_mode_parses_conversation_and_seconds() {
        let item = GregorItem::new("exploding:ABC123", "300");
        assert_eq!(
            parse_exploding_mode(&item),
            Ok(ExplodingMode {
                conversation_id: "ABC123".into(),
                seconds: 300,
            })
        );
    }

    #[test]
    fn dirty_exploding_mode_skips_only_that_entry() {
        let mut seen = SeenMessages::new();
        let intents = route(
            &[
                GregorItem::new("exploding:ABC123", "300"),
                GregorItem::new("exploding:BAD", "notanumber"),
                GregorItem::new("exploding:", "60"),
                GregorItem::new("exploding:DEF456", "86400"),
            ],
            &mut seen,
        );
        assert_eq!(
            of_kind(&intents, "update_exploding_modes"),
            vec![&Intent::UpdateExplodingModes {
                modes: vec![
                    ExplodingMode {
                        conversation_id: "ABC123".into(),
                        seconds: 300
                    },
                    ExplodingMode {
                        conversation_id: "DEF456".into(),
                        seconds: 86400
                    },
                ]
            }]
        );
    }

    #[test]
    fn no_exploding_items_clears_modes() {
        let mut seen = SeenMessages::new();
        let intents = route(&[GregorItem::new("tlf", "")], &mut seen);
        assert_eq!(
            of_kind(&intents, "update_exploding_modes"),
            vec![&Intent::UpdateExplodingModes { modes: vec![] }]
        );
    }

    // ===========================================
    // Exploding Seen Flag Tests
    // ===========================================

    #[test]
    fn absent_acknowledgement_is_new() {
        assert!(is_exploding_new(None, NOW, 5_000));
    }

    #[test]
    fn recent_acknowledgement_is_not_new() {
        let item = GregorItem::new(SEEN_EXPLODING_CATEGORY, (NOW - 1000).to_string());
        assert!(!is_exploding_new(Some(&item), NOW, 5_000));
    }

    #[test]
    fn stale_acknowledgement_is_new() {
        let item = GregorItem::new(SEEN_EXPLODING_CATEGORY, (NOW - 10_000).to_string());
        assert!(is_exploding_new(Some(&item), NOW, 5_000));
    }

    #[test]
    fn unparseable_acknowledgement_is_new() {
        let item = GregorItem::new(SEEN_EXPLODING_CATEGORY, "yesterday");
        assert!(is_exploding_new(Some(&item), NOW, 5_000));
    }

    #[test]
    fn seen_flag_uses_context_threshold() {
        let mut seen = SeenMessages::new();
        let items = vec![GregorItem::new(
            SEEN_EXPLODING_CATEGORY,
            (NOW - 1000).to_string(),
        )];
        let intents = route(&items, &mut seen);
        assert_eq!(
            of_kind(&intents, "set_exploding_new"),
            vec![&Intent::SetExplodingNew { new: false }]
        );

        let mut ctx = HandlerContext::new(&mut seen, NOW);
        ctx.new_exploding_threshold_ms = 500;
        let intents = route_items(&items, &mut ctx);
        assert_eq!(
            of_kind(&intents, "set_exploding_new"),
            vec![&Intent::SetExplodingNew { new: true }]
        );
    }
}
