//! Out-of-band message routing.
//!
//! OOBMs are partitioned strictly by system tag. Git messages are forwarded
//! as one batch; favorites notices announce created folders and need the
//! current identity to resolve. Every other system is ignored.

use gregor_types::OutOfBandMessage;
use serde::Deserialize;

use crate::rules::{FAVORITES_SYSTEM, GIT_SYSTEM};
use crate::{FolderRef, Intent, MatchRule, ParseError, Session};

const GIT_RULE: MatchRule = MatchRule::Exact(GIT_SYSTEM);
const FAVORITES_RULE: MatchRule = MatchRule::Exact(FAVORITES_SYSTEM);

/// Favorites notice action that announces a new folder.
pub const CREATE_ACTION: &str = "create";

/// Body of a `kbfs.favorites` message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FavoriteNotice {
    /// What happened to the folder.
    pub action: String,
    /// Folder path, when the action concerns one.
    #[serde(default)]
    pub tlf: Option<String>,
}

impl FavoriteNotice {
    /// Parse a notice body.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(body).map_err(ParseError::json)
    }
}

/// Turn one OOBM push into intents.
///
/// Matching is exact, so entries with an empty system tag go nowhere. Favorites
/// notices are dropped as a whole when `session` has no identity.
pub fn route_out_of_band(messages: &[OutOfBandMessage], session: &Session) -> Vec<Intent> {
    let mut intents = Vec::new();

    let git: Vec<OutOfBandMessage> = messages
        .iter()
        .filter(|m| GIT_RULE.matches(&m.system))
        .cloned()
        .collect();
    if !git.is_empty() {
        intents.push(Intent::HandleGitMessages { messages: git });
    }

    let favorites: Vec<&OutOfBandMessage> = messages
        .iter()
        .filter(|m| FAVORITES_RULE.matches(&m.system))
        .collect();
    intents.extend(route_favorites(&favorites, session));

    intents
}

fn route_favorites(messages: &[&OutOfBandMessage], session: &Session) -> Vec<Intent> {
    let created: Vec<FavoriteNotice> = messages
        .iter()
        .filter_map(|m| match FavoriteNotice::parse(&m.body) {
            Ok(notice) => Some(notice),
            Err(e) => {
                tracing::warn!("Skipping unreadable favorites oobm: {}", e);
                None
            }
        })
        .filter(|notice| notice.action == CREATE_ACTION)
        .collect();
    if created.is_empty() {
        return Vec::new();
    }

    let Some(username) = session.username() else {
        tracing::info!(
            "Skipping {} favorites oobms: no current user",
            created.len()
        );
        return Vec::new();
    };

    created
        .into_iter()
        .filter_map(|notice| {
            let resolved = notice
                .tlf
                .as_deref()
                .ok_or_else(|| ParseError::UnresolvableFolder(String::new()))
                .and_then(|tlf| FolderRef::from_path(username, tlf));
            match resolved {
                Ok(folder) => Some(Intent::MarkFolderCreated { folder }),
                Err(e) => {
                    tracing::warn!("Failed to parse tlf for oobm: {}", e);
                    tracing::debug!("Failed to parse tlf for oobm: {:?}", notice);
                    None
                }
            }
        })
        .collect()
}
