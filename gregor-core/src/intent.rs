//! Fire-and-forget intents emitted to downstream subsystems.

use std::collections::BTreeSet;

use gregor_types::{OutOfBandMessage, Reachability};
use serde::Serialize;

use crate::FolderRef;

/// Which team banner the user has acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    /// The chat introduction banner.
    Chat,
    /// The subteams introduction banner.
    Subteams,
}

/// Exploding-message duration set for one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplodingMode {
    /// Conversation the mode applies to.
    pub conversation_id: String,
    /// Message lifetime in seconds.
    pub seconds: i64,
}

/// An instruction for a downstream subsystem.
///
/// Intents carry complete replacement values; receivers overwrite, never
/// merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Reload the favorites/folder list.
    RefreshFavorites,
    /// A team banner was acknowledged.
    SetTeamBannerSeen {
        /// Which banner.
        banner: BannerKind,
    },
    /// Replace the set of teams with chosen channels.
    SetChosenChannels {
        /// Team names.
        teams: BTreeSet<String>,
    },
    /// Replace every conversation's exploding mode. Empty clears them all.
    UpdateExplodingModes {
        /// Complete list of modes.
        modes: Vec<ExplodingMode>,
    },
    /// Whether exploding messages should be badged as new.
    SetExplodingNew {
        /// `true` when the user has not acknowledged them recently.
        new: bool,
    },
    /// Forward git notifications verbatim.
    HandleGitMessages {
        /// The git-tagged messages of one push.
        messages: Vec<OutOfBandMessage>,
    },
    /// A folder was created remotely.
    MarkFolderCreated {
        /// The resolved folder.
        folder: FolderRef,
    },
    /// Overwrite the reachability value.
    UpdateReachability {
        /// New value.
        reachability: Reachability,
    },
}

impl Intent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RefreshFavorites => "refresh_favorites",
            Self::SetTeamBannerSeen { .. } => "set_team_banner_seen",
            Self::SetChosenChannels { .. } => "set_chosen_channels",
            Self::UpdateExplodingModes { .. } => "update_exploding_modes",
            Self::SetExplodingNew { .. } => "set_exploding_new",
            Self::HandleGitMessages { .. } => "handle_git_messages",
            Self::MarkFolderCreated { .. } => "mark_folder_created",
            Self::UpdateReachability { .. } => "update_reachability",
        }
    }
}
