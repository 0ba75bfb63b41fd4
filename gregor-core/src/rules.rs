//! Category and system matching rules.
//!
//! Every routing decision in this crate goes through a [`MatchRule`] so the
//! full routing table can be read off [`crate::CATALOG`] and
//! [`crate::oobm`] in one place.

use std::fmt;

/// Category of items announcing a folder change.
pub const TLF_CATEGORY: &str = "tlf";
/// Category set once the user dismissed the chat banner.
pub const SAW_CHAT_BANNER_CATEGORY: &str = "sawChatBanner";
/// Category set once the user dismissed the subteams banner.
pub const SAW_SUBTEAMS_BANNER_CATEGORY: &str = "sawSubteamsBanner";
/// Category holding the JSON list of teams with chosen channels.
pub const CHOSEN_CHANNELS_CATEGORY: &str = "chosenChannelsForTeam";
/// Prefix of per-conversation exploding-mode categories.
pub const EXPLODING_MODE_PREFIX: &str = "exploding:";
/// Category holding the time exploding messages were first acknowledged.
pub const SEEN_EXPLODING_CATEGORY: &str = "chat.seenExplodingMessages";

/// OOBM system for git notifications.
pub const GIT_SYSTEM: &str = "git";
/// OOBM system for favorites notifications.
pub const FAVORITES_SYSTEM: &str = "kbfs.favorites";

/// How a category or system tag is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The key must equal the pattern.
    Exact(&'static str),
    /// The key must start with the pattern.
    Prefix(&'static str),
}

impl MatchRule {
    /// Whether `key` satisfies this rule.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Exact(pattern) => key == *pattern,
            Self::Prefix(pattern) => key.starts_with(pattern),
        }
    }

    /// The part of `key` after the pattern, or `None` if it does not match.
    ///
    /// Exact matches leave an empty remainder.
    pub fn remainder<'a>(&self, key: &'a str) -> Option<&'a str> {
        match self {
            Self::Exact(pattern) => (key == *pattern).then_some(""),
            Self::Prefix(pattern) => key.strip_prefix(pattern),
        }
    }

    /// The literal pattern.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Exact(pattern) | Self::Prefix(pattern) => pattern,
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(pattern) => write!(f, "{}", pattern),
            Self::Prefix(pattern) => write!(f, "{}*", pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_rule_matches_only_equal_keys() {
        let rule = MatchRule::Exact(TLF_CATEGORY);
        assert!(rule.matches("tlf"));
        assert!(!rule.matches("tlf2"));
        assert!(!rule.matches("TLF"));
        assert_eq!(rule.remainder("tlf"), Some(""));
        assert_eq!(rule.remainder("tlfx"), None);
    }

    #[test]
    fn prefix_rule_yields_remainder() {
        let rule = MatchRule::Prefix(EXPLODING_MODE_PREFIX);
        assert!(rule.matches("exploding:ABC123"));
        assert!(rule.matches("exploding:"));
        assert!(!rule.matches("explodingABC"));
        assert_eq!(rule.remainder("exploding:ABC123"), Some("ABC123"));
    }

    #[test]
    fn display_marks_prefixes() {
        assert_eq!(MatchRule::Exact("git").to_string(), "git");
        assert_eq!(MatchRule::Prefix("exploding:").to_string(), "exploding:*");
        assert_eq!(MatchRule::Prefix("exploding:").pattern(), "exploding:");
    }
}
