//! Resolving `/keybase/...` paths to local folder references.

use serde::Serialize;

use crate::ParseError;

const MOUNT_ROOT: &str = "/keybase/";

/// Who can see a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Readable by the listed users only.
    Private,
    /// World-readable.
    Public,
    /// Owned by a team.
    Team,
}

impl Visibility {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "private" => Some(Self::Private),
            "public" => Some(Self::Public),
            "team" => Some(Self::Team),
            _ => None,
        }
    }
}

/// A top-level folder, resolved relative to the current identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRef {
    /// Folder visibility.
    pub visibility: Visibility,
    /// TLF name, e.g. `alice,bob#charlie` or a team name.
    pub name: String,
    /// Path as announced, without a trailing slash.
    pub path: String,
    /// Users with write access. Empty for team folders.
    pub writers: Vec<String>,
    /// Read-only users. Empty for team folders.
    pub readers: Vec<String>,
    /// Whether the current identity is a writer or reader.
    pub is_own: bool,
}

impl FolderRef {
    /// Resolve `path` for `username`.
    ///
    /// Accepts `/keybase/{private,public,team}/<tlf>[/<subpath>]`.
    pub fn from_path(username: &str, path: &str) -> Result<Self, ParseError> {
        let unresolvable = || ParseError::UnresolvableFolder(path.to_string());

        let trimmed = path.trim_end_matches('/');
        let rest = trimmed.strip_prefix(MOUNT_ROOT).ok_or_else(unresolvable)?;
        let mut segments = rest.splitn(3, '/');
        let visibility = segments
            .next()
            .and_then(Visibility::from_segment)
            .ok_or_else(unresolvable)?;
        let name = segments
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(unresolvable)?;

        let (writers, readers) = match visibility {
            Visibility::Team => (Vec::new(), Vec::new()),
            Visibility::Private | Visibility::Public => split_participants(name),
        };
        let is_own = writers.iter().chain(readers.iter()).any(|u| u == username);

        Ok(Self {
            visibility,
            name: name.to_string(),
            path: trimmed.to_string(),
            writers,
            readers,
            is_own,
        })
    }
}

fn split_participants(name: &str) -> (Vec<String>, Vec<String>) {
    let (writers, readers) = match name.split_once('#') {
        Some((w, r)) => (w, r),
        None => (name, ""),
    };
    let list = |s: &str| {
        s.split(',')
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    (list(writers), list(readers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_private_folder_with_subpath() {
        let folder = FolderRef::from_path("alice", "/keybase/private/alice/docs").unwrap();
        assert_eq!(folder.visibility, Visibility::Private);
        assert_eq!(folder.name, "alice");
        assert_eq!(folder.path, "/keybase/private/alice/docs");
        assert_eq!(folder.writers, vec!["alice"]);
        assert!(folder.is_own);
    }

    #[test]
    fn splits_writers_and_readers() {
        let folder = FolderRef::from_path("carol", "/keybase/private/alice,bob#carol/").unwrap();
        assert_eq!(folder.writers, vec!["alice", "bob"]);
        assert_eq!(folder.readers, vec!["carol"]);
        assert_eq!(folder.path, "/keybase/private/alice,bob#carol");
        assert!(folder.is_own);
    }

    #[test]
    fn public_folder_of_someone_else() {
        let folder = FolderRef::from_path("alice", "/keybase/public/bob").unwrap();
        assert_eq!(folder.visibility, Visibility::Public);
        assert!(!folder.is_own);
    }

    #[test]
    fn team_folder_has_no_participants() {
        let folder = FolderRef::from_path("alice", "/keybase/team/acme.eng").unwrap();
        assert_eq!(folder.visibility, Visibility::Team);
        assert_eq!(folder.name, "acme.eng");
        assert!(folder.writers.is_empty());
        assert!(!folder.is_own);
    }

    #[test]
    fn rejects_paths_outside_the_mount() {
        for path in [
            "",
            "/keybase",
            "/keybase/",
            "/keybase/private",
            "/keybase/private/",
            "/keybase/shared/alice",
            "/home/alice",
            "keybase/private/alice",
        ] {
            assert!(
                matches!(
                    FolderRef::from_path("alice", path),
                    Err(ParseError::UnresolvableFolder(_))
                ),
                "path {:?} should not resolve",
                path
            );
        }
    }
}
