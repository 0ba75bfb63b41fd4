//! Configuration and seen-map files for gregor-cli.

use anyhow::{Context, Result};
use gregor_core::SeenMessages;
use gregor_router::{Config, RouterConfig};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "gregor.toml";

/// Load the router configuration.
///
/// Uses `explicit` if given, else `gregor.toml` in the user config
/// directory if it exists, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<RouterConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            let config = Config::from_file(&path)?;
            Ok(config.router)
        }
        None => Ok(RouterConfig::default()),
    }
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "gregor", "gregor-cli")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load a seen-message file (JSON array of encoded ids). Missing is empty.
pub async fn load_seen(path: &Path) -> Result<SeenMessages> {
    if !path.exists() {
        return Ok(SeenMessages::new());
    }
    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read seen-message file")?;
    let ids: Vec<String> =
        serde_json::from_str(&contents).context("Invalid seen-message file")?;
    Ok(SeenMessages::from_encoded(ids))
}

/// Save a seen-message map as a JSON array of encoded ids.
pub async fn save_seen(path: &Path, seen: &SeenMessages) -> Result<()> {
    let contents = serde_json::to_string_pretty(&seen.export())?;
    tokio::fs::write(path, contents)
        .await
        .context("Failed to save seen-message file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_seen_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let seen = load_seen(&dir.path().join("seen.json")).await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn seen_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen.json");
        let seen = SeenMessages::from_encoded(["AQID", "BAUG"]);

        save_seen(&path, &seen).await.unwrap();
        let loaded = load_seen(&path).await.unwrap();

        assert_eq!(loaded.export(), vec!["AQID".to_string(), "BAUG".to_string()]);
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gregor.toml");
        std::fs::write(&path, "[router]\nplatform = \"mobile\"\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.platform, gregor_core::Platform::Mobile);
    }

    #[test]
    fn explicit_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
