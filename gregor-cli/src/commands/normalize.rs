//! Normalize command - show which records of a snapshot are actionable.

use anyhow::{Context, Result};
use gregor_types::State;
use std::path::Path;

/// Run the normalize command.
pub async fn run(path: &Path) -> Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read snapshot")?;
    let state = State::from_json(&contents).context("Invalid snapshot")?;

    let normalized = gregor_core::normalize(state);
    let report = serde_json::json!({
        "raw": normalized.raw,
        "kept": normalized.items.len(),
        "dropped": normalized.dropped(),
        "items": normalized.items,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
