//! Settings from the TOML config file and the session credential from `.env`.
//!
//! ```toml
//! interested_topics = ["Array", "Hash Table", "Two Pointers"]
//! ```

use crate::libshinchoku::error::Result;
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const SESSION_TOKEN_VAR: &str = "LEETCODE_SESSION";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default, alias = "Interested Topics")]
    pub interested_topics: BTreeSet<String>,
}

impl Settings {
    /// A missing file yields empty settings, a malformed one is an error.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            warn!(
                "[Config] {:?} not found, no topics of interest are configured.",
                path
            );
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        info!(
            "[Config] Loaded {} topics of interest from {:?}",
            settings.interested_topics.len(),
            path
        );
        Ok(settings)
    }
}

/// Reads `LEETCODE_SESSION` from `.env` in the working directory, falling back
/// to the process environment. Blank values count as missing.
pub fn session_token() -> Option<String> {
    if dotenv::dotenv().is_err() {
        info!("[Config] No .env file found, using the process environment.");
    }
    dotenv::var(SESSION_TOKEN_VAR)
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
