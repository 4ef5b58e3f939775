use serde::Deserialize;

use crate::config;
use crate::error::ScanError;

/// Bundled web path tiers. Each tier only holds what it adds to the
/// previous one; `medium` is common + medium, `extensive` is all three.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebPathLists {
    pub common: Vec<String>,
    pub medium: Vec<String>,
    pub extensive: Vec<String>,
}

/// Get the bundled web path wordlists
pub fn get_web_paths() -> Result<WebPathLists, ScanError> {
    serde_json::from_str(config::db::WEB_PATHS_JSON)
        .map_err(|e| ScanError::Wordlist(format!("invalid web-paths.json: {}", e)))
}
