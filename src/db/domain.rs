use serde::Deserialize;

use crate::config::db::SUBDOMAINS_JSON;
use crate::error::ScanError;

/// Bundled subdomain label lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubdomainLists {
    pub common: Vec<String>,
    pub additional: Vec<String>,
}

/// Get the bundled subdomain wordlists
pub fn get_subdomain_wordlists() -> Result<SubdomainLists, ScanError> {
    serde_json::from_str(SUBDOMAINS_JSON)
        .map_err(|e| ScanError::Wordlist(format!("invalid subdomains.json: {}", e)))
}
