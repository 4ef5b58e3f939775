use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ScanError;

pub mod domain;
pub mod path;
pub mod port;

pub use domain::SubdomainLists;
pub use path::WebPathLists;

/// Static scan data handed to the candidate set builder.
#[derive(Debug, Clone, Default)]
pub struct Wordlists {
    pub quick_ports: Vec<u16>,
    pub top_ports: Vec<u16>,
    pub port_services: BTreeMap<u16, String>,
    pub web_paths: WebPathLists,
    pub subdomains: SubdomainLists,
}

impl Wordlists {
    /// Load the lists bundled into the binary.
    pub fn bundled() -> Result<Self, ScanError> {
        Ok(Self {
            quick_ports: port::get_quick_ports()?,
            top_ports: port::get_top_ports()?,
            port_services: port::get_port_services()?,
            web_paths: path::get_web_paths()?,
            subdomains: domain::get_subdomain_wordlists()?,
        })
    }
}

/// Read a user wordlist: one entry per line, blank lines and `#` comments skipped.
pub fn read_wordlist_file(path: &Path) -> Result<Vec<String>, ScanError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ScanError::Wordlist(format!("{}: {}", path.display(), e)))?;
    Ok(content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(|s| s.to_string())
        .collect())
}
