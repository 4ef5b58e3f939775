use std::collections::BTreeMap;

use crate::config;
use crate::error::ScanError;

/// Get the port list of the "quick" scan type
pub fn get_quick_ports() -> Result<Vec<u16>, ScanError> {
    serde_json::from_str(config::db::QUICK_PORTS_JSON)
        .map_err(|e| ScanError::Wordlist(format!("invalid quick-ports.json: {}", e)))
}

/// Get the top port list, most common first
pub fn get_top_ports() -> Result<Vec<u16>, ScanError> {
    serde_json::from_str(config::db::TOP_PORTS_JSON)
        .map_err(|e| ScanError::Wordlist(format!("invalid top-ports.json: {}", e)))
}

/// Get the service name table of well-known ports
pub fn get_port_services() -> Result<BTreeMap<u16, String>, ScanError> {
    serde_json::from_str(config::db::PORT_SERVICES_JSON)
        .map_err(|e| ScanError::Wordlist(format!("invalid port-services.json: {}", e)))
}
