use std::net::IpAddr;
use std::time::Duration;

use crate::error::ScanError;

pub mod resolver;

/// Resolve a scan target given as an IP address or hostname.
///
/// The first address the system resolver returns is used.
pub async fn lookup_host(host: &str, timeout: Duration) -> Result<IpAddr, ScanError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ScanError::InvalidTarget("empty target".into()));
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    match lookup_ip(host, timeout).await? {
        ips if !ips.is_empty() => Ok(ips[0]),
        _ => Err(ScanError::InvalidTarget(format!("failed to resolve host {}", host))),
    }
}

/// Perform a DNS lookup for the given hostname with a timeout.
pub async fn lookup_ip(hostname: &str, timeout: Duration) -> Result<Vec<IpAddr>, ScanError> {
    let resolver = resolver::get_resolver()?;
    match tokio::time::timeout(timeout, resolver.lookup_ip(hostname)).await {
        Ok(Ok(ips)) => Ok(ips.iter().collect()),
        Ok(Err(e)) => {
            tracing::debug!("lookup {} failed: {}", hostname, e);
            Ok(Vec::new())
        }
        Err(_) => Err(ScanError::Resolver(format!("lookup {} timed out", hostname))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ip_targets_skip_resolution() {
        let ip = lookup_host(" 127.0.0.1 ", Duration::from_millis(10)).await.unwrap();
        assert_eq!(ip, "127.0.0.1".parse::<IpAddr>().unwrap());
        assert!(matches!(
            lookup_host("", Duration::from_millis(10)).await,
            Err(ScanError::InvalidTarget(_))
        ));
    }
}
