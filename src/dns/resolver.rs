use hickory_resolver::TokioResolver;

use crate::error::ScanError;

/// Get a DNS resolver built from the system configuration
pub fn get_resolver() -> Result<TokioResolver, ScanError> {
    match TokioResolver::builder_tokio() {
        Ok(builder) => Ok(builder.build()),
        Err(e) => Err(ScanError::Resolver(format!(
            "failed to read system DNS configuration: {}",
            e
        ))),
    }
}
