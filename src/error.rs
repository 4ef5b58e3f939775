use thiserror::Error;

/// Errors surfaced by the library before or around a scan.
///
/// Per-candidate failures never show up here; they are folded into the
/// report as `Outcome::Error`.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The profile could not be expanded into candidates.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    /// The scan target is empty or unusable for the chosen probe.
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    /// A bundled or user-supplied wordlist could not be read.
    #[error("wordlist error: {0}")]
    Wordlist(String),
    /// The system DNS resolver could not be configured.
    #[error("resolver error: {0}")]
    Resolver(String),
    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    HttpClient(String),
    #[error("home directory not found")]
    UserDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScanError {
    pub(crate) fn invalid_profile<S: Into<String>>(msg: S) -> Self {
        ScanError::InvalidProfile(msg.into())
    }
}
