use std::fmt;

use serde::Serialize;

/// One unit to probe.
///
/// Uniqueness is by canonical form: ports by number, paths by their
/// `/`-prefixed string, labels lowercase without a trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Candidate {
    Port(u16),
    Path(String),
    Label(String),
}

impl Candidate {
    /// Port number, if this is a port candidate.
    pub fn port(&self) -> Option<u16> {
        match self {
            Candidate::Port(p) => Some(*p),
            _ => None,
        }
    }
    /// URL path suffix, if this is a path candidate.
    pub fn path(&self) -> Option<&str> {
        match self {
            Candidate::Path(p) => Some(p),
            _ => None,
        }
    }
    /// Subdomain label, if this is a label candidate.
    pub fn label(&self) -> Option<&str> {
        match self {
            Candidate::Label(l) => Some(l),
            _ => None,
        }
    }
    pub fn kind(&self) -> &'static str {
        match self {
            Candidate::Port(_) => "port",
            Candidate::Path(_) => "path",
            Candidate::Label(_) => "label",
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Port(p) => write!(f, "{}", p),
            Candidate::Path(p) => f.write_str(p),
            Candidate::Label(l) => f.write_str(l),
        }
    }
}
