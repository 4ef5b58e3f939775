use crate::candidate::Candidate;
use crate::db::Wordlists;
use crate::error::ScanError;

use super::CandidateAccumulator;

/// Which path wordlist to start from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathWordlist {
    Common,
    Medium,
    Extensive,
    /// User-supplied entries, used instead of the bundled tiers
    Custom(Vec<String>),
}

/// Hidden-path discovery profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathProfile {
    pub wordlist: PathWordlist,
    /// Extensions tried on every path that has none, e.g. `["php", "html"]`
    pub extensions: Vec<String>,
}

impl PathProfile {
    pub fn new(wordlist: PathWordlist) -> Self {
        Self {
            wordlist,
            extensions: Vec::new(),
        }
    }
    pub fn with_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = exts.into_iter().map(Into::into).collect();
        self
    }
}

/// Split a comma-separated extension list ("php, .html,js").
pub fn parse_extensions(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

fn normalize_path(raw: &str) -> Option<String> {
    let p = raw.trim();
    if p.is_empty() {
        return None;
    }
    if p.starts_with('/') {
        Some(p.to_string())
    } else {
        Some(format!("/{}", p))
    }
}

fn base_paths<'a>(wordlist: &'a PathWordlist, wordlists: &'a Wordlists) -> Vec<&'a str> {
    let tiers = &wordlists.web_paths;
    let chained: Box<dyn Iterator<Item = &'a String> + 'a> = match wordlist {
        PathWordlist::Common => Box::new(tiers.common.iter()),
        PathWordlist::Medium => Box::new(tiers.common.iter().chain(tiers.medium.iter())),
        PathWordlist::Extensive => Box::new(
            tiers
                .common
                .iter()
                .chain(tiers.medium.iter())
                .chain(tiers.extensive.iter()),
        ),
        PathWordlist::Custom(entries) => Box::new(entries.iter()),
    };
    chained.map(|s| s.as_str()).collect()
}

pub(super) fn expand(
    profile: &PathProfile,
    wordlists: &Wordlists,
    acc: &mut CandidateAccumulator,
) -> Result<(), ScanError> {
    for ext in &profile.extensions {
        if ext.is_empty() || ext.contains('/') || ext.chars().any(char::is_whitespace) {
            return Err(ScanError::invalid_profile(format!("invalid extension '{ext}'")));
        }
    }

    let paths: Vec<String> = base_paths(&profile.wordlist, wordlists)
        .into_iter()
        .filter_map(normalize_path)
        .collect();

    // Plain paths first, then the extension variants.
    for path in &paths {
        acc.push(Candidate::Path(path.clone()));
    }
    for path in &paths {
        if path.contains('.') || path.ends_with('/') {
            continue;
        }
        for ext in &profile.extensions {
            acc.push(Candidate::Path(format!("{}.{}", path, ext)));
        }
    }
    Ok(())
}
