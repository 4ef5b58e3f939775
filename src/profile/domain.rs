use crate::candidate::Candidate;
use crate::db::Wordlists;
use crate::error::ScanError;

use super::CandidateAccumulator;

/// Which subdomain labels to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSet {
    Standard,
    /// Standard labels plus the additional list
    Extensive,
    /// User-supplied labels, used instead of the bundled lists
    Custom(Vec<String>),
}

/// Subdomain discovery profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProfile {
    pub labels: LabelSet,
}

impl DomainProfile {
    pub fn new(labels: LabelSet) -> Self {
        Self { labels }
    }
}

/// Normalize a domain label by trimming dots and converting to lowercase.
pub fn normalize_label(s: &str) -> String {
    s.trim().trim_matches('.').to_ascii_lowercase()
}

/// Every dot-separated part must be non-empty and must not start or end with `-`.
fn is_valid_label(label: &str) -> bool {
    label.split('.').all(|part| {
        !part.is_empty()
            && !part.starts_with('-')
            && !part.ends_with('-')
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

pub(super) fn expand(
    profile: &DomainProfile,
    wordlists: &Wordlists,
    acc: &mut CandidateAccumulator,
) -> Result<(), ScanError> {
    let lists = &wordlists.subdomains;
    let raw: Vec<&String> = match &profile.labels {
        LabelSet::Standard => lists.common.iter().collect(),
        LabelSet::Extensive => lists.common.iter().chain(lists.additional.iter()).collect(),
        LabelSet::Custom(entries) => entries.iter().collect(),
    };
    for entry in raw {
        let label = normalize_label(entry);
        if label.is_empty() {
            continue;
        }
        if !is_valid_label(&label) {
            return Err(ScanError::invalid_profile(format!(
                "invalid subdomain label '{}'",
                entry.trim()
            )));
        }
        acc.push(Candidate::Label(label));
    }
    Ok(())
}
