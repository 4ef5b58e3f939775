//! Candidate set builder.
//!
//! Expands a scan profile into an ordered, deduplicated list of candidates.
//! Pure and synchronous: the same profile and wordlists always give the
//! same sequence.

use std::collections::HashSet;

use serde::Serialize;

use crate::candidate::Candidate;
use crate::config::default::DEFAULT_MAX_CANDIDATES;
use crate::db::Wordlists;
use crate::error::ScanError;

pub mod domain;
pub mod path;
pub mod port;

pub use domain::{DomainProfile, LabelSet};
pub use path::{PathProfile, PathWordlist};
pub use port::PortProfile;

/// What to scan for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Port(PortProfile),
    Path(PathProfile),
    Domain(DomainProfile),
}

impl Profile {
    pub fn kind(&self) -> &'static str {
        match self {
            Profile::Port(_) => "port",
            Profile::Path(_) => "path",
            Profile::Domain(_) => "domain",
        }
    }
}

/// Output of the builder
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSet {
    /// Candidates in submission order, at most `limit` of them
    pub candidates: Vec<Candidate>,
    /// Number of unique candidates the profile expanded to before the cap
    pub requested: usize,
    /// Whether candidates were dropped by the cap
    pub truncated: bool,
    pub limit: usize,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Collects unique candidates in first-seen order up to a cap.
pub(crate) struct CandidateAccumulator {
    seen: HashSet<Candidate>,
    candidates: Vec<Candidate>,
    requested: usize,
    limit: usize,
}

impl CandidateAccumulator {
    fn new(limit: usize) -> Self {
        Self {
            seen: HashSet::new(),
            candidates: Vec::new(),
            requested: 0,
            limit,
        }
    }

    pub(crate) fn push(&mut self, candidate: Candidate) {
        if self.seen.contains(&candidate) {
            return;
        }
        self.requested += 1;
        if self.candidates.len() < self.limit {
            self.candidates.push(candidate.clone());
        }
        self.seen.insert(candidate);
    }

    fn finish(self) -> CandidateSet {
        CandidateSet {
            truncated: self.requested > self.candidates.len(),
            requested: self.requested,
            candidates: self.candidates,
            limit: self.limit,
        }
    }
}

/// Expands profiles against a set of wordlists.
pub struct CandidateSetBuilder<'a> {
    wordlists: &'a Wordlists,
    limit: usize,
}

impl<'a> CandidateSetBuilder<'a> {
    pub fn new(wordlists: &'a Wordlists) -> Self {
        Self {
            wordlists,
            limit: DEFAULT_MAX_CANDIDATES,
        }
    }

    /// Set the hard cap on the resulting set size (at least 1).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Expand a profile. Fails with `InvalidProfile` before anything is probed.
    pub fn build(&self, profile: &Profile) -> Result<CandidateSet, ScanError> {
        let mut acc = CandidateAccumulator::new(self.limit);
        match profile {
            Profile::Port(p) => port::expand(p, self.wordlists, &mut acc)?,
            Profile::Path(p) => path::expand(p, self.wordlists, &mut acc)?,
            Profile::Domain(p) => domain::expand(p, self.wordlists, &mut acc)?,
        }
        let set = acc.finish();
        if set.truncated {
            tracing::warn!(
                "{} profile expanded to {} candidates, truncated to {}",
                profile.kind(),
                set.requested,
                set.limit
            );
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wordlists() -> Wordlists {
        Wordlists::bundled().unwrap()
    }

    fn ports(set: &CandidateSet) -> Vec<u16> {
        set.candidates.iter().filter_map(|c| c.port()).collect()
    }

    fn custom(spec: &str) -> Profile {
        Profile::Port(PortProfile::Custom(spec.to_string()))
    }

    #[test]
    fn quick_profile_is_fixed_list() {
        let wl = wordlists();
        let set = CandidateSetBuilder::new(&wl)
            .build(&Profile::Port(PortProfile::Quick))
            .unwrap();
        assert_eq!(
            ports(&set),
            vec![21, 22, 23, 25, 80, 110, 143, 443, 445, 3306, 3389, 8080]
        );
        assert!(!set.truncated);
    }

    #[test]
    fn range_expands_inclusive() {
        let wl = wordlists();
        let set = CandidateSetBuilder::new(&wl).build(&custom("8000-8010")).unwrap();
        assert_eq!(set.len(), 11);
        assert_eq!(ports(&set).first(), Some(&8000));
        assert_eq!(ports(&set).last(), Some(&8010));
    }

    #[test]
    fn union_dedups_keeping_first_occurrence() {
        let wl = wordlists();
        let set = CandidateSetBuilder::new(&wl)
            .build(&custom("8080, 22, 21-23, quick"))
            .unwrap();
        let got = ports(&set);
        assert_eq!(&got[..4], &[8080, 22, 21, 23]);
        assert_eq!(got.iter().filter(|p| **p == 22).count(), 1);
        assert_eq!(got.len(), 12);
    }

    #[test]
    fn build_is_deterministic() {
        let wl = wordlists();
        let builder = CandidateSetBuilder::new(&wl);
        let profiles = [
            custom("quick,1000-1100,top-20"),
            Profile::Path(
                PathProfile::new(PathWordlist::Extensive).with_extensions(["php", "txt"]),
            ),
            Profile::Domain(DomainProfile::new(LabelSet::Extensive)),
        ];
        for profile in &profiles {
            let a = builder.build(profile).unwrap();
            let b = builder.build(profile).unwrap();
            assert_eq!(a.candidates, b.candidates);
        }
    }

    #[test]
    fn cap_truncates_and_reports() {
        let wl = wordlists();
        let set = CandidateSetBuilder::new(&wl).build(&custom("1-2000")).unwrap();
        assert!(set.truncated);
        assert_eq!(set.len(), 1024);
        assert_eq!(set.requested, 2000);
        assert_eq!(ports(&set).last(), Some(&1024));
    }

    #[test]
    fn malformed_specs_are_invalid_profile() {
        let wl = wordlists();
        let builder = CandidateSetBuilder::new(&wl);
        for spec in ["", " , ", "80-", "abc", "0", "10-5", "70000", "1-70000", "top-x"] {
            match builder.build(&custom(spec)) {
                Err(ScanError::InvalidProfile(_)) => {}
                other => panic!("spec {spec:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn paths_get_extension_variants() {
        let wl = Wordlists {
            web_paths: crate::db::WebPathLists {
                common: vec!["/admin".into(), "backup/".into(), "/robots.txt".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        let profile =
            Profile::Path(PathProfile::new(PathWordlist::Common).with_extensions(["php", "html"]));
        let set = CandidateSetBuilder::new(&wl).build(&profile).unwrap();
        let paths: Vec<&str> = set.candidates.iter().filter_map(|c| c.path()).collect();
        assert_eq!(
            paths,
            vec!["/admin", "/backup/", "/robots.txt", "/admin.php", "/admin.html"]
        );
    }

    #[test]
    fn bad_extension_is_invalid_profile() {
        let wl = wordlists();
        let profile =
            Profile::Path(PathProfile::new(PathWordlist::Common).with_extensions(["ph p"]));
        assert!(matches!(
            CandidateSetBuilder::new(&wl).build(&profile),
            Err(ScanError::InvalidProfile(_))
        ));
    }

    #[test]
    fn extension_list_parsing() {
        assert_eq!(
            path::parse_extensions("php, .html,,js "),
            vec!["php", "html", "js"]
        );
    }

    #[test]
    fn labels_are_normalized_and_validated() {
        let wl = wordlists();
        let builder = CandidateSetBuilder::new(&wl);
        let profile = Profile::Domain(DomainProfile::new(LabelSet::Custom(vec![
            " WWW. ".into(),
            "www".into(),
            "".into(),
            "api-v2".into(),
        ])));
        let set = builder.build(&profile).unwrap();
        let labels: Vec<&str> = set.candidates.iter().filter_map(|c| c.label()).collect();
        assert_eq!(labels, vec!["www", "api-v2"]);

        let bad = Profile::Domain(DomainProfile::new(LabelSet::Custom(vec!["a b".into()])));
        assert!(matches!(builder.build(&bad), Err(ScanError::InvalidProfile(_))));
    }

    #[test]
    fn labels_with_empty_or_hyphen_edged_parts_are_rejected() {
        let wl = wordlists();
        let builder = CandidateSetBuilder::new(&wl);
        for bad in ["a..b", "-", "dev-.api", "-www"] {
            let profile = Profile::Domain(DomainProfile::new(LabelSet::Custom(vec![bad.into()])));
            assert!(
                matches!(builder.build(&profile), Err(ScanError::InvalidProfile(_))),
                "{bad} should be rejected"
            );
        }
        let ok = Profile::Domain(DomainProfile::new(LabelSet::Custom(vec![
            "dev.api".into(),
            "_dmarc".into(),
        ])));
        assert_eq!(builder.build(&ok).unwrap().candidates.len(), 2);
    }

    #[test]
    fn extensive_labels_union_without_duplicates() {
        let wl = wordlists();
        let set = CandidateSetBuilder::new(&wl)
            .build(&Profile::Domain(DomainProfile::new(LabelSet::Extensive)))
            .unwrap();
        let unique: HashSet<&Candidate> = set.candidates.iter().collect();
        assert_eq!(unique.len(), set.len());
        assert!(set.len() > wl.subdomains.common.len());
    }
}
