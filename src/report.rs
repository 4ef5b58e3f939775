//! Report assembly: partition engine outcomes into found / not found / errors.

use std::cmp::Ordering;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::candidate::Candidate;
use crate::probe::{Outcome, ProbeMeta};
use crate::profile::CandidateSet;
use crate::scan::{JobState, ScanExecution};

/// Reason recorded for candidates the engine never finished.
pub const CANCELLED_REASON: &str = "cancelled: deadline exceeded";

/// A live candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub candidate: Candidate,
    pub meta: ProbeMeta,
}

/// A dead candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Miss {
    pub candidate: Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProbeMeta>,
}

/// A candidate whose liveness is unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub candidate: Candidate,
    pub reason: String,
}

/// Secondary ordering of the found list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoundOrder {
    /// Keep candidate order
    #[default]
    Candidate,
    /// Port number ascending
    Port,
    /// HTTP status ascending
    Status,
    /// Candidate name ascending
    Name,
}

impl FoundOrder {
    fn compare(self, a: &Finding, b: &Finding) -> Ordering {
        match self {
            FoundOrder::Candidate => Ordering::Equal,
            FoundOrder::Port => a.candidate.port().cmp(&b.candidate.port()),
            // Findings without a status sort last
            FoundOrder::Status => {
                let key = |f: &Finding| f.meta.http_status().unwrap_or(u16::MAX);
                key(a).cmp(&key(b))
            }
            FoundOrder::Name => a.candidate.to_string().cmp(&b.candidate.to_string()),
        }
    }
}

/// Metadata about the scan report
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub tool: String,
    pub version: String,
    /// "port", "path" or "domain"
    pub kind: String,
    pub target: String,
    pub probe: String,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
}

/// Counts derived from the partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
}

/// Final result of one scan job.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub meta: ReportMeta,
    pub state: JobState,
    pub found: Vec<Finding>,
    pub not_found: Vec<Miss>,
    pub errors: Vec<Failure>,
    pub requested_candidates: usize,
    pub truncated: bool,
    pub wildcard: bool,
    pub scan_time: Duration,
}

impl ScanReport {
    pub fn total_candidates(&self) -> usize {
        self.found.len() + self.not_found.len() + self.errors.len()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.total_candidates(),
            found: self.found.len(),
            not_found: self.not_found.len(),
            errors: self.errors.len(),
        }
    }

    pub fn timed_out(&self) -> bool {
        self.state == JobState::TimedOut
    }

    pub fn cancelled(&self) -> usize {
        self.errors
            .iter()
            .filter(|f| f.reason == CANCELLED_REASON)
            .count()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReportRepr<'a> {
    meta: &'a ReportMeta,
    state: JobState,
    summary: ReportSummary,
    found: &'a [Finding],
    not_found: &'a [Miss],
    errors: &'a [Failure],
    total_candidates: usize,
    requested_candidates: usize,
    truncated: bool,
    wildcard: bool,
    scan_time: Duration,
}

impl Serialize for ScanReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ScanReportRepr {
            meta: &self.meta,
            state: self.state,
            summary: self.summary(),
            found: &self.found,
            not_found: &self.not_found,
            errors: &self.errors,
            total_candidates: self.total_candidates(),
            requested_candidates: self.requested_candidates,
            truncated: self.truncated,
            wildcard: self.wildcard,
            scan_time: self.scan_time,
        }
        .serialize(serializer)
    }
}

/// Builds a [`ScanReport`] from a candidate set and an engine run.
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    kind: String,
    order: FoundOrder,
    wildcard: bool,
    started_at: Option<SystemTime>,
}

impl ReportAssembler {
    pub fn new<S: Into<String>>(kind: S) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
    pub fn with_order(mut self, order: FoundOrder) -> Self {
        self.order = order;
        self
    }
    pub fn with_wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard;
        self
    }
    pub fn with_started_at(mut self, started_at: SystemTime) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Partition outcomes by tag. Candidates are walked in submission order,
    /// so each list keeps that order before the found list is sorted.
    pub fn assemble(&self, set: &CandidateSet, execution: ScanExecution) -> ScanReport {
        let mut slots: Vec<Option<Outcome>> = vec![None; set.candidates.len()];
        for co in execution.outcomes {
            if let Some(slot) = slots.get_mut(co.index) {
                *slot = Some(co.outcome);
            }
        }

        let mut found = Vec::new();
        let mut not_found = Vec::new();
        let mut errors = Vec::new();
        for (candidate, slot) in set.candidates.iter().cloned().zip(slots) {
            match slot {
                Some(Outcome::Live(meta)) => found.push(Finding { candidate, meta }),
                Some(Outcome::Dead(meta)) => not_found.push(Miss { candidate, meta }),
                Some(Outcome::Error(reason)) => errors.push(Failure { candidate, reason }),
                Some(Outcome::Cancelled) => errors.push(Failure {
                    candidate,
                    reason: CANCELLED_REASON.to_string(),
                }),
                None => errors.push(Failure {
                    candidate,
                    reason: "no outcome recorded".to_string(),
                }),
            }
        }
        // sort_by is stable: ties keep candidate order
        let order = self.order;
        found.sort_by(|a, b| order.compare(a, b));

        let finished_at = SystemTime::now();
        let started_at = self
            .started_at
            .or_else(|| finished_at.checked_sub(execution.scan_time))
            .unwrap_or(finished_at);

        ScanReport {
            meta: ReportMeta {
                tool: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                kind: self.kind.clone(),
                target: execution.target,
                probe: execution.probe.to_string(),
                started_at,
                finished_at,
            },
            state: execution.state,
            found,
            not_found,
            errors,
            requested_candidates: set.requested,
            truncated: set.truncated,
            wildcard: self.wildcard,
            scan_time: execution.scan_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Wordlists;
    use crate::probe::dns::detect_wildcard;
    use crate::probe::dns::tests::FakeResolver;
    use crate::probe::{DnsProbe, HttpPathProbe, HttpProbeConfig, TimeoutPolicy};
    use crate::profile::{
        CandidateSetBuilder, DomainProfile, LabelSet, PathProfile, PathWordlist, PortProfile,
        Profile,
    };
    use crate::scan::tests::{FnProbe, live_port};
    use crate::scan::{CandidateOutcome, ScanEngine, ScanJob};
    use std::sync::Arc;

    fn http(status: u16) -> ProbeMeta {
        ProbeMeta::Http {
            url: String::new(),
            status,
            size: 0,
            content_type: "text/html".into(),
        }
    }

    fn set_of(candidates: Vec<Candidate>) -> CandidateSet {
        let n = candidates.len();
        CandidateSet {
            candidates,
            requested: n,
            truncated: false,
            limit: 1024,
        }
    }

    fn execution(outcomes: Vec<Outcome>, candidates: &[Candidate]) -> ScanExecution {
        ScanExecution {
            target: "t".into(),
            probe: "fake",
            outcomes: candidates
                .iter()
                .cloned()
                .zip(outcomes)
                .enumerate()
                .map(|(index, (candidate, outcome))| CandidateOutcome {
                    index,
                    candidate,
                    outcome,
                })
                .collect(),
            state: JobState::Completed,
            scan_time: Duration::from_millis(10),
        }
    }

    #[test]
    fn partitions_by_tag_and_counts_add_up() {
        let candidates: Vec<Candidate> = (1..=5).map(Candidate::Port).collect();
        let outcomes = vec![
            live_port(1),
            Outcome::Dead(None),
            Outcome::error("boom"),
            Outcome::Cancelled,
            live_port(5),
        ];
        let set = set_of(candidates.clone());
        let report = ReportAssembler::new("port").assemble(&set, execution(outcomes, &candidates));

        assert_eq!(report.found.len(), 2);
        assert_eq!(report.not_found.len(), 1);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[1].reason, CANCELLED_REASON);
        assert_eq!(report.cancelled(), 1);
        let s = report.summary();
        assert_eq!(s.found + s.not_found + s.errors, candidates.len());
        assert_eq!(report.total_candidates(), 5);
    }

    #[test]
    fn status_sort_is_stable() {
        let candidates: Vec<Candidate> = ["/a", "/b", "/c", "/d"]
            .iter()
            .map(|p| Candidate::Path(p.to_string()))
            .collect();
        let outcomes = vec![
            Outcome::Live(http(403)),
            Outcome::Live(http(200)),
            Outcome::Live(http(403)),
            Outcome::Live(http(200)),
        ];
        let set = set_of(candidates.clone());
        let report = ReportAssembler::new("path")
            .with_order(FoundOrder::Status)
            .assemble(&set, execution(outcomes, &candidates));
        let order: Vec<String> = report.found.iter().map(|f| f.candidate.to_string()).collect();
        assert_eq!(order, vec!["/b", "/d", "/a", "/c"]);
    }

    #[test]
    fn port_and_name_orders() {
        let candidates: Vec<Candidate> =
            vec![Candidate::Port(443), Candidate::Port(22), Candidate::Port(80)];
        let outcomes = vec![live_port(443), live_port(22), live_port(80)];
        let set = set_of(candidates.clone());
        let by_port = ReportAssembler::new("port")
            .with_order(FoundOrder::Port)
            .assemble(&set, execution(outcomes.clone(), &candidates));
        let ports: Vec<u16> = by_port.found.iter().filter_map(|f| f.candidate.port()).collect();
        assert_eq!(ports, vec![22, 80, 443]);

        let by_candidate =
            ReportAssembler::new("port").assemble(&set, execution(outcomes, &candidates));
        let ports: Vec<u16> = by_candidate
            .found
            .iter()
            .filter_map(|f| f.candidate.port())
            .collect();
        assert_eq!(ports, vec![443, 22, 80]);
    }

    #[test]
    fn json_carries_derived_summary() {
        let candidates = vec![Candidate::Path("/admin".into()), Candidate::Path("/x".into())];
        let outcomes = vec![Outcome::Live(http(403)), Outcome::Dead(Some(http(404)))];
        let set = set_of(candidates.clone());
        let report = ReportAssembler::new("path").assemble(&set, execution(outcomes, &candidates));
        let v = serde_json::to_value(&report).unwrap();

        assert_eq!(v["summary"]["found"], 1);
        assert_eq!(v["summary"]["not_found"], 1);
        assert_eq!(v["totalCandidates"], 2);
        assert_eq!(v["truncated"], false);
        assert_eq!(v["state"], "completed");
        assert_eq!(v["found"][0]["candidate"], "/admin");
        assert_eq!(v["found"][0]["meta"]["status"], 403);
        assert_eq!(v["notFound"][0]["meta"]["status"], 404);
        assert!(v["errors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn truncated_set_reports_cap() {
        let wordlists = Wordlists::bundled().unwrap();
        let set = CandidateSetBuilder::new(&wordlists)
            .build(&Profile::Port(PortProfile::Custom("1-2000".into())))
            .unwrap();
        assert_eq!(set.len(), 1024);

        let probe = FnProbe::new(TimeoutPolicy::Dead, |_c: Candidate| async move {
            Outcome::Dead(None)
        });
        let job =
            ScanJob::new("127.0.0.1", set.candidates.clone(), Arc::new(probe)).with_concurrency(64);
        let exec = ScanEngine::new(job).run().await;
        let report = ReportAssembler::new("port").assemble(&set, exec);

        assert!(report.truncated);
        assert_eq!(report.total_candidates(), 1024);
        assert_eq!(report.requested_candidates, 2000);
        assert_eq!(report.not_found.len(), 1024);
    }

    #[tokio::test]
    async fn quick_profile_with_only_http_open() {
        let wordlists = Wordlists::bundled().unwrap();
        let set = CandidateSetBuilder::new(&wordlists)
            .build(&Profile::Port(PortProfile::Quick))
            .unwrap();
        let probe = FnProbe::new(TimeoutPolicy::Dead, |c: Candidate| async move {
            match c.port() {
                Some(80) => live_port(80),
                _ => Outcome::Dead(None),
            }
        });
        let job = ScanJob::new("10.0.0.1", set.candidates.clone(), Arc::new(probe));
        let report = ReportAssembler::new("port").assemble(&set, ScanEngine::new(job).run().await);

        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].candidate, Candidate::Port(80));
        assert_eq!(report.not_found.len(), set.len() - 1);
        assert!(report.errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn mid_scan_deadline_cancels_the_rest() {
        let candidates: Vec<Candidate> = (1..=10).map(Candidate::Port).collect();
        let set = set_of(candidates.clone());
        // First half answers at once, the rest hang past the deadline.
        let probe = FnProbe::new(TimeoutPolicy::Dead, |c: Candidate| async move {
            let p = c.port().unwrap_or(0);
            if p > 5 {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            live_port(p)
        });
        let job = ScanJob::new("t", candidates, Arc::new(probe))
            .with_concurrency(10)
            .with_probe_timeout(Duration::from_secs(120))
            .with_global_deadline(Duration::from_secs(2));
        let report = ReportAssembler::new("port").assemble(&set, ScanEngine::new(job).run().await);

        assert!(report.timed_out());
        assert_eq!(report.found.len(), 5);
        assert_eq!(report.errors.len(), 5);
        assert!(report.errors.iter().all(|f| f.reason == CANCELLED_REASON));
        assert_eq!(report.total_candidates(), 10);
    }

    #[tokio::test]
    async fn http_path_scan_against_fixture() {
        let addr = crate::probe::http::tests::serve_statuses(vec![("/admin", 403)]).await;
        let wordlists = Wordlists::bundled().unwrap();
        let profile = PathProfile::new(PathWordlist::Custom(vec!["admin".into(), "xyz".into()]))
            .with_extensions(Vec::<String>::new());
        let set = CandidateSetBuilder::new(&wordlists)
            .build(&Profile::Path(profile))
            .unwrap();
        let probe =
            HttpPathProbe::new(&format!("http://{}", addr), HttpProbeConfig::default()).unwrap();
        let base_url = probe.base_url().to_string();
        let job = ScanJob::new(base_url, set.candidates.clone(), Arc::new(probe))
            .with_probe_timeout(Duration::from_secs(3));
        let report = ReportAssembler::new("path").assemble(&set, ScanEngine::new(job).run().await);

        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].candidate, Candidate::Path("/admin".into()));
        assert_eq!(report.found[0].meta.http_status(), Some(403));
        assert_eq!(report.not_found.len(), 1);
        assert_eq!(report.not_found[0].candidate, Candidate::Path("/xyz".into()));
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn wildcard_domain_is_flagged() {
        let mut resolver = FakeResolver::new();
        resolver.wildcard = Some("192.0.2.7".parse().unwrap());
        let resolver = Arc::new(resolver);
        let wildcard = detect_wildcard(&*resolver, "example.com", Duration::from_secs(1))
            .await
            .is_some();
        assert!(wildcard);

        let wordlists = Wordlists::bundled().unwrap();
        let labels = LabelSet::Custom(vec!["www".into(), "mail".into()]);
        let set = CandidateSetBuilder::new(&wordlists)
            .build(&Profile::Domain(DomainProfile::new(labels)))
            .unwrap();
        let probe = DnsProbe::new(resolver, "example.com");
        let job = ScanJob::new("example.com", set.candidates.clone(), Arc::new(probe));
        let report = ReportAssembler::new("domain")
            .with_order(FoundOrder::Name)
            .with_wildcard(wildcard)
            .assemble(&set, ScanEngine::new(job).run().await);

        assert!(report.wildcard);
        assert_eq!(report.found.len(), 2);
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["wildcard"], true);
    }
}
