use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::candidate::Candidate;
use crate::config::default::{DEFAULT_CONCURRENCY, DEFAULT_SCAN_TIMEOUT_MS};
use crate::probe::Probe;

/// Default per-probe timeout when the caller does not set one
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3_000);

/// Lifecycle of one scan job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    /// Every candidate got an outcome before the global deadline
    Completed,
    /// The global deadline fired with candidates still pending
    TimedOut,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::TimedOut => "timed out",
        }
    }
}

/// One bounded, time-boxed batch of probes against a single target.
///
/// Built once per scan request and consumed by the engine run.
#[derive(Clone)]
pub struct ScanJob {
    target: String,
    candidates: Vec<Candidate>,
    probe: Arc<dyn Probe>,
    concurrency: usize,
    probe_timeout: Duration,
    global_deadline: Duration,
}

impl ScanJob {
    pub fn new<S: Into<String>>(
        target: S,
        candidates: Vec<Candidate>,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            target: target.into(),
            candidates,
            probe,
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            global_deadline: Duration::from_millis(DEFAULT_SCAN_TIMEOUT_MS),
        }
    }
    /// Maximum probes in flight. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }
    /// Budget for the whole job, measured from the start of the run.
    pub fn with_global_deadline(mut self, deadline: Duration) -> Self {
        self.global_deadline = deadline;
        self
    }
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }
    pub fn global_deadline(&self) -> Duration {
        self.global_deadline
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Candidate>, Arc<dyn Probe>) {
        (self.target, self.candidates, self.probe)
    }
}

impl fmt::Debug for ScanJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanJob")
            .field("target", &self.target)
            .field("candidates", &self.candidates.len())
            .field("probe", &self.probe.name())
            .field("concurrency", &self.concurrency)
            .field("probe_timeout", &self.probe_timeout)
            .field("global_deadline", &self.global_deadline)
            .finish()
    }
}
