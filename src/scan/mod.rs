//! Scan engine.
//!
//! Runs one probe per candidate with at most `concurrency` probes in flight,
//! a per-probe timeout and a global deadline. Every candidate ends up with
//! exactly one outcome, stored by candidate index.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::candidate::Candidate;
use crate::probe::{Outcome, Probe};

pub mod job;

pub use job::{JobState, ScanJob};

/// Extra time the engine waits past a probe's own deadline before cutting
/// it off, so a probe that returns right at its deadline keeps its result.
pub const PROBE_GRACE: Duration = Duration::from_millis(25);

/// Outcome of one candidate, tied to its submission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOutcome {
    pub index: usize,
    pub candidate: Candidate,
    pub outcome: Outcome,
}

/// Raw result of an engine run, in submission order.
#[derive(Debug, Clone)]
pub struct ScanExecution {
    pub target: String,
    pub probe: &'static str,
    pub outcomes: Vec<CandidateOutcome>,
    pub state: JobState,
    pub scan_time: Duration,
}

impl ScanExecution {
    pub fn timed_out(&self) -> bool {
        self.state == JobState::TimedOut
    }
}

/// Aborts the probe task when the engine stops waiting on it, whichever
/// way that happens.
struct ProbeTask(JoinHandle<Outcome>);

impl Drop for ProbeTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run a single probe in its own task. The probe is told to finish by
/// `probe_timeout`; the engine gives up on it `PROBE_GRACE` later.
async fn run_probe(
    probe: Arc<dyn Probe>,
    candidate: Candidate,
    probe_timeout: Duration,
    global_deadline: Instant,
) -> Outcome {
    if Instant::now() >= global_deadline {
        return Outcome::Cancelled;
    }
    let policy = probe.timeout_policy();
    let probe_deadline = Instant::now() + probe_timeout;
    let label = candidate.to_string();
    let mut task = ProbeTask(tokio::spawn(async move {
        probe.probe(&candidate, probe_deadline).await
    }));
    match timeout_at(probe_deadline + PROBE_GRACE, &mut task.0).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) if e.is_panic() => {
            let msg = panic_message(e.into_panic());
            tracing::error!("probe for {} panicked: {}", label, msg);
            Outcome::error(format!("probe panicked: {}", msg))
        }
        Ok(Err(e)) => Outcome::error(format!("probe task failed: {}", e)),
        Err(_) => {
            tracing::debug!("probe for {} exceeded {:?}", label, probe_timeout);
            policy.outcome()
        }
    }
}

/// Executes one scan job.
pub struct ScanEngine {
    job: ScanJob,
    state: JobState,
}

impl ScanEngine {
    pub fn new(job: ScanJob) -> Self {
        Self {
            job,
            state: JobState::Pending,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run the job to completion or to its global deadline.
    pub async fn run(mut self) -> ScanExecution {
        let concurrency = self.job.concurrency();
        let probe_timeout = self.job.probe_timeout();
        let budget = self.job.global_deadline();
        let (target, candidates, probe) = self.job.into_parts();
        let probe_name = probe.name();
        let total = candidates.len();

        let start_time = Instant::now();
        let deadline = start_time + budget;
        self.state = JobState::Running;
        tracing::info!(
            "Starting {} scan of {}: {} candidate(s), concurrency {}, probe timeout {:?}, deadline {:?}",
            probe_name,
            target,
            total,
            concurrency,
            probe_timeout,
            budget
        );

        let mut slots: Vec<Option<Outcome>> = vec![None; total];

        if total > 0 {
            let header_span = tracing::info_span!("scan_job");
            header_span.pb_set_style(&crate::output::progress::get_progress_style());
            header_span.pb_set_message(&format!("{} scan ({})", probe_name.to_uppercase(), target));
            header_span.pb_set_length(total as u64);
            header_span.pb_set_position(0);
            header_span.pb_start();

            let work_items: Vec<(usize, Candidate)> =
                candidates.iter().cloned().enumerate().collect();
            let results = stream::iter(work_items)
                .map(|(index, candidate)| {
                    let probe = probe.clone();
                    async move {
                        let outcome = run_probe(probe, candidate, probe_timeout, deadline).await;
                        (index, outcome)
                    }
                })
                .buffer_unordered(concurrency);
            tokio::pin!(results);

            let expiry = sleep_until(deadline);
            tokio::pin!(expiry);

            loop {
                tokio::select! {
                    biased;
                    maybe = results.next() => {
                        match maybe {
                            Some((index, outcome)) => {
                                slots[index] = Some(outcome);
                                header_span.pb_inc(1);
                                // Results landing on the deadline must not let the stream
                                // keep dispatching.
                                if Instant::now() >= deadline {
                                    break;
                                }
                            }
                            None => break, // All done
                        }
                    }
                    _ = &mut expiry => {
                        // Deadline reached: in-flight probes are dropped with the stream
                        break;
                    }
                }
            }

            drop(header_span);
        }

        let mut outcomes = Vec::with_capacity(total);
        let mut cancelled = 0usize;
        for (index, (candidate, slot)) in candidates.into_iter().zip(slots).enumerate() {
            let outcome = slot.unwrap_or(Outcome::Cancelled);
            if outcome == Outcome::Cancelled {
                cancelled += 1;
            }
            outcomes.push(CandidateOutcome {
                index,
                candidate,
                outcome,
            });
        }

        self.state = if cancelled > 0 {
            tracing::warn!(
                "{} scan of {} hit its {:?} deadline, {} of {} candidate(s) cancelled",
                probe_name,
                target,
                budget,
                cancelled,
                total
            );
            JobState::TimedOut
        } else {
            JobState::Completed
        };

        let scan_time = start_time.elapsed();
        tracing::info!(
            "{} scan of {} {} in {:?}",
            probe_name,
            target,
            self.state.as_str(),
            scan_time
        );

        ScanExecution {
            target,
            probe: probe_name,
            outcomes,
            state: self.state,
            scan_time,
        }
    }
}
