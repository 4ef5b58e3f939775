use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use liveprobe::db::Wordlists;
use liveprobe::probe::Probe;
use liveprobe::profile::{CandidateSet, CandidateSetBuilder, Profile};
use liveprobe::report::{ReportAssembler, ScanReport};
use liveprobe::scan::{ScanEngine, ScanJob};

use crate::cli::CommonScanArgs;
use crate::util::json::{JsonStyle, save_json_output, to_json};

/// Where and how the report is written
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub no_stdout: bool,
    pub output: Option<PathBuf>,
}

/// Expand a profile into candidates, failing before any probe runs.
pub fn build_candidates(
    wordlists: &Wordlists,
    profile: &Profile,
    max_candidates: usize,
) -> Result<CandidateSet> {
    let set = CandidateSetBuilder::new(wordlists)
        .with_limit(max_candidates)
        .build(profile)?;
    if set.is_empty() {
        anyhow::bail!("no {} candidates to scan", profile.kind());
    }
    tracing::info!(
        "{} {} candidate(s) ready{}",
        set.len(),
        profile.kind(),
        if set.truncated {
            format!(" (truncated from {})", set.requested)
        } else {
            String::new()
        }
    );
    Ok(set)
}

/// Run one scan job over `set` and assemble its report.
pub async fn execute(
    kind: &str,
    target: &str,
    set: &CandidateSet,
    probe: Arc<dyn Probe>,
    common: &CommonScanArgs,
    probe_timeout_ms: u64,
    wildcard: bool,
) -> ScanReport {
    let started_at = SystemTime::now();
    let job = ScanJob::new(target, set.candidates.clone(), probe)
        .with_concurrency(common.concurrency)
        .with_probe_timeout(Duration::from_millis(probe_timeout_ms))
        .with_global_deadline(Duration::from_millis(common.timeout_ms));
    tracing::debug!("{:?}", job);
    let execution = ScanEngine::new(job).run().await;
    ReportAssembler::new(kind)
        .with_order(common.sort.to_order())
        .with_wildcard(wildcard)
        .with_started_at(started_at)
        .assemble(set, execution)
}

/// Print and/or save the report.
pub fn emit(report: &ScanReport, opts: &OutputOptions) -> Result<()> {
    if report.timed_out() {
        tracing::warn!(
            "Scan deadline exceeded: {} candidate(s) left unprobed",
            report.cancelled()
        );
    }
    if !opts.no_stdout {
        if opts.json {
            println!("{}", to_json(report, JsonStyle::Pretty)?);
        } else {
            liveprobe::output::print_report_tree(report);
        }
    }
    if let Some(path) = &opts.output {
        match save_json_output(report, path, JsonStyle::Pretty) {
            Ok(_) => {
                if !opts.no_stdout {
                    tracing::info!("JSON output saved to {}", path.display());
                }
            }
            Err(e) => tracing::error!("Failed to save JSON output: {}", e),
        }
    }
    Ok(())
}
