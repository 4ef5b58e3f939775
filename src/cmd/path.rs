use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use liveprobe::db::{Wordlists, read_wordlist_file};
use liveprobe::probe::{HttpPathProbe, HttpProbeConfig};
use liveprobe::profile::path::parse_extensions;
use liveprobe::profile::{PathProfile, PathWordlist, Profile};

use crate::cli::PathScanArgs;
use crate::cmd::common::{OutputOptions, build_candidates, emit, execute};

/// Run hidden path discovery
pub async fn run(args: PathScanArgs, opts: OutputOptions) -> Result<()> {
    let wordlist = match &args.wordlist_file {
        Some(path) => PathWordlist::Custom(read_wordlist_file(path)?),
        None => args.wordlist.to_wordlist(),
    };
    let profile = Profile::Path(
        PathProfile::new(wordlist).with_extensions(parse_extensions(&args.extensions)),
    );
    let wordlists = Wordlists::bundled()?;
    let set = build_candidates(&wordlists, &profile, args.common.max_candidates)?;

    let probe_timeout_ms = args.probe_timeout_ms();
    let config = HttpProbeConfig {
        timeout: Duration::from_millis(probe_timeout_ms),
        body_limit: args.body_limit,
        accept_invalid_certs: args.insecure,
        ..Default::default()
    };
    let probe = HttpPathProbe::new(&args.target, config)?;
    let base_url = probe.base_url().to_string();

    let report = execute(
        "path",
        &base_url,
        &set,
        Arc::new(probe),
        &args.common,
        probe_timeout_ms,
        false,
    )
    .await;
    tracing::info!("{} path(s) found under {}", report.found.len(), base_url);
    emit(&report, &opts)
}
