use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use liveprobe::db::Wordlists;
use liveprobe::probe::TcpConnectProbe;
use liveprobe::profile::Profile;

use crate::cli::PortScanArgs;
use crate::cmd::common::{OutputOptions, build_candidates, emit, execute};

/// Time allowed to resolve a hostname target
const TARGET_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run TCP connect port scan
pub async fn run(args: PortScanArgs, opts: OutputOptions) -> Result<()> {
    let profile = Profile::Port(args.to_profile()?);
    let wordlists = Wordlists::bundled()?;
    let set = build_candidates(&wordlists, &profile, args.common.max_candidates)?;

    let ip = liveprobe::dns::lookup_host(&args.target, TARGET_RESOLVE_TIMEOUT).await?;
    if args.target.trim() != ip.to_string() {
        tracing::info!("Resolved {} to {}", args.target.trim(), ip);
    }
    let probe = TcpConnectProbe::new(ip).with_services(wordlists.port_services.clone());

    let report = execute(
        "port",
        &ip.to_string(),
        &set,
        Arc::new(probe),
        &args.common,
        args.probe_timeout_ms(),
        false,
    )
    .await;
    tracing::info!("{} open port(s) on {}", report.found.len(), ip);
    emit(&report, &opts)
}
