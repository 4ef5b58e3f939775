use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use liveprobe::db::{Wordlists, read_wordlist_file};
use liveprobe::probe::dns::{HttpEnricher, detect_wildcard, normalize_domain};
use liveprobe::probe::{DnsProbe, SystemResolver};
use liveprobe::profile::{DomainProfile, LabelSet, Profile};

use crate::cli::DomainScanArgs;
use crate::cmd::common::{OutputOptions, build_candidates, emit, execute};

/// Run subdomain scan
pub async fn run(args: DomainScanArgs, opts: OutputOptions) -> Result<()> {
    let domain = normalize_domain(&args.domain);
    if domain.is_empty() {
        anyhow::bail!("invalid domain: {:?}", args.domain);
    }
    let labels = match &args.wordlist_file {
        Some(path) => LabelSet::Custom(read_wordlist_file(path)?),
        None => args.mode.to_label_set(),
    };
    let profile = Profile::Domain(DomainProfile::new(labels));
    let wordlists = Wordlists::bundled()?;
    let set = build_candidates(&wordlists, &profile, args.common.max_candidates)?;

    let probe_timeout_ms = args.probe_timeout_ms();
    let resolver = Arc::new(SystemResolver::new()?);

    let wildcard =
        detect_wildcard(resolver.as_ref(), &domain, Duration::from_millis(probe_timeout_ms)).await;
    if let Some(ips) = &wildcard {
        tracing::warn!(
            "Wildcard DNS detected for {} ({:?}); every label may resolve",
            domain,
            ips
        );
    }

    let mut probe = DnsProbe::new(resolver, &domain);
    if args.http_check {
        probe = probe.with_enricher(HttpEnricher::with_default_timeout()?);
    }

    let report = execute(
        "domain",
        &domain,
        &set,
        Arc::new(probe),
        &args.common,
        probe_timeout_ms,
        wildcard.is_some(),
    )
    .await;
    tracing::info!("{} subdomain(s) of {} found", report.found.len(), domain);
    emit(&report, &opts)
}
