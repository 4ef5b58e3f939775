use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, value_parser};

use liveprobe::config::default::{
    DEFAULT_CONCURRENCY, DEFAULT_DOMAIN_PROBE_TIMEOUT_MS, DEFAULT_HTTP_BODY_LIMIT,
    DEFAULT_MAX_CANDIDATES, DEFAULT_PATH_EXTENSIONS, DEFAULT_PATH_PROBE_TIMEOUT_MS,
    DEFAULT_PORT_PROBE_TIMEOUT_MS, DEFAULT_SCAN_TIMEOUT_MS,
};
use liveprobe::profile::{LabelSet, PathWordlist, PortProfile};
use liveprobe::report::FoundOrder;

/// liveprobe - Time-boxed liveness prober for ports, web paths and subdomains
#[derive(Parser, Debug)]
#[command(author, version, about = "liveprobe - Time-boxed liveness prober for ports, web paths and subdomains\nhttps://github.com/shellrow/liveprobe", long_about = None)]
pub struct Cli {
    /// Global log level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Log to file (in addition to stdout)
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub log_file: bool,

    /// Log file path (default: ~/.liveprobe/liveprobe.log)
    #[arg(long, value_name = "FILE", value_parser = value_parser!(PathBuf))]
    pub log_file_path: Option<PathBuf>,

    /// Suppress non-error logs
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub quiet: bool,

    /// Save result to a JSON file
    #[arg(short, long, value_name = "FILE", value_parser = value_parser!(PathBuf))]
    pub output: Option<PathBuf>,

    /// Suppress stdout output (use with --output)
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub no_stdout: bool,

    /// Print the report as JSON instead of a tree
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub json: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Command,
}

/// Log level
#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    pub fn to_level_filter(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe TCP ports on a host (connect scan)
    Port(PortScanArgs),

    /// Probe hidden paths under a web base URL
    Path(PathScanArgs),

    /// Subdomain enumeration (DNS A records)
    Domain(DomainScanArgs),
}

/// Port scan profiles
#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum PortScanType {
    Quick,
    Intense,
    All,
    /// Use the --ports spec
    Custom,
}

/// Bundled web path wordlists
#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum PathWordlistKind {
    Common,
    Medium,
    Extensive,
}

impl PathWordlistKind {
    pub fn to_wordlist(self) -> PathWordlist {
        match self {
            PathWordlistKind::Common => PathWordlist::Common,
            PathWordlistKind::Medium => PathWordlist::Medium,
            PathWordlistKind::Extensive => PathWordlist::Extensive,
        }
    }
}

/// Bundled subdomain label sets
#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum DomainScanMode {
    Standard,
    Extensive,
}

impl DomainScanMode {
    pub fn to_label_set(self) -> LabelSet {
        match self {
            DomainScanMode::Standard => LabelSet::Standard,
            DomainScanMode::Extensive => LabelSet::Extensive,
        }
    }
}

/// Order of the found list
#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum SortKey {
    Candidate,
    Port,
    Status,
    Name,
}

impl SortKey {
    pub fn to_order(self) -> FoundOrder {
        match self {
            SortKey::Candidate => FoundOrder::Candidate,
            SortKey::Port => FoundOrder::Port,
            SortKey::Status => FoundOrder::Status,
            SortKey::Name => FoundOrder::Name,
        }
    }
}

/// Options shared by every scan kind
#[derive(Args, Debug, Clone)]
pub struct CommonScanArgs {
    /// Maximum probes in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-probe timeout in ms (default depends on the scan kind)
    #[arg(long, value_parser = value_parser!(u64).range(1..=60_000))]
    pub probe_timeout_ms: Option<u64>,

    /// Total scan timeout in ms
    #[arg(long, default_value_t = DEFAULT_SCAN_TIMEOUT_MS, value_parser = value_parser!(u64).range(1..=3_600_000))]
    pub timeout_ms: u64,

    /// Cap on the number of candidates; extra candidates are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES, value_parser = value_parser!(u64).range(1..=65_535).map(|v| v as usize))]
    pub max_candidates: usize,

    /// Order of the found list
    #[arg(long, value_enum, default_value_t = SortKey::Candidate)]
    pub sort: SortKey,
}

impl CommonScanArgs {
    pub fn probe_timeout_or(&self, default_ms: u64) -> u64 {
        self.probe_timeout_ms.unwrap_or(default_ms)
    }
}

/// Port scan arguments
#[derive(Args, Debug)]
pub struct PortScanArgs {
    /// Target IP or hostname
    #[arg(required = true)]
    pub target: String,

    /// Scan profile
    #[arg(short = 's', long, value_enum, default_value_t = PortScanType::Quick)]
    pub scan_type: PortScanType,

    /// Port spec for the custom profile: "80,443" | "8000-8010" | "quick,3000-3010" | "top-20"
    #[arg(short, long)]
    pub ports: Option<String>,

    #[command(flatten)]
    pub common: CommonScanArgs,
}

impl PortScanArgs {
    /// Map the scan type to a profile. `--ports` alone implies a custom scan.
    pub fn to_profile(&self) -> anyhow::Result<PortProfile> {
        match (self.scan_type, &self.ports) {
            (PortScanType::Custom, None) => {
                anyhow::bail!("custom scan type requires --ports")
            }
            (_, Some(spec)) => Ok(PortProfile::Custom(spec.clone())),
            (PortScanType::Quick, None) => Ok(PortProfile::Quick),
            (PortScanType::Intense, None) => Ok(PortProfile::Intense),
            (PortScanType::All, None) => Ok(PortProfile::All),
        }
    }

    pub fn probe_timeout_ms(&self) -> u64 {
        self.common.probe_timeout_or(DEFAULT_PORT_PROBE_TIMEOUT_MS)
    }
}

/// Path scan arguments
#[derive(Args, Debug)]
pub struct PathScanArgs {
    /// Base URL (e.g., https://example.com). http:// is assumed without a scheme.
    #[arg(required = true)]
    pub target: String,

    /// Bundled wordlist
    #[arg(short, long, value_enum, default_value_t = PathWordlistKind::Common)]
    pub wordlist: PathWordlistKind,

    /// Wordlist file, one path per line (replaces the bundled list)
    #[arg(long, value_name = "FILE", value_parser = value_parser!(PathBuf))]
    pub wordlist_file: Option<PathBuf>,

    /// Extensions to try on paths without one ("" to disable)
    #[arg(short = 'x', long, default_value = DEFAULT_PATH_EXTENSIONS)]
    pub extensions: String,

    /// Maximum body bytes read per response
    #[arg(long, default_value_t = DEFAULT_HTTP_BODY_LIMIT)]
    pub body_limit: usize,

    /// Accept invalid TLS certificates
    #[arg(long, action = ArgAction::SetTrue)]
    pub insecure: bool,

    #[command(flatten)]
    pub common: CommonScanArgs,
}

impl PathScanArgs {
    pub fn probe_timeout_ms(&self) -> u64 {
        self.common.probe_timeout_or(DEFAULT_PATH_PROBE_TIMEOUT_MS)
    }
}

/// Subdomain scan arguments
#[derive(Args, Debug)]
pub struct DomainScanArgs {
    /// Base domain (e.g., example.com)
    #[arg(required = true)]
    pub domain: String,

    /// Bundled label set
    #[arg(short, long, value_enum, default_value_t = DomainScanMode::Standard)]
    pub mode: DomainScanMode,

    /// Wordlist file, one label per line (replaces the bundled labels)
    #[arg(long, value_name = "FILE", value_parser = value_parser!(PathBuf))]
    pub wordlist_file: Option<PathBuf>,

    /// Check live subdomains over HTTP(S) and record status and title
    #[arg(long, action = ArgAction::SetTrue)]
    pub http_check: bool,

    #[command(flatten)]
    pub common: CommonScanArgs,
}

impl DomainScanArgs {
    pub fn probe_timeout_ms(&self) -> u64 {
        self.common.probe_timeout_or(DEFAULT_DOMAIN_PROBE_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn port_defaults() {
        let cli = Cli::parse_from(["liveprobe", "port", "127.0.0.1"]);
        let Command::Port(args) = cli.command else {
            panic!("expected port subcommand");
        };
        assert_eq!(args.to_profile().unwrap(), PortProfile::Quick);
        assert_eq!(args.probe_timeout_ms(), DEFAULT_PORT_PROBE_TIMEOUT_MS);
        assert_eq!(args.common.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(args.common.max_candidates, DEFAULT_MAX_CANDIDATES);
    }

    #[test]
    fn ports_flag_implies_custom() {
        let cli = Cli::parse_from(["liveprobe", "port", "host", "-p", "8000-8010"]);
        let Command::Port(args) = cli.command else {
            panic!("expected port subcommand");
        };
        assert_eq!(
            args.to_profile().unwrap(),
            PortProfile::Custom("8000-8010".into())
        );

        let cli = Cli::parse_from(["liveprobe", "port", "host", "-s", "custom"]);
        let Command::Port(args) = cli.command else {
            panic!("expected port subcommand");
        };
        assert!(args.to_profile().is_err());
    }

    #[test]
    fn path_and_domain_options() {
        let cli = Cli::parse_from([
            "liveprobe",
            "--json",
            "path",
            "example.com",
            "-w",
            "medium",
            "-x",
            "php",
            "--probe-timeout-ms",
            "900",
            "--sort",
            "status",
        ]);
        assert!(cli.json);
        let Command::Path(args) = cli.command else {
            panic!("expected path subcommand");
        };
        assert_eq!(args.wordlist, PathWordlistKind::Medium);
        assert_eq!(args.extensions, "php");
        assert_eq!(args.probe_timeout_ms(), 900);
        assert_eq!(args.common.sort, SortKey::Status);

        let cli = Cli::parse_from([
            "liveprobe",
            "domain",
            "example.com",
            "-m",
            "extensive",
            "--http-check",
        ]);
        let Command::Domain(args) = cli.command else {
            panic!("expected domain subcommand");
        };
        assert_eq!(args.mode, DomainScanMode::Extensive);
        assert!(args.http_check);
        assert_eq!(args.probe_timeout_ms(), DEFAULT_DOMAIN_PROBE_TIMEOUT_MS);
    }

    #[test]
    fn zero_candidate_cap_is_rejected() {
        let res = Cli::try_parse_from(["liveprobe", "port", "host", "--max-candidates", "0"]);
        assert!(res.is_err());
    }
}
