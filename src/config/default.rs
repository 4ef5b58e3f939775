/// Default concurrency (in-flight probes) for every scan kind
pub const DEFAULT_CONCURRENCY: usize = 16;
/// Default global deadline for one scan job (ms)
pub const DEFAULT_SCAN_TIMEOUT_MS: u64 = 30_000;
/// Default per-probe timeout for TCP connect probes (ms)
pub const DEFAULT_PORT_PROBE_TIMEOUT_MS: u64 = 1_500;
/// Default per-probe timeout for HTTP path probes (ms)
pub const DEFAULT_PATH_PROBE_TIMEOUT_MS: u64 = 5_000;
/// Default per-probe timeout for DNS probes (ms)
pub const DEFAULT_DOMAIN_PROBE_TIMEOUT_MS: u64 = 3_000;
/// Hard cap on the number of candidates in one scan
pub const DEFAULT_MAX_CANDIDATES: usize = 1024;
/// Maximum response body bytes read by the HTTP path probe
pub const DEFAULT_HTTP_BODY_LIMIT: usize = 64 * 1024;
/// Extensions appended to extension-less paths by default
pub const DEFAULT_PATH_EXTENSIONS: &str = "php,html,js,txt";
/// Timeout of each HTTP enrichment request on a live subdomain (ms)
pub const DEFAULT_ENRICH_TIMEOUT_MS: u64 = 2_000;
/// User-Agent sent by HTTP probes
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
