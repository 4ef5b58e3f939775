/// Port list of the "quick" scan type
pub const QUICK_PORTS_JSON: &str = include_str!("../../resources/liveprobe-quick-ports.json");
/// Top ports, most common first
pub const TOP_PORTS_JSON: &str = include_str!("../../resources/liveprobe-top-ports.json");
/// Service names of well-known ports
pub const PORT_SERVICES_JSON: &str = include_str!("../../resources/liveprobe-port-services.json");
/// Web path wordlists (each tier adds to the previous one)
pub const WEB_PATHS_JSON: &str = include_str!("../../resources/liveprobe-web-paths.json");
/// Subdomain label wordlists
pub const SUBDOMAINS_JSON: &str = include_str!("../../resources/liveprobe-subdomains.json");
