use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use rand::{Rng, distributions::Alphanumeric};
use regex::Regex;
use reqwest::{Client, ClientBuilder, redirect};
use tokio::time::{Instant, timeout, timeout_at};

use crate::candidate::Candidate;
use crate::config::default::{DEFAULT_ENRICH_TIMEOUT_MS, DEFAULT_USER_AGENT};
use crate::error::ScanError;
use crate::probe::http::read_body_bounded;
use crate::probe::{Outcome, Probe, ProbeMeta, TimeoutPolicy, remaining, unsupported};

/// Time kept back from the probe deadline so enrichment never eats the
/// whole budget of a name that already resolved.
const ENRICH_RESERVE: Duration = Duration::from_millis(200);

/// Why a name did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// NXDOMAIN or an empty answer
    NotFound,
    /// The resolver could not be asked or failed to answer
    Failed(String),
}

/// A-record lookups, abstracted so probes can run against a fake.
#[async_trait]
pub trait NameResolver: Send + Sync + 'static {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, LookupError>;
}

/// Resolver built from the system DNS configuration.
pub struct SystemResolver {
    inner: TokioResolver,
}

impl SystemResolver {
    pub fn new() -> Result<Self, ScanError> {
        Ok(Self {
            inner: crate::dns::resolver::get_resolver()?,
        })
    }
}

#[async_trait]
impl NameResolver for SystemResolver {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, LookupError> {
        match self.inner.ipv4_lookup(name).await {
            Ok(lookup) => Ok(lookup.iter().map(|a| a.0).collect()),
            Err(e) if e.is_no_records_found() || e.is_nx_domain() => Err(LookupError::NotFound),
            Err(e) => Err(LookupError::Failed(e.to_string())),
        }
    }
}

/// Best-effort HTTP check of a live subdomain: status and page title.
pub struct HttpEnricher {
    client: Client,
    title_re: Regex,
    body_limit: usize,
    https_port: u16,
    http_port: u16,
}

impl HttpEnricher {
    pub fn new(request_timeout: Duration, accept_invalid_certs: bool) -> Result<Self, ScanError> {
        Self::from_builder(
            Client::builder()
                .timeout(request_timeout)
                .danger_accept_invalid_certs(accept_invalid_certs),
        )
    }

    fn from_builder(builder: ClientBuilder) -> Result<Self, ScanError> {
        let client = builder
            .redirect(redirect::Policy::limited(5))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ScanError::HttpClient(e.to_string()))?;
        let title_re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
            .map_err(|e| ScanError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            title_re,
            body_limit: 64 * 1024,
            https_port: 443,
            http_port: 80,
        })
    }

    /// Check web servers on non-standard ports.
    pub fn with_ports(mut self, https_port: u16, http_port: u16) -> Self {
        self.https_port = https_port;
        self.http_port = http_port;
        self
    }

    pub fn with_default_timeout() -> Result<Self, ScanError> {
        Self::new(Duration::from_millis(DEFAULT_ENRICH_TIMEOUT_MS), false)
    }

    fn extract_title(&self, body: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(body);
        let caps = self.title_re.captures(&text)?;
        let title: String = caps.get(1)?.as_str().trim().chars().take(100).collect();
        if title.is_empty() { None } else { Some(title) }
    }

    async fn get(&self, url: &str) -> Result<(u16, Option<String>), reqwest::Error> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let mut body = Vec::new();
        read_body_bounded(&mut response, self.body_limit, Some(&mut body)).await?;
        Ok((status, self.extract_title(&body)))
    }

    /// Try https first, then plain http. Never past `deadline`.
    pub async fn check(&self, name: &str, deadline: Instant) -> (Option<u16>, Option<String>) {
        for (scheme, port) in [("https", self.https_port), ("http", self.http_port)] {
            let url = format!("{}://{}:{}/", scheme, name, port);
            match timeout_at(deadline, self.get(&url)).await {
                Ok(Ok((status, title))) => return (Some(status), title),
                Ok(Err(e)) => tracing::debug!("HTTP check {} failed: {}", url, e),
                Err(_) => break,
            }
        }
        (None, None)
    }
}

/// DNS A-record probe for subdomain labels under a base domain.
pub struct DnsProbe<R: NameResolver = SystemResolver> {
    resolver: Arc<R>,
    domain: String,
    enricher: Option<HttpEnricher>,
}

impl<R: NameResolver> DnsProbe<R> {
    pub fn new(resolver: Arc<R>, domain: &str) -> Self {
        Self {
            resolver,
            domain: normalize_domain(domain),
            enricher: None,
        }
    }
    pub fn with_enricher(mut self, enricher: HttpEnricher) -> Self {
        self.enricher = Some(enricher);
        self
    }
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// Strip scheme, path and trailing dots from a user-supplied domain.
pub fn normalize_domain(target: &str) -> String {
    let t = target.trim();
    let t = t
        .strip_prefix("https://")
        .or_else(|| t.strip_prefix("http://"))
        .unwrap_or(t);
    let t = t.split('/').next().unwrap_or(t);
    t.trim_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl<R: NameResolver> Probe for DnsProbe<R> {
    fn name(&self) -> &'static str {
        "dns"
    }

    fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy::Error
    }

    async fn probe(&self, candidate: &Candidate, deadline: Instant) -> Outcome {
        let Some(label) = candidate.label() else {
            return unsupported(self.name(), candidate);
        };
        let name = format!("{}.{}", label, self.domain);
        // Trailing dot keeps search domains out of the query.
        let fqdn = format!("{}.", name);
        match timeout_at(deadline, self.resolver.lookup_a(&fqdn)).await {
            Ok(Ok(ips)) if ips.is_empty() => Outcome::Dead(None),
            Ok(Ok(ips)) => {
                let mut uniq: Vec<IpAddr> = ips.into_iter().map(IpAddr::V4).collect();
                uniq.sort();
                uniq.dedup();
                let (http_status, title) = match &self.enricher {
                    Some(enricher) if remaining(deadline) > ENRICH_RESERVE => {
                        enricher.check(&name, deadline - ENRICH_RESERVE).await
                    }
                    Some(_) => {
                        tracing::debug!("no time left to check {} over HTTP", name);
                        (None, None)
                    }
                    None => (None, None),
                };
                tracing::debug!("{} -> {:?}", name, uniq);
                Outcome::Live(ProbeMeta::Dns {
                    name,
                    ips: uniq,
                    http_status,
                    title,
                })
            }
            Ok(Err(LookupError::NotFound)) => Outcome::Dead(None),
            Ok(Err(LookupError::Failed(e))) => Outcome::error(format!("resolver: {}", e)),
            Err(_) => self.timeout_policy().outcome(),
        }
    }
}

/// Check whether the base domain answers for any label. Returns the
/// addresses a random label resolved to, if it did.
pub async fn detect_wildcard<R: NameResolver>(
    resolver: &R,
    domain: &str,
    resolve_timeout: Duration,
) -> Option<Vec<Ipv4Addr>> {
    let rand_label: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    let test = format!("{}.{}.", rand_label.to_ascii_lowercase(), normalize_domain(domain));
    match timeout(resolve_timeout, resolver.lookup_a(&test)).await {
        Ok(Ok(ips)) if !ips.is_empty() => Some(ips),
        _ => None,
    }
}
