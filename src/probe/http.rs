use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url, redirect};
use tokio::time::{Instant, timeout_at};

use crate::candidate::Candidate;
use crate::config::default::{
    DEFAULT_HTTP_BODY_LIMIT, DEFAULT_PATH_PROBE_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
use crate::error::ScanError;
use crate::probe::{Outcome, Probe, ProbeMeta, TimeoutPolicy, unsupported};

/// Settings of the HTTP path probe
#[derive(Clone, Debug)]
pub struct HttpProbeConfig {
    /// Request timeout enforced by the client itself
    pub timeout: Duration,
    /// Maximum body bytes read per response
    pub body_limit: usize,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for HttpProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_PATH_PROBE_TIMEOUT_MS),
            body_limit: DEFAULT_HTTP_BODY_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// Status line facts kept from one response
#[derive(Debug, Clone)]
struct HttpHit {
    status: u16,
    size: u64,
    content_type: Option<String>,
}

/// Whether a status proves the path exists. Access-denied counts.
pub fn is_live_status(status: u16) -> bool {
    (200..400).contains(&status) || status == 401 || status == 403
}

/// Normalize a user-supplied base URL: default to http, drop trailing `/`.
pub fn normalize_base_url(target: &str) -> Result<String, ScanError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ScanError::InvalidTarget("empty base URL".into()));
    }
    let with_scheme = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };
    let url = Url::parse(&with_scheme)
        .map_err(|e| ScanError::InvalidTarget(format!("{}: {}", target, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ScanError::InvalidTarget(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ScanError::InvalidTarget(format!("{}: missing host", target)));
    }
    Ok(with_scheme.trim_end_matches('/').to_string())
}

/// Read at most `limit` body bytes, returning how many were read.
pub(crate) async fn read_body_bounded(
    response: &mut Response,
    limit: usize,
    keep: Option<&mut Vec<u8>>,
) -> Result<usize, reqwest::Error> {
    let mut read = 0usize;
    let mut keep = keep;
    while read < limit {
        match response.chunk().await? {
            Some(chunk) => {
                let take = chunk.len().min(limit - read);
                if let Some(buf) = keep.as_deref_mut() {
                    buf.extend_from_slice(&chunk[..take]);
                }
                read += take;
            }
            None => break,
        }
    }
    Ok(read)
}

/// HTTP GET probe for hidden paths under a base URL. Redirects are not
/// followed; a 3xx is reported with its own status.
pub struct HttpPathProbe {
    client: Client,
    base_url: String,
    body_limit: usize,
}

impl HttpPathProbe {
    pub fn new(base_url: &str, config: HttpProbeConfig) -> Result<Self, ScanError> {
        let base_url = normalize_base_url(base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ScanError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            body_limit: config.body_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, url: &str) -> Result<HttpHit, reqwest::Error> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let read = read_body_bounded(&mut response, self.body_limit, None).await?;
        Ok(HttpHit {
            status,
            size: content_length.unwrap_or(read as u64),
            content_type,
        })
    }
}

fn classify(url: String, hit: HttpHit) -> Outcome {
    let status = hit.status;
    if is_live_status(status) {
        let fallback = if status == 401 || status == 403 {
            "protected"
        } else {
            "unknown"
        };
        Outcome::Live(ProbeMeta::Http {
            url,
            status,
            size: hit.size,
            content_type: hit.content_type.unwrap_or_else(|| fallback.to_string()),
        })
    } else {
        Outcome::Dead(Some(ProbeMeta::Http {
            url,
            status,
            size: hit.size,
            content_type: hit.content_type.unwrap_or_else(|| "unknown".to_string()),
        }))
    }
}

#[async_trait]
impl Probe for HttpPathProbe {
    fn name(&self) -> &'static str {
        "http"
    }

    fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy::Error
    }

    async fn probe(&self, candidate: &Candidate, deadline: Instant) -> Outcome {
        let Some(path) = candidate.path() else {
            return unsupported(self.name(), candidate);
        };
        let url = format!("{}{}", self.base_url, path);
        match timeout_at(deadline, self.fetch(&url)).await {
            Ok(Ok(hit)) => {
                tracing::debug!("GET {} -> {}", url, hit.status);
                classify(url, hit)
            }
            Ok(Err(e)) if e.is_timeout() => self.timeout_policy().outcome(),
            Ok(Err(e)) => Outcome::error(format!("GET {}: {}", url, e)),
            Err(_) => self.timeout_policy().outcome(),
        }
    }
}
