//! Probe capability and its outcome types.
//!
//! A probe tests one candidate against the scan target and classifies it.
//! Ordinary network failures (refused, timed out, NXDOMAIN) are `Dead`;
//! `Error` is reserved for faults that say nothing about the candidate.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::Instant;

use crate::candidate::Candidate;

pub mod dns;
pub mod http;
pub mod tcp;

pub use dns::{DnsProbe, LookupError, NameResolver, SystemResolver};
pub use http::{HttpPathProbe, HttpProbeConfig};
pub use tcp::TcpConnectProbe;

/// Reason recorded when a probe outlives its budget and the timeout policy is `Error`.
pub const TIMEOUT_REASON: &str = "timeout";

/// Details gathered while probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeMeta {
    Port {
        #[serde(skip_serializing_if = "Option::is_none")]
        service: Option<String>,
        rtt_ms: u64,
    },
    Http {
        url: String,
        status: u16,
        size: u64,
        content_type: String,
    },
    Dns {
        name: String,
        ips: Vec<IpAddr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl ProbeMeta {
    /// HTTP status carried by this metadata, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ProbeMeta::Http { status, .. } => Some(*status),
            ProbeMeta::Dns { http_status, .. } => *http_status,
            ProbeMeta::Port { .. } => None,
        }
    }
}

/// Classified result of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Live(ProbeMeta),
    /// The target answered (or failed to) in a way that shows the candidate is absent.
    Dead(Option<ProbeMeta>),
    /// Probe-internal fault unrelated to the candidate's liveness.
    Error(String),
    /// Assigned by the engine when the global deadline hit before this candidate finished.
    Cancelled,
}

impl Outcome {
    pub fn error<S: Into<String>>(reason: S) -> Self {
        Outcome::Error(reason.into())
    }
    pub fn is_live(&self) -> bool {
        matches!(self, Outcome::Live(_))
    }
    pub fn is_dead(&self) -> bool {
        matches!(self, Outcome::Dead(_))
    }
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_) | Outcome::Cancelled)
    }
}

/// What running out of time means for a probe kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Silence is evidence of absence (e.g. filtered or closed TCP port)
    Dead,
    /// Silence says nothing about the candidate (e.g. resolver did not answer)
    Error,
}

impl TimeoutPolicy {
    pub fn outcome(self) -> Outcome {
        match self {
            TimeoutPolicy::Dead => Outcome::Dead(None),
            TimeoutPolicy::Error => Outcome::error(TIMEOUT_REASON),
        }
    }
}

/// Liveness test for one candidate.
///
/// Implementations must return by `deadline` on their own and must not
/// panic on ordinary network failure.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;
    fn timeout_policy(&self) -> TimeoutPolicy;
    async fn probe(&self, candidate: &Candidate, deadline: Instant) -> Outcome;
}

/// Time left until `deadline`, zero if already past.
pub fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Outcome for a candidate of the wrong kind for the probe.
pub(crate) fn unsupported(probe: &str, candidate: &Candidate) -> Outcome {
    Outcome::error(format!(
        "{} probe cannot test {} candidate '{}'",
        probe,
        candidate.kind(),
        candidate
    ))
}
