use crate::candidate::Candidate;
use crate::db::Wordlists;
use crate::error::ScanError;

use super::CandidateAccumulator;

/// Port scan profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortProfile {
    /// A dozen of the most commonly exposed service ports
    Quick,
    /// The first 100 entries of the top-port list
    Intense,
    /// The whole bundled top-port list
    All,
    /// Port spec: "80,443" | "8000-8010" | "quick,3000-3010" | "top-20"
    Custom(String),
}

/// Get the first `n` ports of the bundled top-port list
fn top_ports(wordlists: &Wordlists, n: usize) -> impl Iterator<Item = u16> + '_ {
    wordlists.top_ports.iter().copied().take(n)
}

pub(super) fn expand(
    profile: &PortProfile,
    wordlists: &Wordlists,
    acc: &mut CandidateAccumulator,
) -> Result<(), ScanError> {
    match profile {
        PortProfile::Quick => push_ports(acc, wordlists.quick_ports.iter().copied()),
        PortProfile::Intense => push_ports(acc, top_ports(wordlists, 100)),
        PortProfile::All => push_ports(acc, wordlists.top_ports.iter().copied()),
        PortProfile::Custom(spec) => parse_port_spec(spec, wordlists, acc)?,
    }
    Ok(())
}

fn push_ports<I: Iterator<Item = u16>>(acc: &mut CandidateAccumulator, ports: I) {
    for p in ports {
        acc.push(Candidate::Port(p));
    }
}

fn parse_port_number(s: &str, part: &str) -> Result<u16, ScanError> {
    let n: u32 = s
        .trim()
        .parse()
        .map_err(|_| ScanError::invalid_profile(format!("invalid port in '{part}'")))?;
    if n == 0 || n > u16::MAX as u32 {
        return Err(ScanError::invalid_profile(format!(
            "port out of range in '{part}'"
        )));
    }
    Ok(n as u16)
}

/// Expand a comma-separated union of port numbers, ranges and named sets.
fn parse_port_spec(
    spec: &str,
    wordlists: &Wordlists,
    acc: &mut CandidateAccumulator,
) -> Result<(), ScanError> {
    let parts: Vec<&str> = spec
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(ScanError::invalid_profile("empty port spec"));
    }
    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "quick" => push_ports(acc, wordlists.quick_ports.iter().copied()),
            "intense" => push_ports(acc, top_ports(wordlists, 100)),
            "all" => push_ports(acc, wordlists.top_ports.iter().copied()),
            lower => {
                if let Some(nstr) = lower.strip_prefix("top-") {
                    let n: usize = nstr.parse().map_err(|_| {
                        ScanError::invalid_profile(format!("invalid top-N spec '{part}'"))
                    })?;
                    push_ports(acc, top_ports(wordlists, n));
                } else if let Some((a, b)) = part.split_once('-') {
                    let start = parse_port_number(a, part)?;
                    let end = parse_port_number(b, part)?;
                    if start > end {
                        return Err(ScanError::invalid_profile(format!("invalid range: {part}")));
                    }
                    push_ports(acc, start..=end);
                } else {
                    let p = parse_port_number(part, part)?;
                    acc.push(Candidate::Port(p));
                }
            }
        }
    }
    Ok(())
}
