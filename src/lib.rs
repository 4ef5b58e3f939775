//! Time-boxed liveness probing of ports, web paths and subdomains.
//!
//! A scan builds a [`profile::CandidateSet`], hands it to a
//! [`scan::ScanEngine`] together with a [`probe::Probe`], and turns the
//! engine's outcomes into a [`report::ScanReport`].

pub mod candidate;
pub mod config;
pub mod db;
pub mod dns;
pub mod error;
pub mod output;
pub mod probe;
pub mod profile;
pub mod report;
pub mod scan;

pub use candidate::Candidate;
pub use error::ScanError;
