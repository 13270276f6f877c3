//! Proxy verification subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyConfig (finalized settings)
//!     → probe.rs: direct IP lookup
//!     → probe.rs: proxied IP lookup (only when UseProxy)
//!     → ProxyStatus, or ProxyError::ProxyNotApplied
//!     → lifecycle::startup decides whether the session may continue
//! ```

pub mod probe;

use thiserror::Error;

pub use probe::{ProxyProbe, ProxyStatus, DEFAULT_IP_ENDPOINT};

/// Errors that can occur while checking the proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The unproxied IP lookup failed.
    #[error("Direct IP lookup failed: {0}")]
    DirectLookup(#[source] reqwest::Error),

    /// Proxying is enabled but host or port is unusable.
    #[error("Invalid proxy settings: {0}")]
    InvalidProxy(String),

    /// The proxied lookup returned the direct address.
    #[error("Proxy is not applied: traffic still leaves from {ip}")]
    ProxyNotApplied { ip: String },
}
