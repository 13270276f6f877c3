//! Outbound proxy verification.
//!
//! # Responsibilities
//! - Look up the public IP once directly and once through the configured proxy
//! - Classify the outcome as unproxied, confirmed, unverified or not applied
//!
//! # Design Decisions
//! - The direct client ignores environment proxy variables
//! - A proxied lookup that fails outright cannot prove misconfiguration and is
//!   reported as `Unverified` rather than an error
//! - With proxying disabled the lookup is informational only, so its failure
//!   is logged and reported as `DirectUnknown`
//! - No timeout or retry; a failed direct lookup with a proxy configured is
//!   returned to the caller
//! - Terminating the process is left to the caller (see `lifecycle::startup`)

use reqwest::{Client, Proxy};

use crate::config::model::ProxyConfig;
use crate::proxy::ProxyError;
use crate::translation::{Message, Translator};

/// Public "what is my IP" endpoint, answering with a bare address.
pub const DEFAULT_IP_ENDPOINT: &str = "https://api.ipify.org/?format=text";

/// Outcome of a successful proxy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyStatus {
    /// Proxying is disabled; only the direct lookup ran.
    Direct { ip: String },
    /// Proxying is disabled and the direct lookup failed.
    DirectUnknown,
    /// The proxied lookup reported a different address.
    Confirmed { direct: String, proxied: String },
    /// The proxied lookup failed, so the proxy could not be verified.
    Unverified { direct: String },
}

/// Compares the direct and proxied public IP.
#[derive(Debug, Clone)]
pub struct ProxyProbe {
    endpoint: String,
}

impl Default for ProxyProbe {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_IP_ENDPOINT.to_string(),
        }
    }
}

impl ProxyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different IP lookup endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs the check against `config`, logging through `translator`.
    pub async fn check(
        &self,
        config: &ProxyConfig,
        translator: &dyn Translator,
    ) -> Result<ProxyStatus, ProxyError> {
        let proxy_url = config.proxy_url()?;
        let direct_client = Client::builder().no_proxy().build()?;
        let direct = fetch_ip(&direct_client, &self.endpoint).await;

        let Some(proxy_url) = proxy_url else {
            return Ok(match direct {
                Ok(ip) => {
                    tracing::info!(
                        ip = %ip,
                        "{}",
                        translator.translate(Message::Unproxied, &[&ip])
                    );
                    ProxyStatus::Direct { ip }
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        error = %e,
                        "{}",
                        translator.translate(Message::Unproxied, &["UNKNOWN"])
                    );
                    ProxyStatus::DirectUnknown
                }
            });
        };
        let direct = direct.map_err(ProxyError::DirectLookup)?;

        let mut proxy = Proxy::all(proxy_url.as_str())
            .map_err(|e| ProxyError::InvalidProxy(e.to_string()))?;
        if let Some((username, password)) = config.credentials() {
            proxy = proxy.basic_auth(username, password);
        }
        let proxied_client = Client::builder().proxy(proxy).build()?;

        let proxied = match fetch_ip(&proxied_client, &self.endpoint).await {
            Ok(ip) => ip,
            Err(e) => {
                tracing::warn!(
                    proxy = %proxy_url,
                    error = %e,
                    "{}",
                    translator.translate(Message::Proxied, &[&direct, "INVALID PROXY"])
                );
                return Ok(ProxyStatus::Unverified { direct });
            }
        };

        let message = translator.translate(Message::Proxied, &[&direct, &proxied]);
        if direct == proxied {
            tracing::error!(ip = %direct, "{}", message);
            return Err(ProxyError::ProxyNotApplied { ip: direct });
        }

        tracing::info!(direct = %direct, proxied = %proxied, "{}", message);
        Ok(ProxyStatus::Confirmed { direct, proxied })
    }
}

async fn fetch_ip(client: &Client, endpoint: &str) -> Result<String, reqwest::Error> {
    let body = client
        .get(endpoint)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body.trim().to_string())
}
