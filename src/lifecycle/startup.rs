//! Session startup orchestration.
//!
//! # Responsibilities
//! - Load and normalize the settings file
//! - Verify the outbound proxy before the client goes online
//! - Classify fatal outcomes for the binary to act on
//!
//! # Design Decisions
//! - Fail fast: an unknown device package or an ineffective proxy is fatal
//! - The operator acknowledges a proxy failure before the error is returned
//! - Steps run strictly in order; nothing is spawned

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AuthSettings, LoadOptions, SettingsError};
use crate::lifecycle::operator::Operator;
use crate::proxy::{ProxyError, ProxyProbe, ProxyStatus};
use crate::translation::{Message, Translator};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("proxy check failed: {0}")]
    Proxy(#[from] ProxyError),
}

/// Inputs for [`bootstrap`].
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub settings_path: PathBuf,
    pub load: LoadOptions,
    pub check_proxy: bool,
    pub probe: ProxyProbe,
}

impl StartupOptions {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            load: LoadOptions::default(),
            check_proxy: true,
            probe: ProxyProbe::default(),
        }
    }
}

/// A ready client session.
#[derive(Debug)]
pub struct Session {
    pub settings: AuthSettings,
    /// `None` when the proxy check was skipped.
    pub proxy: Option<ProxyStatus>,
}

/// Loads settings and checks the proxy.
pub async fn bootstrap(
    options: &StartupOptions,
    operator: Arc<dyn Operator>,
    translator: &dyn Translator,
) -> Result<Session, StartupError> {
    let mut settings = AuthSettings::new().with_operator(operator.clone());
    settings.load(&options.settings_path, options.load)?;

    tracing::info!(
        path = %options.settings_path.display(),
        auth_type = ?settings.auth_config.auth_type,
        platform = ?settings.device_config.device_platform,
        package = %settings.device_config.device_package_name,
        "Settings loaded"
    );

    if !options.check_proxy {
        return Ok(Session {
            settings,
            proxy: None,
        });
    }

    match options.probe.check(&settings.proxy_config, translator).await {
        Ok(status) => Ok(Session {
            settings,
            proxy: Some(status),
        }),
        Err(e @ ProxyError::ProxyNotApplied { .. }) => {
            let message = translator.translate(Message::FixProxySettings, &[]);
            tracing::error!("{}", message);
            operator.acknowledge(&message);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
