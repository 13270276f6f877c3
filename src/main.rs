//! Client session bootstrap.
//!
//! ```text
//! auth.json ──▶ load + validate ──▶ resolve device ──▶ save ──▶ proxy check ──▶ ready
//!                     │                    │                          │
//!                     ▼                    ▼                          ▼
//!              operator review       unknown package            proxy not applied
//!              (continue/abort)         (fatal)             (acknowledge, then fatal)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use auth_settings::config::LoadOptions;
use auth_settings::lifecycle::{bootstrap, ConsoleOperator, Operator, StartupOptions, UnattendedOperator};
use auth_settings::observability::init_logging;
use auth_settings::proxy::{ProxyProbe, ProxyStatus, DEFAULT_IP_ENDPOINT};
use auth_settings::translation::English;

#[derive(Parser)]
#[command(name = "auth-settings")]
#[command(about = "Load client auth settings and verify the outbound proxy", long_about = None)]
struct Cli {
    /// Settings document to load (created with defaults if absent).
    #[arg(short, long, default_value = "config/auth.json")]
    config: PathBuf,

    /// Validate the document against its schema before loading.
    #[arg(long)]
    validate: bool,

    /// Do not write the normalized document back.
    #[arg(long)]
    skip_save: bool,

    /// Skip the proxy check.
    #[arg(long)]
    no_proxy_check: bool,

    /// Never wait for console input.
    #[arg(long)]
    non_interactive: bool,

    /// Public IP lookup endpoint used by the proxy check.
    #[arg(long, default_value = DEFAULT_IP_ENDPOINT)]
    ip_endpoint: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("auth_settings=info");

    let cli = Cli::parse();
    let operator: Arc<dyn Operator> = if cli.non_interactive {
        Arc::new(UnattendedOperator)
    } else {
        Arc::new(ConsoleOperator)
    };

    let mut options = StartupOptions::new(&cli.config);
    options.load = LoadOptions {
        skip_save: cli.skip_save,
        validate: cli.validate,
    };
    options.check_proxy = !cli.no_proxy_check;
    options.probe = ProxyProbe::with_endpoint(cli.ip_endpoint);

    let session = bootstrap(&options, operator, &English)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))?;

    if let Some(ProxyStatus::Unverified { direct }) = &session.proxy {
        tracing::warn!(ip = %direct, "Proxy could not be verified, continuing");
    }
    tracing::info!(
        device_id = %session.settings.device_config.device_id,
        "Session ready"
    );
    Ok(())
}
