//! Client authentication settings: persistence, device identity and proxy checks.

pub mod config;
pub mod device;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod translation;

pub use config::{AuthSettings, LoadOptions, SettingsError};
pub use lifecycle::{bootstrap, Session, StartupOptions};
pub use proxy::{ProxyProbe, ProxyStatus};
