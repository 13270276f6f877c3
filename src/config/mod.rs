//! Settings management subsystem.
//!
//! # Data Flow
//! ```text
//! auth.json
//!     → loader.rs (read, optional validation, merge over defaults)
//!         → validation.rs (schema + semantic diagnostics, positioned)
//!             → schema.rs (static JSON schema)
//!     → device::resolver (concrete device identity)
//!     → loader.rs (write normalized auth.json + auth.schema.json)
//!     → AuthSettings (owned by the client session)
//! ```
//!
//! # Design Decisions
//! - All fields have declared defaults so a missing or partial file still loads
//! - Validation is diagnostic: the operator decides whether to continue
//! - Validation separates syntactic (serde) from structural and semantic checks

pub mod loader;
pub mod model;
pub mod schema;
pub mod validation;

pub use loader::{AuthSettings, LoadOptions, SettingsError};
pub use model::{
    AuthConfig, AuthType, DeviceConfig, DevicePlatform, PackageSelector, ProxyConfig,
    PLACEHOLDER_DEVICE_ID,
};
pub use validation::ValidationError;
