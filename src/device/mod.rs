//! Device identity subsystem.
//!
//! # Data Flow
//! ```text
//! DeviceConfig (merged from auth.json)
//!     → resolver.rs (platform branch: random / custom / named profile)
//!         → catalog.rs (known Android and iOS profiles)
//!     → id.rs (fresh id if empty or placeholder)
//!     → DeviceConfig (concrete, persisted on next save)
//! ```

pub mod catalog;
pub mod id;
pub mod resolver;

use thiserror::Error;

pub use catalog::{DeviceCatalog, DeviceInfo};
pub use id::generate_device_id;
pub use resolver::resolve_device;

/// Errors raised while resolving the device identity.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// `DevicePackageName` names no known Android profile.
    #[error(
        "Invalid device info package '{0}'! Check your auth.json file and make sure a valid \
         DevicePackageName is set. For simple use set it to 'random'. If you have a custom \
         device, then set it to 'custom'."
    )]
    UnknownPackage(String),

    /// The catalog has no profiles to pick from.
    #[error("No {0} device profiles are available")]
    EmptyCatalog(&'static str),
}
