//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (level, message, structured fields)
//!
//! Consumers:
//!     → logging.rs fmt layer (stdout, ANSI-coloured levels)
//! ```

pub mod logging;

pub use logging::init_logging;
