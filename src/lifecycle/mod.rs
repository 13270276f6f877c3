//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load settings → Resolve device → Save → Check proxy → Session
//!
//! Operator (operator.rs):
//!     Validation errors → review (continue / abort)
//!     Fatal condition → acknowledge → caller exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then the network probe
//! - Terminal interaction sits behind the `Operator` trait so the core stays testable

pub mod operator;
pub mod startup;

pub use operator::{ConsoleOperator, FailFastOperator, Operator, Review, UnattendedOperator};
pub use startup::{bootstrap, Session, StartupError, StartupOptions};
