//! Human-in-the-loop review policy.
//!
//! The settings pipeline never reads the terminal itself. When validation
//! fails or a fatal condition needs acknowledging, it asks an [`Operator`].

use std::io::{self, BufRead, Write};

use crate::config::validation::ValidationError;

/// Operator decision after reviewing validation diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Review {
    Continue,
    Abort,
}

pub trait Operator: Send + Sync {
    /// Called after the diagnostics for `file` have been logged.
    fn review_validation(&self, file: &str, errors: &[ValidationError]) -> Review;

    /// Blocks until the operator has seen `message`.
    fn acknowledge(&self, message: &str);
}

/// Logs and carries on. Used when nobody is watching the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnattendedOperator;

impl Operator for UnattendedOperator {
    fn review_validation(&self, file: &str, errors: &[ValidationError]) -> Review {
        tracing::warn!(file, errors = errors.len(), "Continuing despite validation errors");
        Review::Continue
    }

    fn acknowledge(&self, _message: &str) {}
}

/// Rejects any document with validation errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFastOperator;

impl Operator for FailFastOperator {
    fn review_validation(&self, _file: &str, _errors: &[ValidationError]) -> Review {
        Review::Abort
    }

    fn acknowledge(&self, _message: &str) {}
}

/// Interactive review on stdin/stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn review_validation(&self, file: &str, _errors: &[ValidationError]) -> Review {
        tracing::warn!(
            "Fix {} and restart, type 'a' to abort, or press Enter to ignore and continue...",
            file
        );
        let _ = io::stdout().flush();
        read_review(&mut io::stdin().lock())
    }

    fn acknowledge(&self, message: &str) {
        println!("{}", message);
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
    }
}

/// Reads one answer line. Anything but `a`/`abort` continues, as does EOF.
fn read_review<R: BufRead>(input: &mut R) -> Review {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) if matches!(line.trim().to_ascii_lowercase().as_str(), "a" | "abort") => {
            Review::Abort
        }
        _ => Review::Continue,
    }
}
