//! Domain errors raised outside the ledger kernel.
//! Services return `anyhow::Result` and wrap these, so callers can
//! `downcast_ref::<BunkrError>()` when they need to branch on the cause.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BunkrError {
    #[error("Invalid target percentage: {0} (expected 1-100)")]
    InvalidTarget(i64),

    #[error("Subject name must not be empty")]
    EmptyName,

    #[error("Subject '{0}' already exists")]
    DuplicateSubject(String),

    #[error("No subject matches '{0}'")]
    NotFound(String),

    #[error("'{query}' is ambiguous, matches: {}", .matches.join(", "))]
    AmbiguousSubject { query: String, matches: Vec<String> },

    #[error("Unknown action: '{0}'")]
    UnknownAction(String),

    #[error("'{input}' could be any of: {}", .matches.join(", "))]
    AmbiguousAction { input: String, matches: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),
}
