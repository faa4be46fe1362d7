//! Shared engine plumbing.

use derive_new::new;
use std::fmt;

/// A user-facing failure with a prescribed one-line message.
///
/// Engine operations return `anyhow::Result`; a `UserError` in the chain
/// marks the failure as part of the command-line contract. The CLI prints
/// the message to stdout and exits with status 0, while any other error is
/// reported on stderr with a nonzero status.
#[derive(Debug, Clone, new)]
pub struct UserError {
    message: String,
}

impl UserError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserError {}

/// Build an `anyhow::Error` carrying a prescribed user-facing message.
pub fn user_error(message: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(UserError::new(message.into()))
}
