//! Shell-level error taxonomy.

use thiserror::Error;

use crate::model::WindowId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by the desktop runtime. None of them is fatal to the shell.
pub enum ShellError {
    /// Launch of an app id missing from the catalog.
    #[error("unknown app `{0}`")]
    UnknownApp(String),
    /// The target window id is not open.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
    /// An async completion arrived for a window that no longer exists.
    #[error("dropped app event for closed window {0}")]
    StaleAppEvent(WindowId),
    /// A required form field was empty; shown inline by the app.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Token missing, rejected or not refreshable.
    #[error("authentication failed: {0}")]
    AuthFailure(String),
    /// A backend list/send call failed.
    #[error("{service} unavailable: {reason}")]
    ServiceUnavailable {
        /// Human-readable service name.
        service: String,
        /// Transport or backend reason.
        reason: String,
    },
    /// The chat assistant did not answer in time.
    #[error("no reply within {timeout_ms} ms")]
    ResponseTimeout {
        /// Reply bound that elapsed.
        timeout_ms: u64,
    },
}

impl ShellError {
    /// Builds a [`ShellError::ServiceUnavailable`].
    pub fn service_unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

impl From<desktop_app_email::ComposeError> for ShellError {
    fn from(err: desktop_app_email::ComposeError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_email::{ComposeError, ComposeField};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn messages_read_as_notices() {
        assert_eq!(
            ShellError::service_unavailable("Notes", "HTTP 502").to_string(),
            "Notes unavailable: HTTP 502"
        );
        assert_eq!(
            ShellError::from(ComposeError::EmptyField(ComposeField::Subject)).to_string(),
            "validation failed: Subject is required"
        );
        assert_eq!(
            ShellError::WindowNotFound(WindowId(4)).to_string(),
            "window 4 not found"
        );
    }
}
