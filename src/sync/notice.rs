//! User-facing notifications
//!
//! A desktop front-end shows these as blocking message boxes; the core only
//! hands them to whatever `Notifier` the deployment provides.

use std::fmt;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Persisting a change failed; the field keeps the user's value
    WriteFailed {
        section: String,
        key: String,
        message: String,
    },
    /// Free-text input rejected by validation; the store was left untouched
    InvalidInput {
        section: String,
        key: String,
        value: String,
        message: String,
    },
    /// Helper program could not be started or produced no result
    LaunchFailed { tool: String, message: String },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::WriteFailed { .. } => "Error",
            Notice::InvalidInput { .. } => "Invalid Input",
            Notice::LaunchFailed { .. } => "Error",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WriteFailed { section, key, message } => {
                write!(f, "Failed to update config [{section}] {key}: {message}")
            }
            Notice::InvalidInput { key, message, .. } => write!(f, "{key} {message}"),
            Notice::LaunchFailed { tool, message } => {
                write!(f, "Failed to launch {tool}: {message}")
            }
        }
    }
}

/// Receiver of user-facing notifications
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Notifier for headless use: logs and echoes to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::InvalidInput { .. } => warn!(notice = ?notice, "Validation error"),
            _ => error!(notice = ?notice, "Operation failed"),
        }
        eprintln!("{}: {}", notice.title(), notice);
    }
}

/// Collects notices for later inspection
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: std::cell::RefCell<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
