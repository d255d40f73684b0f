//! Errors raised while driving the extraction.
//!
//! The synthesis core never fails; "no explanation" is an ordinary `None` or `false`. Errors only
//! come from the outside world: reading configuration, running git, writing results.

use std::process::ExitStatus;

/// Convenience alias for results carrying [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by configuration loading and extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file or pipe failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Encoding or decoding JSON failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A git invocation exited unsuccessfully.
    #[error("`git {args}` failed ({status}): {stderr}")]
    Git {
        /// Arguments passed to git.
        args: String,
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
