//! Error types for scitsifreine.
//!
//! All errors are represented by [`ScitsiError`]. Every variant is fatal to
//! the current invocation; a missing inventory group is not an error and is
//! reported as `None` by [`crate::inventory::Inventory::get_hosts`].

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors that can occur in scitsifreine.
#[derive(Error, Debug)]
pub enum ScitsiError {
    /// Fewer than two hosts were supplied.
    #[error("At least two hosts are required, got {0}")]
    InvalidHostList(usize),

    /// Refusing to build a session from inside another tmux session.
    #[error("Cannot run inside an existing tmux session")]
    NestedSession,

    /// A tmux command exited with a non-zero status.
    #[error("Command `{command}` failed: {stderr}")]
    CommandExecution {
        /// The command line that failed.
        command: String,
        /// Captured standard error of the command.
        stderr: String,
    },

    /// Killing the session on exit failed.
    #[error("Failed to close tmux session {session}: {stderr}")]
    SessionTeardown {
        /// Name of the session that could not be killed.
        session: String,
        /// Captured standard error of `kill-session`.
        stderr: String,
    },

    /// No inventory path is configured for the environment.
    #[error("No inventory source configured for environment '{0}'")]
    NoInventorySource(String),

    /// The tmux binary could not be run.
    #[error("Cannot find tmux, please install it first: {0}")]
    TmuxUnavailable(String),

    /// Config file does not exist at the requested path.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Could not determine the user's config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// Failed to read a file from disk.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML config parsing failed.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An inventory file is malformed.
    #[error("Failed to parse inventory {path}: {message}")]
    InventoryParse {
        /// Inventory file, or `<inline>` for in-memory sources.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// The inventory format could not be determined.
    #[error("Unknown inventory format for {0}")]
    UnknownInventoryFormat(PathBuf),
}

impl ScitsiError {
    pub(crate) fn inventory(message: impl Into<String>) -> Self {
        ScitsiError::InventoryParse {
            path: "<inline>".into(),
            message: message.into(),
        }
    }
}

/// Convenient Result type alias for scitsifreine operations.
pub type Result<T> = std::result::Result<T, ScitsiError>;
