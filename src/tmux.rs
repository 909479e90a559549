//! Tmux command construction and execution.
//!
//! Every tmux interaction is one [`TmuxCommand`], turned into an argument
//! vector by [`TmuxCommand::args`] and executed by a [`TmuxRunner`]. The
//! process-backed runner is [`SystemTmux`]; tests substitute a recording
//! runner.
//!
//! Commands are issued without an explicit session target where tmux falls
//! back to the most recently created session, which is the one being built.

use crate::error::{Result, ScitsiError};
use std::fmt;
use std::process::Command;
use tracing::debug;

/// Name given to the first window of every session.
pub const WINDOW_NAME: &str = "ssh-sessions";

/// A single tmux invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxCommand {
    /// `new-session -d -s <name>`
    NewSession { name: String },
    /// `rename-window -t <window> <name>`
    RenameWindow { window: u32, name: String },
    /// `split-window -v`
    SplitVertical,
    /// `split-window -h`
    SplitHorizontal,
    /// `select-pane -t <pane>`
    SelectPane { pane: usize },
    /// `select-pane -t <pane> -T <title>`
    SetPaneTitle { pane: usize, title: String },
    /// `send-keys -t <pane> <keys> C-m`
    SendKeys { pane: usize, keys: String },
    /// `attach-session -t <session>:0`
    AttachSession { session: String },
    /// `kill-session -t <session>`
    KillSession { session: String },
}

impl TmuxCommand {
    /// Arguments passed to the `tmux` binary.
    pub fn args(&self) -> Vec<String> {
        match self {
            TmuxCommand::NewSession { name } => {
                vec!["new-session".into(), "-d".into(), "-s".into(), name.clone()]
            }
            TmuxCommand::RenameWindow { window, name } => vec![
                "rename-window".into(),
                "-t".into(),
                window.to_string(),
                name.clone(),
            ],
            TmuxCommand::SplitVertical => vec!["split-window".into(), "-v".into()],
            TmuxCommand::SplitHorizontal => vec!["split-window".into(), "-h".into()],
            TmuxCommand::SelectPane { pane } => {
                vec!["select-pane".into(), "-t".into(), pane.to_string()]
            }
            TmuxCommand::SetPaneTitle { pane, title } => vec![
                "select-pane".into(),
                "-t".into(),
                pane.to_string(),
                "-T".into(),
                title.clone(),
            ],
            TmuxCommand::SendKeys { pane, keys } => vec![
                "send-keys".into(),
                "-t".into(),
                pane.to_string(),
                keys.clone(),
                "C-m".into(),
            ],
            TmuxCommand::AttachSession { session } => vec![
                "attach-session".into(),
                "-t".into(),
                format!("{}:0", session),
            ],
            TmuxCommand::KillSession { session } => {
                vec!["kill-session".into(), "-t".into(), session.clone()]
            }
        }
    }
}

impl fmt::Display for TmuxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmux")?;
        for arg in self.args() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Executes tmux commands.
pub trait TmuxRunner {
    /// Whether the current process already runs inside a tmux session.
    fn inside_session(&self) -> bool;

    /// Run a command to completion with captured output.
    ///
    /// # Errors
    ///
    /// Returns [`ScitsiError::CommandExecution`] if the command cannot be
    /// spawned or exits non-zero.
    fn run(&mut self, command: &TmuxCommand) -> Result<()>;

    /// Run a command attached to the caller's terminal, blocking until it exits.
    fn run_interactive(&mut self, command: &TmuxCommand) -> Result<()>;
}

impl<R: TmuxRunner + ?Sized> TmuxRunner for &mut R {
    fn inside_session(&self) -> bool {
        (**self).inside_session()
    }

    fn run(&mut self, command: &TmuxCommand) -> Result<()> {
        (**self).run(command)
    }

    fn run_interactive(&mut self, command: &TmuxCommand) -> Result<()> {
        (**self).run_interactive(command)
    }
}

/// Runs tmux commands as child processes of this program.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTmux;

impl SystemTmux {
    pub fn new() -> Self {
        SystemTmux
    }
}

impl TmuxRunner for SystemTmux {
    fn inside_session(&self) -> bool {
        in_tmux()
    }

    fn run(&mut self, command: &TmuxCommand) -> Result<()> {
        debug!(%command, "running tmux command");
        let output = Command::new("tmux")
            .args(command.args())
            .output()
            .map_err(|e| execution_error(command, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(execution_error(command, stderr));
        }

        Ok(())
    }

    fn run_interactive(&mut self, command: &TmuxCommand) -> Result<()> {
        debug!(%command, "running interactive tmux command");
        let status = Command::new("tmux")
            .args(command.args())
            .status()
            .map_err(|e| execution_error(command, e.to_string()))?;

        if !status.success() {
            return Err(execution_error(command, format!("exited with {}", status)));
        }

        Ok(())
    }
}

fn execution_error(command: &TmuxCommand, stderr: String) -> ScitsiError {
    ScitsiError::CommandExecution {
        command: command.to_string(),
        stderr,
    }
}

/// Check if we're running inside a tmux session.
///
/// Checks for the `TMUX` environment variable, which tmux sets when active.
pub fn in_tmux() -> bool {
    std::env::var_os("TMUX").is_some()
}

/// Report the installed tmux version (`tmux -V`).
///
/// # Errors
///
/// Returns [`ScitsiError::TmuxUnavailable`] if tmux cannot be run.
pub fn version() -> Result<String> {
    let output = Command::new("tmux")
        .arg("-V")
        .output()
        .map_err(|e| ScitsiError::TmuxUnavailable(e.to_string()))?;

    if !output.status.success() {
        return Err(ScitsiError::TmuxUnavailable(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Locate the tmux executable on `PATH`.
pub fn executable() -> Option<std::path::PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join("tmux"))
        .find(|candidate| candidate.is_file())
}
