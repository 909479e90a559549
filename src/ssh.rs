//! SSH connections inside tmux panes.
//!
//! SSH is started by typing `ssh <host>` into a pane via tmux `send-keys`.
//! No options or credentials are added; anything beyond the host name belongs
//! in the user's `~/.ssh/config`.

use crate::error::Result;
use crate::tmux::{TmuxCommand, TmuxRunner};

/// The command line typed into a pane to reach `host`.
pub fn connect_command(host: &str) -> String {
    format!("ssh {}", host)
}

/// Start an SSH session to `host` in the specified pane.
pub fn connect<R: TmuxRunner + ?Sized>(runner: &mut R, pane: usize, host: &str) -> Result<()> {
    runner.run(&TmuxCommand::SendKeys {
        pane,
        keys: connect_command(host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_command_passes_host_verbatim() {
        assert_eq!(connect_command("web1.example.com"), "ssh web1.example.com");
        assert_eq!(connect_command("admin@10.0.0.1"), "ssh admin@10.0.0.1");
    }
}
