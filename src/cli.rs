//! Command-line interface for scitsi.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for scitsi.
///
/// # Examples
///
/// ```bash
/// # One pane per host
/// scitsi direct web1.example.com web2.example.com db1.example.com
///
/// # Hosts of the `web` group in the `live` inventory, killed on detach
/// scitsi -c ansible live web
///
/// # Show what scitsi would use
/// scitsi info --environment live
/// ```
#[derive(Parser, Debug)]
#[command(name = "scitsi")]
#[command(version)]
#[command(about = "Open one tmux pane per host and ssh into each of them")]
#[command(long_about = "scitsi creates a tmux session with one pane per host and starts\n\
    an ssh connection in every pane. Hosts are given directly or looked up from\n\
    an Ansible inventory group.",
    after_help = "See more details at: https://github.com/tmux/tmux/wiki")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Kill the tmux session when it is closed or detached.
    #[arg(short, long, global = true, conflicts_with = "no_auto_attach")]
    pub close_on_exit: bool,

    /// Create the session without attaching to it.
    #[arg(short, long, global = true)]
    pub no_auto_attach: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Use this config file instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// How the hosts are chosen.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the hosts given on the command line.
    Direct {
        /// The hosts to connect to.
        #[arg(required = true, num_args = 2.., value_name = "HOST")]
        hosts: Vec<String>,
    },

    /// Look up the hosts of a group in an Ansible inventory.
    Ansible {
        /// Environment selecting the inventory (e.g. live, staging).
        environment: String,
        /// Inventory group to connect to.
        group: String,
    },

    /// Show tmux, config and inventory information.
    Info {
        /// Also list the groups of this environment's inventory.
        #[arg(short, long, value_name = "ENVIRONMENT")]
        environment: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_requires_two_hosts() {
        assert!(Cli::try_parse_from(["scitsi", "direct", "only-one"]).is_err());
        let cli = Cli::try_parse_from(["scitsi", "direct", "a", "b", "c"]).unwrap();
        match cli.command {
            Commands::Direct { hosts } => assert_eq!(hosts, ["a", "b", "c"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ansible_with_global_flags() {
        let cli = Cli::try_parse_from(["scitsi", "ansible", "live", "web", "-c", "-vv"]).unwrap();
        assert!(cli.close_on_exit);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ansible { environment, group } => {
                assert_eq!(environment, "live");
                assert_eq!(group, "web");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_close_and_no_attach_conflict() {
        assert!(Cli::try_parse_from(["scitsi", "-c", "-n", "direct", "a", "b"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
