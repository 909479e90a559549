//! # Scitsifreine
//!
//! Open one tmux pane per host and start an ssh connection in each of them.
//!
//! Hosts are either given directly or looked up from an Ansible inventory
//! group. The inventory for an environment is found through the
//! `SCITSI_INVENTORIES` variable (`/path/to/hosts` or
//! `live=/path/a,staging=/path/b`) or the `[inventories]` table of the config
//! file.
//!
//! ## Quick Example
//!
//! ```no_run
//! use scitsifreine::{MultiSshSession, SessionPlan, tmux::SystemTmux};
//!
//! let hosts = vec!["web1.example.com".to_string(), "web2.example.com".to_string()];
//! let plan = SessionPlan::new(hosts, scitsifreine::naming::DEFAULT_PREFIX)?;
//! MultiSshSession::new(SystemTmux::new(), plan, false).run(true)?;
//! # Ok::<(), scitsifreine::ScitsiError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`naming`]: session name derived from the host names
//! - [`layout`]: split counts and the immutable [`SessionPlan`]
//! - [`tmux`]: tmux commands and the [`tmux::TmuxRunner`] that executes them
//! - [`ssh`]: the per-pane ssh command
//! - [`session`]: orchestration of a whole session
//! - [`inventory`]: Ansible inventory parsing (INI, YAML, TOML)
//! - [`resolver`]: environment to inventory mapping
//! - [`config`], [`loader`]: config file and environment variable loading
//! - [`cli`]: command-line argument parsing with clap
//! - [`error`]: error types

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod layout;
pub mod loader;
pub mod naming;
pub mod resolver;
pub mod session;
pub mod ssh;
pub mod tmux;

pub use config::Config;
pub use error::{Result, ScitsiError};
pub use inventory::{Inventory, InventoryFormat};
pub use layout::SessionPlan;
pub use resolver::{InventoryResolver, InventorySources};
pub use session::MultiSshSession;
