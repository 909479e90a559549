//! Scitsi CLI entry point.
//!
//! This binary provides the `scitsi` command for opening one tmux pane per
//! host with an ssh connection in each.

use clap::Parser;
use scitsifreine::cli::{Cli, Commands};
use scitsifreine::config::Config;
use scitsifreine::error::Result;
use scitsifreine::tmux::{self, SystemTmux, TmuxCommand};
use scitsifreine::{InventoryResolver, MultiSshSession, SessionPlan, loader};
use std::path::PathBuf;
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_ref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, or to `log_file` without colours. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
    let level = match verbose {
        0 => "scitsifreine=warn",
        1 => "scitsifreine=info",
        2 => "scitsifreine=debug",
        _ => "scitsifreine=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Main application logic.
fn run(cli: Cli) -> Result<()> {
    let (config, config_path) = loader::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Direct { ref hosts } => {
            info!(hosts = hosts.len(), "using hosts from the command line");
            open_session(&cli, &config, hosts.clone())
        }
        Commands::Ansible {
            ref environment,
            ref group,
        } => {
            let resolver = InventoryResolver::new(loader::inventory_sources(&config));
            let hosts = match resolver.resolve_hosts(environment, group)? {
                Some(hosts) => hosts,
                None => {
                    warn!(environment = %environment, group = %group, "host group not found in inventory");
                    Vec::new()
                }
            };
            info!(environment = %environment, group = %group, hosts = hosts.len(), "resolved host group");
            open_session(&cli, &config, hosts)
        }
        Commands::Info { ref environment } => {
            print_information(&config, config_path, environment.as_deref());
            Ok(())
        }
    }
}

/// Build the session, attach, then close it if requested.
fn open_session(cli: &Cli, config: &Config, hosts: Vec<String>) -> Result<()> {
    let plan = SessionPlan::new(hosts, &config.defaults.prefix)?;
    tmux::version()?;

    let close_on_exit = cli.close_on_exit || (config.defaults.close_on_exit && !cli.no_auto_attach);
    let attach = !cli.no_auto_attach;

    let name = plan.name().to_string();
    MultiSshSession::new(SystemTmux::new(), plan, close_on_exit).run(attach)?;
    if !attach {
        let attach_cmd = TmuxCommand::AttachSession { session: name };
        println!("Session ready, attach with: {}", attach_cmd);
    }
    Ok(())
}

/// Print the tmux binary, config file and inventory sources in use.
fn print_information(config: &Config, config_path: Option<PathBuf>, environment: Option<&str>) {
    let tmux_path = tmux::executable()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "N/A".into());
    let tmux_version = tmux::version().unwrap_or_else(|e| e.to_string());
    let config_file = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none (defaults)".into());

    let rows = [
        ("tmux executable", tmux_path),
        ("tmux version", tmux_version),
        ("config file", config_file),
        ("session prefix", config.defaults.prefix.clone()),
        ("close on exit", config.defaults.close_on_exit.to_string()),
    ];
    for (key, value) in &rows {
        println!("{:<18} {}", key, value);
    }

    let sources = loader::inventory_sources(config);
    println!("\nInventories ({}):", loader::INVENTORY_ENV_VAR);
    match &sources {
        Some(sources) => {
            for (env, path) in sources.entries() {
                println!("  {:<16} {}", env, path.display());
            }
        }
        None => println!("  none configured"),
    }

    if let Some(env) = environment {
        let resolver = InventoryResolver::new(sources);
        match resolver.load(env) {
            Ok(inventory) => {
                println!("\nGroups ({}):", env);
                for group in inventory.groups() {
                    let count = inventory.get_hosts(group).map_or(0, |h| h.len());
                    println!("  {:<16} {} hosts", group, count);
                }
            }
            Err(e) => println!("\nGroups ({}): {}", env, e),
        }
    }
}
