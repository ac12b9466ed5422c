//! CLI argument parsing and command dispatch

use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ebd::config::Config;
use ebd::output::OutputConfig;
use log::LevelFilter;

use crate::commands;

/// ebd - Build environment bootstrap and patch application
#[derive(Parser, Debug)]
#[command(name = "ebd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Enable debug logging (also enabled by EBD_DEBUG)
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load all libraries and print the capability inventory
    Inventory(commands::inventory::InventoryArgs),

    /// Load all libraries and print the order they were loaded in
    LoadOrder(commands::load_order::LoadOrderArgs),

    /// Apply patch files and directories to a source tree
    Eapply(commands::eapply::EapplyArgs),

    /// Apply user patches once per build
    EapplyUser(commands::eapply_user::EapplyUserArgs),
}

/// Shared state every command receives
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub output: OutputConfig,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let config = Config::from_env();
        let level = if self.debug || config.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::from_str(&self.log_level)
                .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.log_level))?
        };
        init_logging(level);

        let context = Context {
            config,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Inventory(args) => commands::inventory::execute(args, &context),
            Commands::LoadOrder(args) => commands::load_order::execute(args, &context),
            Commands::Eapply(args) => commands::eapply::execute(args, &context),
            Commands::EapplyUser(args) => commands::eapply_user::execute(args, &context),
        }
    }
}

/// Messages go to stderr without timestamps, like the shell helpers they replace
fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eapply_keeps_hyphen_arguments() {
        let cli = Cli::try_parse_from(["ebd", "eapply", "--", "-p0", "files"]).unwrap();
        match cli.command {
            Commands::Eapply(args) => assert_eq!(args.args, vec!["-p0", "files"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inventory() {
        let cli = Cli::try_parse_from(["ebd", "inventory", "--lib-dir", "/usr/lib/ebd"]).unwrap();
        assert!(matches!(cli.command, Commands::Inventory(_)));
    }
}
