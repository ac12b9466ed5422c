//! Inventory command implementation
//!
//! Bootstraps the capability libraries from a library directory and prints
//! the resulting inventory: public capabilities, then internal ones.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use ebd::inventory::Inventory;
use ebd::loader::bootstrap;

use crate::cli::Context;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One name per line
    Text,
    /// JSON object with `public` and `internal` arrays
    Json,
}

/// Arguments for the inventory command
#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// Directory holding the `*.lib` files
    #[arg(short = 'L', long, value_name = "DIR", env = "EBD_LIB_DIR")]
    pub lib_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

/// Execute the inventory command
pub fn execute(args: InventoryArgs, _context: &Context) -> Result<()> {
    let loaded = bootstrap(&args.lib_dir)?;
    let inventory = Inventory::build(&loaded.registry);

    match args.format {
        Format::Text => print!("{}", inventory.render()),
        Format::Json => println!("{}", inventory.to_json()?),
    }
    Ok(())
}
