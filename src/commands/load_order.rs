//! Load-order command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ebd::loader::bootstrap;

use crate::cli::Context;

/// Arguments for the load-order command
#[derive(Args, Debug)]
pub struct LoadOrderArgs {
    /// Directory holding the `*.lib` files
    #[arg(short = 'L', long, value_name = "DIR", env = "EBD_LIB_DIR")]
    pub lib_dir: PathBuf,
}

/// Execute the load-order command: print each loaded library path in order
pub fn execute(args: LoadOrderArgs, _context: &Context) -> Result<()> {
    let loaded = bootstrap(&args.lib_dir)?;
    for path in &loaded.loaded {
        println!("{}", path.display());
    }
    Ok(())
}
