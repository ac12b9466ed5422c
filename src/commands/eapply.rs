//! Eapply command implementation
//!
//! Runs the patch engine against a work dir. Everything after `--` is handed
//! to the engine verbatim:
//!
//! ```text
//! ebd eapply --workdir src -- -p0 files/ extra.patch
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ebd::patch::{eapply, ApplyOutcome};
use ebd::session::Session;

use crate::cli::Context;

/// Arguments for the eapply command
#[derive(Args, Debug)]
pub struct EapplyArgs {
    /// Source tree to patch (defaults to current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Return the failing status instead of aborting on a bad patch
    #[arg(long)]
    pub nonfatal: bool,

    /// Run `patch` with a minimal environment
    #[arg(long)]
    pub clean_env: bool,

    /// Patch options followed by patch files or directories
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Execute the eapply command
pub fn execute(args: EapplyArgs, context: &Context) -> Result<()> {
    let work_dir = match args.workdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut config = context.config.clone();
    config.nonfatal |= args.nonfatal;
    config.clean_env |= args.clean_env;

    let mut session = Session::from_config(&config, &work_dir, std::env::temp_dir())
        .with_output(context.output.clone());

    match eapply(&mut session, &args.args)? {
        ApplyOutcome::Applied { count } => {
            log::debug!("applied {} patches in {}", count, work_dir.display());
            Ok(())
        }
        failed @ ApplyOutcome::Failed { .. } => std::process::exit(failed.status()),
    }
}
