//! Eapply-user command implementation
//!
//! Applies the user patch set for a build exactly once. Patches come from the
//! command line and, when `--patches-root` is given, from the per-package
//! directories below it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ebd::session::{Phase, Session};
use ebd::user_patches::{apply_user_patches_once, collect_user_patches, GateOutcome, PackageId};

use crate::cli::Context;

/// Arguments for the eapply-user command
#[derive(Args, Debug)]
pub struct EapplyUserArgs {
    /// Build temporary-state directory (holds the once-only marker)
    #[arg(short = 'T', long, value_name = "DIR", env = "EBD_TEMP_DIR")]
    pub temp_dir: PathBuf,

    /// Source tree to patch (defaults to current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Build phase this call happens in
    #[arg(long, value_name = "PHASE", default_value = "prepare")]
    pub phase: Phase,

    /// Root of the per-package user patch directories
    #[arg(long, value_name = "DIR", requires_all = ["category", "package_name", "package_version"])]
    pub patches_root: Option<PathBuf>,

    /// Package category, e.g. dev-libs
    #[arg(long)]
    pub category: Option<String>,

    /// Package name without version
    #[arg(long = "package", value_name = "NAME")]
    pub package_name: Option<String>,

    /// Package version
    #[arg(long = "package-version", value_name = "VERSION")]
    pub package_version: Option<String>,

    /// Package revision
    #[arg(long, default_value_t = 0)]
    pub revision: u32,

    /// Additional user patch files or directories
    #[arg(value_name = "PATCH")]
    pub patches: Vec<PathBuf>,
}

/// Execute the eapply-user command
pub fn execute(args: EapplyUserArgs, context: &Context) -> Result<()> {
    let work_dir = match args.workdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut patches = Vec::new();
    if let (Some(root), Some(category), Some(name), Some(version)) =
        (args.patches_root, args.category, args.package_name, args.package_version)
    {
        let package = PackageId {
            category,
            name,
            version,
            revision: args.revision,
        };
        patches.extend(collect_user_patches(&root, &package)?);
    }
    patches.extend(args.patches);

    let mut session = Session::from_config(&context.config, &work_dir, &args.temp_dir)
        .with_phase(args.phase)
        .with_output(context.output.clone());

    match apply_user_patches_once(&mut session, &patches)? {
        GateOutcome::AlreadyApplied => log::debug!("user patches already applied"),
        GateOutcome::NoPatches => log::debug!("no user patches"),
        GateOutcome::Ran(outcome) if !outcome.is_success() => {
            std::process::exit(outcome.status())
        }
        GateOutcome::Ran(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebd::config::Config;
    use ebd::output::OutputConfig;
    use tempfile::TempDir;

    fn context() -> Context {
        Context {
            config: Config::default(),
            output: OutputConfig::without_color(),
        }
    }

    fn args(temp: &TempDir, phase: Phase) -> EapplyUserArgs {
        EapplyUserArgs {
            temp_dir: temp.path().join("T"),
            workdir: Some(temp.path().to_path_buf()),
            phase,
            patches_root: None,
            category: None,
            package_name: None,
            package_version: None,
            revision: 0,
            patches: Vec::new(),
        }
    }

    #[test]
    fn test_execute_writes_marker_for_empty_set() {
        let temp = TempDir::new().unwrap();
        execute(args(&temp, Phase::Prepare), &context()).unwrap();
        assert!(temp.path().join("T/.user_patches_applied").exists());
    }

    #[test]
    fn test_execute_wrong_phase() {
        let temp = TempDir::new().unwrap();
        let err = execute(args(&temp, Phase::Configure), &context()).unwrap_err();
        assert!(err.to_string().contains("invalid phase"));
    }
}
