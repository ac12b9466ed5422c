//! Patch application engine
//!
//! `eapply` takes a mixed argument list, `[options...] [--] targets...`, and
//! applies every patch it names to the session's work dir, in argument order.
//!
//! The work happens in three steps:
//!
//! 1. **Classify** the tokens into `patch` options and targets
//!    ([`PatchRequest::classify`]). Options must come before the first target.
//! 2. **Resolve** every target up front ([`PatchRequest::resolve`]). A file is
//!    taken as-is; a directory expands to its immediate `*.diff`/`*.patch`
//!    children in POSIX collation order. An empty directory fails the whole
//!    request before anything is applied.
//! 3. **Apply** the resolved set through the session's [`PatchApplier`]. The
//!    first failure stops the run: it is an error by default, or a returned
//!    [`ApplyOutcome::Failed`] when the session is in non-fatal mode.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};
use crate::libs::isolated_functions::{ebegin, eend};
use crate::scope::{COLLATION, POSIX_COLLATION};
use crate::session::Session;

/// Arguments always passed to `patch`, ahead of caller options.
pub const PATCH_ARGS: [&str; 5] = ["-p1", "-f", "-g0", "-s", "--no-backup-if-mismatch"];

/// File suffixes picked up when a target is a directory.
pub const PATCH_SUFFIXES: [&str; 2] = [".diff", ".patch"];

/// Why a single patch did not apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchFailure {
    /// Exit status of the patch tool, `None` if it never ran or was killed
    pub status: Option<i32>,
    /// Captured diagnostic output
    pub output: String,
}

/// The primitive that applies one patch file to a tree.
pub trait PatchApplier {
    fn apply(
        &self,
        patch: &Path,
        options: &[String],
        work_dir: &Path,
    ) -> std::result::Result<(), PatchFailure>;
}

/// Applies patches by running GNU `patch` with the patch on stdin
#[derive(Debug, Clone)]
pub struct GnuPatch {
    pub program: PathBuf,
    /// Run `patch` with only `PATH` inherited and `LC_ALL=C`
    pub clean_env: bool,
}

impl Default for GnuPatch {
    fn default() -> Self {
        Self {
            program: PathBuf::from("patch"),
            clean_env: false,
        }
    }
}

impl PatchApplier for GnuPatch {
    fn apply(
        &self,
        patch: &Path,
        options: &[String],
        work_dir: &Path,
    ) -> std::result::Result<(), PatchFailure> {
        let input = File::open(patch).map_err(|e| PatchFailure {
            status: None,
            output: format!("can't open patch {}: {}", patch.display(), e),
        })?;

        let mut command = Command::new(&self.program);
        command
            .args(PATCH_ARGS)
            .args(options)
            .current_dir(work_dir)
            .stdin(Stdio::from(input));
        if self.clean_env {
            command.env_clear().env("LC_ALL", POSIX_COLLATION);
            if let Some(path) = std::env::var_os("PATH") {
                command.env("PATH", path);
            }
        }

        let output = command.output().map_err(|e| PatchFailure {
            status: None,
            output: format!("failed to run {}: {}", self.program.display(), e),
        })?;

        if output.status.success() {
            return Ok(());
        }

        let mut diagnostic = String::from_utf8_lossy(&output.stdout).into_owned();
        diagnostic.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(PatchFailure {
            status: output.status.code(),
            output: diagnostic,
        })
    }
}

/// Classified `eapply` arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchRequest {
    pub options: Vec<String>,
    pub targets: Vec<PathBuf>,
}

impl PatchRequest {
    /// Split raw tokens into options and targets.
    ///
    /// Every token after `--` is a target, even if it starts with a dash.
    pub fn classify<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut request = PatchRequest::default();
        let mut after_separator = false;

        for token in args.iter().map(AsRef::as_ref) {
            if after_separator {
                request.targets.push(PathBuf::from(token));
            } else if token == "--" {
                if !request.targets.is_empty() {
                    return Err(Error::usage(
                        "eapply",
                        "'--' must precede all files, options must be specified before files",
                    ));
                }
                after_separator = true;
            } else if token.starts_with('-') {
                if !request.targets.is_empty() {
                    return Err(Error::usage(
                        "eapply",
                        "options must be specified before files",
                    ));
                }
                request.options.push(token.to_string());
            } else {
                request.targets.push(PathBuf::from(token));
            }
        }

        if request.targets.is_empty() {
            return Err(Error::usage("eapply", "no files specified"));
        }
        Ok(request)
    }

    /// Expand every target into concrete patch files, in argument order.
    ///
    /// All directories are expanded before returning, so an empty directory
    /// anywhere in the list fails before any patch is applied.
    pub fn resolve(&self, session: &mut Session) -> Result<Vec<PathBuf>> {
        let mut patches = Vec::new();
        for target in &self.targets {
            let path = session.resolve_path(target);
            if path.is_dir() {
                let expanded = expand_directory(session, &path)?;
                if expanded.is_empty() {
                    return Err(Error::Resolution {
                        path: target.clone(),
                    });
                }
                patches.extend(expanded);
            } else {
                patches.push(path);
            }
        }
        Ok(patches)
    }
}

/// Immediate `.diff`/`.patch` children of `dir`, sorted under POSIX collation
fn expand_directory(session: &mut Session, dir: &Path) -> Result<Vec<PathBuf>> {
    let _collation = session.settings.scoped(COLLATION, POSIX_COLLATION);

    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    // Hidden files are not patch candidates
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        let path = entry?;
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && PATCH_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Result of an `eapply` run that did not end in a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every patch applied
    Applied { count: usize },
    /// Non-fatal mode only: the first patch that failed. Later patches were
    /// not attempted.
    Failed {
        patch: PathBuf,
        status: Option<i32>,
        output: String,
    },
}

impl ApplyOutcome {
    /// Shell-style exit status of the run
    pub fn status(&self) -> i32 {
        match self {
            ApplyOutcome::Applied { .. } => 0,
            ApplyOutcome::Failed { status, .. } => status.filter(|s| *s != 0).unwrap_or(1),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Classify, resolve and apply `args` against the session's work dir
pub fn eapply<S: AsRef<str>>(session: &mut Session, args: &[S]) -> Result<ApplyOutcome> {
    let request = PatchRequest::classify(args)?;
    let patches = request.resolve(session)?;
    apply_all(session, &request.options, &patches)
}

/// Apply an already resolved patch set in order
pub fn apply_all(
    session: &mut Session,
    options: &[String],
    patches: &[PathBuf],
) -> Result<ApplyOutcome> {
    for patch in patches {
        let name = basename(patch);
        ebegin(session, &format!("Applying {} ...", name));

        match session.applier().apply(patch, options, &session.work_dir) {
            Ok(()) => eend(session, 0, None),
            Err(failure) => {
                let status = failure.status.unwrap_or(1);
                eend(session, status, Some(&failure.output));
                if session.nonfatal {
                    return Ok(ApplyOutcome::Failed {
                        patch: patch.clone(),
                        status: failure.status,
                        output: failure.output,
                    });
                }
                return Err(Error::Apply {
                    patch: name,
                    output: failure.output,
                });
            }
        }
    }

    Ok(ApplyOutcome::Applied {
        count: patches.len(),
    })
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
