//! Once-only application of user supplied patches
//!
//! `eapply_user` may be called any number of times during the prepare phase
//! but applies the user patch set only on the first call. The first call
//! leaves a marker file in the build's temporary-state directory listing the
//! requested patches; every later call sees the marker and returns.
//!
//! [`collect_user_patches`] finds the patch set for a package under a patches
//! root laid out as `<root>/<category>/<name>[-<version>[-r<rev>]]/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::patch::{apply_all, ApplyOutcome, PatchRequest, PATCH_SUFFIXES};
use crate::session::{Phase, Session};

/// Marker file name inside the build temp dir.
pub const MARKER: &str = ".user_patches_applied";

/// Location of the marker for a build temp dir
pub fn marker_path(temp_dir: &Path) -> PathBuf {
    temp_dir.join(MARKER)
}

/// What a call to [`apply_user_patches_once`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The marker already existed; nothing happened
    AlreadyApplied,
    /// First call with an empty patch set; only the marker was written
    NoPatches,
    /// First call; the patch engine ran
    Ran(ApplyOutcome),
}

impl GateOutcome {
    pub fn status(&self) -> i32 {
        match self {
            GateOutcome::Ran(outcome) => outcome.status(),
            _ => 0,
        }
    }
}

/// Apply `patches` unless this build already did.
///
/// Must run in the prepare phase. The marker is written before the patch
/// engine runs, so a failing user patch is not retried on a later call.
pub fn apply_user_patches_once(session: &mut Session, patches: &[PathBuf]) -> Result<GateOutcome> {
    if session.phase != Phase::Prepare {
        return Err(Error::usage(
            "eapply_user",
            format!("called during invalid phase: {}", session.phase),
        ));
    }

    let marker = marker_path(&session.temp_dir);
    if marker.exists() {
        log::debug!("user patches already applied ({})", marker.display());
        return Ok(GateOutcome::AlreadyApplied);
    }

    fs::create_dir_all(&session.temp_dir)?;
    let mut record = String::new();
    for patch in patches {
        record.push_str(&patch.to_string_lossy());
        record.push('\n');
    }
    fs::write(&marker, record)?;

    if patches.is_empty() {
        return Ok(GateOutcome::NoPatches);
    }

    let request = PatchRequest {
        options: Vec::new(),
        targets: patches.to_vec(),
    };
    let resolved = request.resolve(session)?;
    Ok(GateOutcome::Ran(apply_all(session, &request.options, &resolved)?))
}

/// Package coordinates used to locate user patch directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageId {
    pub category: String,
    /// Package name without version
    pub name: String,
    pub version: String,
    /// Revision number; `0` means no `-rN` suffix
    pub revision: u32,
}

impl PackageId {
    /// `name-version`
    pub fn p(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// `name-version-rN`, or `p()` for revision 0
    pub fn pf(&self) -> String {
        if self.revision == 0 {
            self.p()
        } else {
            format!("{}-r{}", self.p(), self.revision)
        }
    }

    /// Candidate directory names, least specific first
    fn directory_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone(), self.p()];
        if self.revision != 0 {
            names.push(self.pf());
        }
        names
    }
}

/// Find the user patches for `package` under `root`.
///
/// More specific directories override less specific ones patch by patch
/// (same file name); the result is ordered by file name.
pub fn collect_user_patches(root: &Path, package: &PackageId) -> Result<Vec<PathBuf>> {
    let mut by_name: BTreeMap<String, PathBuf> = BTreeMap::new();
    for dir_name in package.directory_names() {
        let dir = root.join(&package.category).join(dir_name);
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if path.is_file() && PATCH_SUFFIXES.iter().any(|s| name.ends_with(s)) {
                by_name.insert(name.to_string(), path.clone());
            }
        }
    }
    Ok(by_name.into_values().collect())
}
