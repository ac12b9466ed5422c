//! Integration tests running a prepare phase through the bootstrapped registry.
//!
//! The patch primitive is replaced by one that appends each patch name to
//! `applied.log` in the work dir, so ordering is observable without the
//! external `patch` program.

use std::fs;
use std::path::Path;

use ebd::error::Error;
use ebd::loader::{bootstrap, FORCED_ORDER};
use ebd::patch::{PatchApplier, PatchFailure};
use ebd::session::{Phase, Session};
use tempfile::TempDir;

/// Logs applied patches; fails any patch whose file contains `FAIL`.
struct LoggingApplier;

impl PatchApplier for LoggingApplier {
    fn apply(
        &self,
        patch: &Path,
        options: &[String],
        work_dir: &Path,
    ) -> Result<(), PatchFailure> {
        let content = fs::read_to_string(patch).map_err(|e| PatchFailure {
            status: None,
            output: e.to_string(),
        })?;
        if content.contains("FAIL") {
            return Err(PatchFailure {
                status: Some(1),
                output: "1 out of 1 hunk FAILED".to_string(),
            });
        }
        let name = patch.file_name().unwrap().to_string_lossy();
        let line = format!("{} {}\n", name, options.join(" "));
        let log = work_dir.join("applied.log");
        let mut existing = fs::read_to_string(&log).unwrap_or_default();
        existing.push_str(&line);
        fs::write(log, existing).unwrap();
        Ok(())
    }
}

struct Build {
    _temp: TempDir,
    lib_dir: std::path::PathBuf,
    work_dir: std::path::PathBuf,
    temp_dir: std::path::PathBuf,
}

impl Build {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let lib_dir = temp.path().join("lib");
        let work_dir = temp.path().join("work");
        let temp_dir = temp.path().join("T");
        fs::create_dir_all(&lib_dir).unwrap();
        fs::create_dir_all(&work_dir).unwrap();
        for id in FORCED_ORDER {
            fs::write(lib_dir.join(format!("{}.lib", id)), "").unwrap();
        }
        Self {
            _temp: temp,
            lib_dir,
            work_dir,
            temp_dir,
        }
    }

    fn write(&self, path: &str, content: &str) {
        let full = self.work_dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn session(&self) -> Session {
        Session::new(&self.work_dir, &self.temp_dir).with_applier(LoggingApplier)
    }

    fn applied(&self) -> Vec<String> {
        fs::read_to_string(self.work_dir.join("applied.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_eapply_directory_through_registry() {
    let build = Build::new();
    build.write("dir1/x.patch", "");
    build.write("dir1/y.diff", "");
    build.write("dir1/z.txt", "");
    let loaded = bootstrap(&build.lib_dir).unwrap();
    let mut session = build.session();

    let status = loaded
        .registry
        .invoke("eapply", &mut session, &strings(&["-p0", "dir1"]))
        .unwrap();

    assert_eq!(status, 0);
    assert_eq!(build.applied(), vec!["x.patch -p0", "y.diff -p0"]);
}

#[test]
fn test_eapply_failure_is_fatal_and_nonfatal_demotes_it() {
    let build = Build::new();
    build.write("01.patch", "");
    build.write("02.patch", "FAIL");
    build.write("03.patch", "");
    let loaded = bootstrap(&build.lib_dir).unwrap();
    let mut session = build.session();
    let args = strings(&["01.patch", "02.patch", "03.patch"]);

    let err = loaded
        .registry
        .invoke("eapply", &mut session, &args)
        .unwrap_err();
    assert!(matches!(err, Error::Apply { ref patch, .. } if patch == "02.patch"));
    assert_eq!(build.applied(), vec!["01.patch "]);

    let mut nonfatal_args = strings(&["eapply"]);
    nonfatal_args.extend(args);
    let status = loaded
        .registry
        .invoke("nonfatal", &mut session, &nonfatal_args)
        .unwrap();
    assert_eq!(status, 1);
    assert!(!session.nonfatal);
}

#[test]
fn test_eapply_user_runs_once_per_build() {
    let build = Build::new();
    build.write("user/fix.patch", "");
    let loaded = bootstrap(&build.lib_dir).unwrap();
    let mut session = build
        .session()
        .with_user_patches(vec![build.work_dir.join("user/fix.patch")]);

    for _ in 0..3 {
        let status = loaded
            .registry
            .invoke("eapply_user", &mut session, &[])
            .unwrap();
        assert_eq!(status, 0);
    }

    assert_eq!(build.applied(), vec!["fix.patch "]);
    assert!(build.temp_dir.join(".user_patches_applied").exists());
}

#[test]
fn test_eapply_user_in_wrong_phase() {
    let build = Build::new();
    let loaded = bootstrap(&build.lib_dir).unwrap();
    let mut session = build.session().with_phase(Phase::Unpack);

    let err = loaded
        .registry
        .invoke("eapply_user", &mut session, &[])
        .unwrap_err();

    assert!(matches!(err, Error::Usage { .. }));
}

#[test]
fn test_die_is_fatal() {
    let build = Build::new();
    let loaded = bootstrap(&build.lib_dir).unwrap();
    let mut session = build.session();

    let err = loaded
        .registry
        .invoke("die", &mut session, &strings(&["configure", "failed"]))
        .unwrap_err();

    assert_eq!(err.to_string(), "died: configure failed");
}

#[test]
fn test_banned_exit_is_refused() {
    let build = Build::new();
    let loaded = bootstrap(&build.lib_dir).unwrap();
    let mut session = build.session();

    let err = loaded
        .registry
        .invoke("exit", &mut session, &strings(&["0"]))
        .unwrap_err();

    assert_eq!(err.to_string(), "exit: banned capability");
}
