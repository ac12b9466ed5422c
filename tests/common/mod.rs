//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_builtin_libs();
//! fixture.command().arg("inventory").arg("--lib-dir").arg(fixture.lib_dir()).assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    pub use super::TestFixture;
}

/// Identifiers of every library the binary knows how to load.
pub const BUILTIN_LIBS: [&str; 4] = [
    "exit-handling",
    "isolated-functions",
    "ebuild-default-functions",
    "ebuild-env-utils",
];

/// A temporary directory with a `lib/` library directory, a `work/` source
/// tree and a `temp/` build state directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with empty `lib/` and `work/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir.child("lib").create_dir_all().unwrap();
        temp_dir.child("work").create_dir_all().unwrap();
        Self { temp_dir }
    }

    /// Install a `<id>.lib` file for every built-in library.
    pub fn with_builtin_libs(mut self) -> Self {
        for id in BUILTIN_LIBS {
            self = self.with_lib(id);
        }
        self
    }

    /// Install a single `<id>.lib` file.
    pub fn with_lib(self, id: &str) -> Self {
        self.temp_dir
            .child("lib")
            .child(format!("{}.lib", id))
            .write_str("")
            .expect("Failed to write library file");
        self
    }

    /// Add a file below the work dir.
    pub fn with_work_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("work")
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a file anywhere in the fixture.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.path().join("lib")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.path().join("work")
    }

    pub fn temp_state_dir(&self) -> PathBuf {
        self.path().join("temp")
    }

    /// A command for the `ebd` binary, run from the work dir with colors off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ebd");
        cmd.current_dir(self.work_dir())
            .env_remove("EBD_LIB_DIR")
            .env_remove("EBD_DEBUG")
            .env_remove("EBD_NONFATAL")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
