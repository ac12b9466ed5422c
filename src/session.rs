//! Build session state handed to every capability
//!
//! A `Session` is one build instance: which phase is running, where the source
//! tree and the temporary-state directory live, the scoped settings, and the
//! patch primitive used by the patch engine.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::Config;
use crate::output::OutputConfig;
use crate::patch::{GnuPatch, PatchApplier};
use crate::scope::{SettingsStack, COLLATION};

/// Build lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pretend,
    Setup,
    Unpack,
    Prepare,
    Configure,
    Compile,
    Test,
    Install,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Pretend,
        Phase::Setup,
        Phase::Unpack,
        Phase::Prepare,
        Phase::Configure,
        Phase::Compile,
        Phase::Test,
        Phase::Install,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pretend => "pretend",
            Phase::Setup => "setup",
            Phase::Unpack => "unpack",
            Phase::Prepare => "prepare",
            Phase::Configure => "configure",
            Phase::Compile => "compile",
            Phase::Test => "test",
            Phase::Install => "install",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.strip_prefix("src_").or_else(|| s.strip_prefix("pkg_")).unwrap_or(s);
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.as_str() == name)
            .ok_or_else(|| format!("unknown build phase: {}", s))
    }
}

/// One build instance
pub struct Session {
    pub phase: Phase,
    /// Source tree patches are applied to
    pub work_dir: PathBuf,
    /// Per-build temporary-state directory (holds the user patch marker)
    pub temp_dir: PathBuf,
    pub settings: SettingsStack,
    /// When set, a failing patch is returned as a status instead of an error
    pub nonfatal: bool,
    /// Externally supplied user patches for `eapply_user`
    pub user_patches: Vec<PathBuf>,
    pub output: OutputConfig,
    applier: Box<dyn PatchApplier>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("work_dir", &self.work_dir)
            .field("temp_dir", &self.temp_dir)
            .field("settings", &self.settings)
            .field("nonfatal", &self.nonfatal)
            .field("user_patches", &self.user_patches)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(".", std::env::temp_dir())
    }
}

impl Session {
    /// Create a session in the prepare phase using the system `patch`
    pub fn new(work_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        let mut settings = SettingsStack::new();
        settings.set(COLLATION, crate::scope::POSIX_COLLATION);
        Self {
            phase: Phase::Prepare,
            work_dir: work_dir.into(),
            temp_dir: temp_dir.into(),
            settings,
            nonfatal: false,
            user_patches: Vec::new(),
            output: OutputConfig::without_color(),
            applier: Box::new(GnuPatch::default()),
        }
    }

    /// Create a session configured from the environment settings
    pub fn from_config(
        config: &Config,
        work_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut session = Self::new(work_dir, temp_dir);
        session.nonfatal = config.nonfatal;
        session.applier = Box::new(GnuPatch {
            clean_env: config.clean_env,
            ..GnuPatch::default()
        });
        session
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_applier(mut self, applier: impl PatchApplier + 'static) -> Self {
        self.applier = Box::new(applier);
        self
    }

    pub fn with_user_patches(mut self, patches: Vec<PathBuf>) -> Self {
        self.user_patches = patches;
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// The patch primitive this session applies patches with
    pub fn applier(&self) -> &dyn PatchApplier {
        self.applier.as_ref()
    }

    /// Resolve a possibly relative path against the work dir
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}
