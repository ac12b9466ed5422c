//! Environment configuration
//!
//! The build environment is configured entirely through environment variables
//! supplied by whatever launched us. The binary ORs the toggles with its
//! matching CLI flags.

use std::env;

/// Enables debug-level logging.
pub const ENV_DEBUG: &str = "EBD_DEBUG";
/// Runs `patch` with a minimal inherited environment.
pub const ENV_CLEAN_ENV: &str = "EBD_CLEAN_ENV";
/// Makes patch application failures non-fatal.
pub const ENV_NONFATAL: &str = "EBD_NONFATAL";

/// Settings read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub debug: bool,
    pub clean_env: bool,
    pub nonfatal: bool,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).is_some_and(|v| is_truthy(&v));
        Self {
            debug: flag(ENV_DEBUG),
            clean_env: flag(ENV_CLEAN_ENV),
            nonfatal: flag(ENV_NONFATAL),
        }
    }
}

/// Interpret a toggle value: `1`, `true`, `yes` and `on` are set.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
