//! # Error Handling
//!
//! This module defines the centralized error type for the `ebd` library. It
//! uses `thiserror` to build one `Error` enum covering every failure mode of
//! the bootstrap and prepare phases.
//!
//! ## Taxonomy
//!
//! - **Usage errors**: bad argument ordering, missing targets, calling a
//!   capability outside the phase it belongs to.
//! - **Resolution errors**: a patch directory that expands to nothing.
//! - **Load errors**: a library that fails to register during bootstrap.
//! - **Apply errors**: a patch that fails to apply (fatal mode only; in
//!   non-fatal mode the failure is returned as a value instead).
//!
//! Every variant is fatal to the enclosing build step. Nothing here is
//! retried.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for ebd operations
#[derive(Error, Debug)]
pub enum Error {
    /// A capability was called with arguments or at a time it does not accept.
    #[error("{call}: {message}")]
    Usage { call: String, message: String },

    /// A patch target directory contained no `.diff` or `.patch` files.
    #[error("eapply: no .diff or .patch files found in directory: {}", path.display())]
    Resolution { path: PathBuf },

    /// A library failed to load during bootstrap.
    #[error("failed to load library {}: {status}", path.display())]
    Load { path: PathBuf, status: String },

    /// A patch failed to apply.
    #[error("applying {patch} failed:\n{output}")]
    Apply { patch: String, output: String },

    /// A library tried to register a malformed capability.
    #[error("library {library} registered invalid capability {name}: {message}")]
    Registration {
        library: String,
        name: String,
        message: String,
    },

    /// A capability was invoked by name but nothing is registered under it.
    #[error("unknown capability: {name}")]
    UnknownCapability { name: String },

    /// Raised explicitly by the `die` capability.
    #[error("died: {message}")]
    Die { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// An error reading a directory entry while expanding a glob.
    #[error("Glob iteration error: {0}")]
    GlobIteration(#[from] glob::GlobError),

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Shorthand for a usage error raised by `call`.
    pub fn usage(call: &str, message: impl Into<String>) -> Self {
        Error::Usage {
            call: call.to_string(),
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
