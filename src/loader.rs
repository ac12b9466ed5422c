//! Library loading
//!
//! Libraries are typed modules with a `register` entry point. On disk each one
//! is represented by a `<identifier>.lib` file in the library directory; the
//! loader finds those files, resolves them to canonical paths, and calls the
//! matching registration function from a [`LibraryCatalog`] exactly once per
//! canonical path.
//!
//! ## Load order
//!
//! 1.  **Forced order**: the fixed [`FORCED_ORDER`] identifiers, in order.
//! 2.  **Discovered**: every `*.lib` file directly inside the directory, sorted
//!     by file name. Forced libraries show up here again and are skipped by the
//!     exactly-once check.
//!
//! The scan does not recurse, so EAPI-specific libraries kept in a
//! subdirectory are never picked up here.
//!
//! After everything is loaded the [`BANNED`] capabilities are removed from the
//! registry, whichever library defined them.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::registry::Registry;

/// File suffix of loadable libraries.
pub const LIB_SUFFIX: &str = ".lib";

/// Libraries that load before everything else, in this order.
pub const FORCED_ORDER: [&str; 4] = [
    "exit-handling",
    "isolated-functions",
    "ebuild-default-functions",
    "ebuild-env-utils",
];

/// Capabilities build recipes may not call once bootstrap completes.
pub const BANNED: [&str; 1] = ["exit"];

/// A source unit contributing capabilities to a registry
pub trait Library: Send + Sync {
    fn register(&self, registry: &mut Registry) -> Result<()>;
}

impl<F> Library for F
where
    F: Fn(&mut Registry) -> Result<()> + Send + Sync,
{
    fn register(&self, registry: &mut Registry) -> Result<()> {
        self(registry)
    }
}

/// Registration functions keyed by library identifier
#[derive(Clone, Default)]
pub struct LibraryCatalog {
    libraries: BTreeMap<String, Arc<dyn Library>>,
}

impl LibraryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: &str, library: impl Library + 'static) {
        self.libraries
            .insert(identifier.to_string(), Arc::new(library));
    }

    pub fn get(&self, identifier: &str) -> Option<&Arc<dyn Library>> {
        self.libraries.get(identifier)
    }

    /// Known identifiers, sorted
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.libraries.keys().map(String::as_str)
    }
}

/// Tracks loaded libraries and loads each canonical path once
pub struct Loader {
    catalog: LibraryCatalog,
    loaded: HashSet<PathBuf>,
    sequence: Vec<PathBuf>,
}

impl Loader {
    pub fn new(catalog: LibraryCatalog) -> Self {
        Self {
            catalog,
            loaded: HashSet::new(),
            sequence: Vec::new(),
        }
    }

    /// Load one library file into `registry`.
    ///
    /// Returns `Ok(false)` without touching the registry when the canonical
    /// path has already been loaded. Any failure is a [`Error::Load`].
    pub fn load_library(&mut self, registry: &mut Registry, path: &Path) -> Result<bool> {
        let canonical = fs::canonicalize(path).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            status: e.to_string(),
        })?;
        if self.loaded.contains(&canonical) {
            log::debug!("skipping already loaded library {}", canonical.display());
            return Ok(false);
        }

        let identifier = identifier_of(&canonical).ok_or_else(|| Error::Load {
            path: path.to_path_buf(),
            status: format!("library file names must end in {}", LIB_SUFFIX),
        })?;
        let library = self.catalog.get(&identifier).ok_or_else(|| Error::Load {
            path: path.to_path_buf(),
            status: format!("no implementation registered for '{}'", identifier),
        })?;

        log::debug!("loading library {} from {}", identifier, canonical.display());
        library.register(registry).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            status: e.to_string(),
        })?;

        self.loaded.insert(canonical.clone());
        self.sequence.push(canonical);
        Ok(true)
    }

    /// Load the forced libraries, then everything discovered in `dir`
    pub fn load_all(&mut self, registry: &mut Registry, forced: &[&str], dir: &Path) -> Result<()> {
        for path in load_order(forced, dir)? {
            self.load_library(registry, &path)?;
        }
        Ok(())
    }

    /// Canonical paths in the order they were actually loaded
    pub fn loaded(&self) -> &[PathBuf] {
        &self.sequence
    }
}

/// Candidate load sequence: forced entries, then discovered entries sorted.
///
/// Forced entries also appear in the discovered part; loading dedups them.
pub fn load_order(forced: &[&str], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut order: Vec<PathBuf> = forced
        .iter()
        .map(|id| dir.join(format!("{}{}", id, LIB_SUFFIX)))
        .collect();
    order.extend(discover(dir)?);
    Ok(order)
}

/// `*.lib` files directly inside `dir`, sorted by file name
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Load {
            path: dir.to_path_buf(),
            status: e.to_string(),
        })?;
        let path = entry.path();
        let is_lib = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(LIB_SUFFIX));
        if is_lib && path.is_file() {
            found.push(path.to_path_buf());
        }
    }
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(found)
}

fn identifier_of(path: &Path) -> Option<String> {
    path.file_name()?
        .to_str()?
        .strip_suffix(LIB_SUFFIX)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// A fully loaded capability set
#[derive(Debug)]
pub struct Bootstrap {
    pub registry: Registry,
    /// Canonical library paths in load order
    pub loaded: Vec<PathBuf>,
}

/// Load the built-in libraries installed in `lib_dir` under the fixed order
pub fn bootstrap(lib_dir: &Path) -> Result<Bootstrap> {
    bootstrap_with(crate::libs::builtin_catalog(), lib_dir)
}

/// Load `catalog` from `lib_dir`, then ban the [`BANNED`] capabilities
pub fn bootstrap_with(catalog: LibraryCatalog, lib_dir: &Path) -> Result<Bootstrap> {
    let mut registry = Registry::new();
    let mut loader = Loader::new(catalog);
    loader.load_all(&mut registry, &FORCED_ORDER, lib_dir)?;
    for name in BANNED {
        if registry.ban(name) {
            log::debug!("banned capability {}", name);
        }
    }
    log::debug!(
        "bootstrap loaded {} libraries, {} capabilities",
        loader.loaded().len(),
        registry.len()
    );
    Ok(Bootstrap {
        registry,
        loaded: loader.sequence,
    })
}
