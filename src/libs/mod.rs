//! # Built-in Capability Libraries
//!
//! Each submodule is one library: a `register` function that defines its
//! capabilities in a [`Registry`](crate::registry::Registry). The bootstrap
//! looks libraries up here by identifier, the file stem of the matching
//! `<identifier>.lib` file in the library directory.
//!
//! - **`exit-handling`**: `die`, `nonfatal`, and `exit` (banned after loading)
//! - **`isolated-functions`**: the `einfo`/`ewarn`/`eerror`/`ebegin`/`eend`
//!   message helpers
//! - **`ebuild-default-functions`**: `eapply`, `eapply_user`
//! - **`ebuild-env-utils`**: capability listing for environment export

use crate::loader::LibraryCatalog;

pub mod ebuild_default_functions;
pub mod ebuild_env_utils;
pub mod exit_handling;
pub mod isolated_functions;

/// Catalog of every library shipped with the crate
pub fn builtin_catalog() -> LibraryCatalog {
    let mut catalog = LibraryCatalog::new();
    catalog.insert(exit_handling::IDENTIFIER, exit_handling::register);
    catalog.insert(isolated_functions::IDENTIFIER, isolated_functions::register);
    catalog.insert(
        ebuild_default_functions::IDENTIFIER,
        ebuild_default_functions::register,
    );
    catalog.insert(ebuild_env_utils::IDENTIFIER, ebuild_env_utils::register);
    catalog
}
