//! # ebd
//!
//! Execution support for a package build environment. This library provides
//! the two pieces a build relies on before and during its prepare phase:
//!
//! - **Bootstrap**: loading a fixed set of capability libraries into one
//!   [`registry::Registry`] exactly once each, in a fixed priority order, and
//!   producing a stable [`inventory::Inventory`] of what got registered.
//! - **Patching**: the `eapply` engine ([`patch`]) and its once-per-build
//!   `eapply_user` wrapper ([`user_patches`]).
//!
//! ## Quick Example
//!
//! ```
//! use ebd::inventory::Inventory;
//! use ebd::loader::{Loader, FORCED_ORDER};
//! use ebd::registry::Registry;
//!
//! let dir = tempfile::tempdir().unwrap();
//! for id in FORCED_ORDER {
//!     std::fs::write(dir.path().join(format!("{}.lib", id)), "").unwrap();
//! }
//!
//! let mut registry = Registry::new();
//! let mut loader = Loader::new(ebd::libs::builtin_catalog());
//! loader.load_all(&mut registry, &FORCED_ORDER, dir.path()).unwrap();
//!
//! let inventory = Inventory::build(&registry);
//! assert!(inventory.public.contains(&"eapply".to_string()));
//! assert!(inventory.internal.iter().all(|name| name.starts_with("__")));
//! ```
//!
//! ## Core Concepts
//!
//! - **Registry (`registry`)**: named capabilities tagged public or internal.
//! - **Loader (`loader`)**: exactly-once library loading by canonical path.
//! - **Session (`session`)**: one build instance: phase, work dir, temp dir,
//!   scoped settings and the patch primitive.
//! - **Scoped settings (`scope`)**: push/pop of process-wide settings with an
//!   RAII guard.

pub mod config;
pub mod error;
pub mod inventory;
pub mod libs;
pub mod loader;
pub mod output;
pub mod patch;
pub mod registry;
pub mod scope;
pub mod session;
pub mod user_patches;

#[cfg(test)]
mod patch_proptest;
