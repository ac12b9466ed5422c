//! # CLI Command Implementations
//!
//! Each subcommand of the `ebd` tool lives in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` plus the shared CLI
//!   context and calls into the `ebd` library.

pub mod eapply;
pub mod eapply_user;
pub mod inventory;
pub mod load_order;
