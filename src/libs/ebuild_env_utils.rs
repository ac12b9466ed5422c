//! Environment export support

use crate::error::Result;
use crate::inventory::Inventory;
use crate::registry::{Registry, Visibility};

pub const IDENTIFIER: &str = "ebuild-env-utils";

pub fn register(registry: &mut Registry) -> Result<()> {
    // Prints the capability inventory for the environment saver
    registry.define(
        IDENTIFIER,
        "__environ_list_funcs",
        Visibility::Internal,
        |registry, _, _| {
            print!("{}", Inventory::build(registry).render());
            Ok(0)
        },
    )
}
