//! Capability inventory
//!
//! After bootstrap, the inventory lists every capability name: public names
//! first, then internal ones, each block sorted ascending. The rendered text
//! form is what the environment export step reads to decide which functions
//! belong to the build environment, so it has to be byte-for-byte stable for
//! the same set of libraries.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::registry::{Registry, Visibility};

/// Sorted capability names, partitioned by visibility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub public: Vec<String>,
    pub internal: Vec<String>,
}

impl Inventory {
    /// Build the inventory from the current registry contents
    pub fn build(registry: &Registry) -> Self {
        let mut inventory = Inventory::default();
        for capability in registry.iter() {
            let bucket = match capability.visibility {
                Visibility::Public => &mut inventory.public,
                Visibility::Internal => &mut inventory.internal,
            };
            bucket.push(capability.name.clone());
        }
        inventory.public.sort();
        inventory.internal.sort();
        inventory
    }

    /// All names, public block first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.public
            .iter()
            .chain(self.internal.iter())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.internal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One name per line, public block then internal block
    pub fn render(&self) -> String {
        let mut out = String::new();
        for name in self.names() {
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    /// Pretty-printed JSON with `public` and `internal` arrays
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization {
            message: e.to_string(),
        })
    }
}
