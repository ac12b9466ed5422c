//! Capability registry
//!
//! The registry owns every named capability available to build recipes. It is
//! an explicit object passed to whoever needs to call or enumerate
//! capabilities; libraries populate it through their `register` entry points.
//!
//! Once loading is done, [`Registry::ban`] removes capabilities that build
//! recipes must not reach. A banned name stays banned: it cannot be defined
//! again and invoking it is a usage error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::session::Session;

/// Names with this prefix are reserved for internal capabilities.
pub const INTERNAL_PREFIX: &str = "__";

/// Whether a capability is part of the recipe-facing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Public,
    Internal,
}

/// Callable body of a capability.
///
/// Receives the registry (so it can call other capabilities), the session it
/// runs in and its arguments. Returns the exit status; `0` is success.
pub type Handler = Arc<dyn Fn(&Registry, &mut Session, &[String]) -> Result<i32> + Send + Sync>;

/// A named, invokable unit of behavior
#[derive(Clone)]
pub struct Capability {
    pub name: String,
    pub visibility: Visibility,
    /// Identifier of the library that registered this capability
    pub library: String,
    handler: Handler,
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("library", &self.library)
            .finish_non_exhaustive()
    }
}

/// Mapping from capability name to implementation
#[derive(Debug, Clone, Default)]
pub struct Registry {
    capabilities: BTreeMap<String, Capability>,
    banned: BTreeSet<String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability on behalf of `library`.
    ///
    /// Internal capabilities must carry the reserved `__` prefix and public
    /// ones must not. Defining an existing name replaces the old definition;
    /// defining a banned name fails.
    pub fn define<F>(
        &mut self,
        library: &str,
        name: &str,
        visibility: Visibility,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(&Registry, &mut Session, &[String]) -> Result<i32> + Send + Sync + 'static,
    {
        let reserved = name.starts_with(INTERNAL_PREFIX);
        let message = match visibility {
            _ if name.is_empty() => Some("capability names must not be empty"),
            _ if self.is_banned(name) => Some("capability is banned"),
            Visibility::Public if reserved => {
                Some("public capabilities must not start with '__'")
            }
            Visibility::Internal if !reserved => {
                Some("internal capabilities must start with '__'")
            }
            _ => None,
        };
        if let Some(message) = message {
            return Err(Error::Registration {
                library: library.to_string(),
                name: name.to_string(),
                message: message.to_string(),
            });
        }

        if let Some(previous) = self.capabilities.get(name) {
            log::debug!(
                "{} redefined by {} (was {})",
                name,
                library,
                previous.library
            );
        }
        self.capabilities.insert(
            name.to_string(),
            Capability {
                name: name.to_string(),
                visibility,
                library: library.to_string(),
                handler: Arc::new(handler),
            },
        );
        Ok(())
    }

    /// Look up a capability by name
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.capabilities.get(name)
    }

    /// Check whether a capability is defined
    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Number of defined capabilities
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Check whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Iterate over all capabilities in name order
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.values()
    }

    /// Remove `name` and refuse it from now on.
    ///
    /// Returns whether a capability was defined under that name.
    pub fn ban(&mut self, name: &str) -> bool {
        self.banned.insert(name.to_string());
        self.capabilities.remove(name).is_some()
    }

    pub fn is_banned(&self, name: &str) -> bool {
        self.banned.contains(name)
    }

    /// Invoke a capability by name
    pub fn invoke(&self, name: &str, session: &mut Session, args: &[String]) -> Result<i32> {
        if self.is_banned(name) {
            return Err(Error::usage(name, "banned capability"));
        }
        let capability = self.get(name).ok_or_else(|| Error::UnknownCapability {
            name: name.to_string(),
        })?;
        (capability.handler)(self, session, args)
    }
}
