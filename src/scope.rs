//! Scoped save/restore of process-wide settings
//!
//! Settings are named string values (`collation`, shell-style options). Every
//! `push` saves the previous value on a per-name stack; `pop` restores it.
//! Callers normally go through [`SettingsStack::scoped`], whose guard pops on
//! drop so the previous value comes back on every exit path, including `?`.

use std::collections::{BTreeMap, HashMap};
use std::ops::{Deref, DerefMut};

/// Name of the setting that controls how file names are sorted.
pub const COLLATION: &str = "collation";

/// Collation value giving plain byte ordering.
pub const POSIX_COLLATION: &str = "C";

/// Current values plus the saved values for every outstanding push.
#[derive(Debug, Clone, Default)]
pub struct SettingsStack {
    values: BTreeMap<String, String>,
    saved: HashMap<String, Vec<Option<String>>>,
}

impl SettingsStack {
    /// Create an empty settings table
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a setting, if it is set
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a value without saving the previous one
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Save the current value of `name` and apply `value`
    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        let previous = self.values.insert(name.to_string(), value.into());
        self.saved.entry(name.to_string()).or_default().push(previous);
    }

    /// Restore the most recently saved value of `name`.
    ///
    /// Returns `false` when there is no outstanding push for `name`, in which
    /// case nothing changes.
    pub fn pop(&mut self, name: &str) -> bool {
        let Some(previous) = self.saved.get_mut(name).and_then(Vec::pop) else {
            return false;
        };
        match previous {
            Some(value) => {
                self.values.insert(name.to_string(), value);
            }
            None => {
                self.values.remove(name);
            }
        }
        if self.saved.get(name).is_some_and(Vec::is_empty) {
            self.saved.remove(name);
        }
        true
    }

    /// Number of outstanding pushes for `name`
    pub fn depth(&self, name: &str) -> usize {
        self.saved.get(name).map_or(0, Vec::len)
    }

    /// Push `value` for `name` and return a guard that pops it when dropped
    pub fn scoped(&mut self, name: &str, value: impl Into<String>) -> SettingGuard<'_> {
        self.push(name, value);
        SettingGuard {
            stack: self,
            name: name.to_string(),
        }
    }
}

/// Restores a pushed setting when dropped
#[derive(Debug)]
pub struct SettingGuard<'a> {
    stack: &'a mut SettingsStack,
    name: String,
}

impl Deref for SettingGuard<'_> {
    type Target = SettingsStack;

    fn deref(&self) -> &SettingsStack {
        self.stack
    }
}

impl DerefMut for SettingGuard<'_> {
    fn deref_mut(&mut self) -> &mut SettingsStack {
        self.stack
    }
}

impl Drop for SettingGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop(&self.name);
    }
}
