//! Template prefix to namespace identifier mapping.
//!
//! A prefix may be bound to several identifiers. Later bindings are
//! searched first, so a template-local declaration can shadow a callable
//! from a default namespace while still falling back to it.

use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceTable {
    entries: FxHashMap<String, Vec<String>>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `identifier`. Re-declaring an existing binding
    /// moves it to the front of the search order.
    pub fn declare(&mut self, prefix: impl Into<String>, identifier: impl Into<String>) {
        let identifier = identifier.into();
        let bound = self.entries.entry(prefix.into()).or_default();
        bound.retain(|existing| *existing != identifier);
        bound.push(identifier);
    }

    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.declare(prefix, identifier);
        self
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.entries.contains_key(prefix)
    }

    /// Identifiers bound to `prefix`, most recent first.
    pub fn resolve(&self, prefix: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(prefix)
            .into_iter()
            .flat_map(|bound| bound.iter().rev().map(String::as_str))
    }

    /// Number of declared prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests;
