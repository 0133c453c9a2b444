//! Callable resolution.
//!
//! The parser maps a template prefix to namespace identifiers through the
//! [`NamespaceTable`](weft_ir::NamespaceTable), then asks the [`Resolver`]
//! for each identifier in turn. The first `Resolved` wins.

mod registry;

use std::sync::Arc;

use weft_ir::CallableDescriptor;

pub use registry::Registry;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Resolved(Arc<CallableDescriptor>),
    /// The resolver has nothing under this namespace identifier.
    UnknownNamespace,
    /// The namespace exists but has no callable of that name.
    UnknownIdentifier,
}

/// Source of callable descriptors. Shared read-only across parses.
pub trait Resolver: Send + Sync {
    /// `namespace` is a namespace identifier, not a template prefix.
    fn resolve(&self, namespace: &str, identifier: &str) -> Resolution;
}

impl<F> Resolver for F
where
    F: Fn(&str, &str) -> Resolution + Send + Sync,
{
    fn resolve(&self, namespace: &str, identifier: &str) -> Resolution {
        self(namespace, identifier)
    }
}
