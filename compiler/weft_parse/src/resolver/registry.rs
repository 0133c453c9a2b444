use std::sync::Arc;

use rustc_hash::FxHashMap;
use weft_ir::CallableDescriptor;

use super::{Resolution, Resolver};

/// In-memory resolver keyed by namespace identifier and callable name.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    callables: FxHashMap<String, FxHashMap<String, Arc<CallableDescriptor>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own namespace and identifier,
    /// replacing any previous one.
    pub fn register(&mut self, descriptor: CallableDescriptor) -> Arc<CallableDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.callables
            .entry(descriptor.namespace().to_owned())
            .or_default()
            .insert(descriptor.identifier().to_owned(), Arc::clone(&descriptor));
        descriptor
    }

    #[must_use]
    pub fn with(mut self, descriptor: CallableDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, namespace: &str, identifier: &str) -> Option<&Arc<CallableDescriptor>> {
        self.callables.get(namespace)?.get(identifier)
    }

    /// Total number of registered callables.
    pub fn len(&self) -> usize {
        self.callables.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Resolver for Registry {
    fn resolve(&self, namespace: &str, identifier: &str) -> Resolution {
        let Some(callables) = self.callables.get(namespace) else {
            return Resolution::UnknownNamespace;
        };
        match callables.get(identifier) {
            Some(descriptor) => Resolution::Resolved(Arc::clone(descriptor)),
            None => Resolution::UnknownIdentifier,
        }
    }
}
