//! Descriptors for callables a resolver can hand to the parser.

use bitflags::bitflags;

use crate::Value;

bitflags! {
    /// What a callable permits or requires from the parser.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// Accepts arguments it does not declare.
        const ARBITRARY_ARGUMENTS = 1 << 0;
        /// Renders its body lazily; the body is still parsed as children.
        const STREAMING_BODY = 1 << 1;
        /// Selects the template layout from its `name` argument.
        const LAYOUT = 1 << 2;
        /// Output must not be cached; the template is marked non-compilable.
        const UNCACHEABLE = 1 << 3;
    }
}

/// Declared type of an argument. Informational; the parser does not coerce.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ArgumentType {
    #[default]
    Any,
    String,
    Integer,
    Float,
    Boolean,
    Array,
    /// Named object type understood by the renderer.
    Object(String),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: ArgumentType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl ArgumentDefinition {
    pub fn required(name: impl Into<String>, ty: ArgumentType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            default: None,
            description: String::new(),
        }
    }

    pub fn optional(name: impl Into<String>, ty: ArgumentType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Everything the parser needs to know about a callable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CallableDescriptor {
    namespace: String,
    identifier: String,
    arguments: Vec<ArgumentDefinition>,
    capabilities: Capabilities,
}

impl CallableDescriptor {
    /// `namespace` is the namespace identifier, not the template prefix.
    pub fn new(namespace: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            arguments: Vec::new(),
            capabilities: Capabilities::empty(),
        }
    }

    #[must_use]
    pub fn argument(mut self, definition: ArgumentDefinition) -> Self {
        self.arguments.push(definition);
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn arguments(&self) -> &[ArgumentDefinition] {
        &self.arguments
    }

    pub fn argument_definition(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.iter().find(|def| def.name == name)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn required_arguments(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.arguments.iter().filter(|def| def.required)
    }
}
