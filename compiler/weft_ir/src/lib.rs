//! Template tree types shared by the Weft parser and its consumers.
//!
//! - [`Node`]: the parsed tree (text, accessors, arrays, calls, expressions)
//! - [`Value`], [`ArrayKey`], [`ArrayNode`]: argument and array values
//! - [`CallableDescriptor`], [`Capabilities`]: what a resolver hands back
//! - [`NamespaceTable`]: prefix to namespace identifier mapping

mod callable;
mod namespace;
mod node;

pub use callable::{ArgumentDefinition, ArgumentType, CallableDescriptor, Capabilities};
pub use namespace::NamespaceTable;
pub use node::{ArrayKey, ArrayNode, CallNode, ExpressionNode, Node, Value};
