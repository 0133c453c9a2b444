use std::fmt;

use indexmap::IndexMap;

use super::Node;

/// Argument or array entry value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Node(Node),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Convert into a node: strings become text, numbers their decimal text.
    pub fn into_node(self) -> Node {
        match self {
            Value::String(s) => Node::Text(s),
            Value::Integer(i) => Node::Text(i.to_string()),
            Value::Float(f) => Node::Text(f.to_string()),
            Value::Node(node) => node,
        }
    }

    pub(crate) fn walk(&self, visit: &mut dyn FnMut(&Node)) {
        if let Value::Node(node) = self {
            node.walk(visit);
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

/// Array key: a name, or an integer index for positional entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrayKey {
    Name(String),
    Index(usize),
}

impl ArrayKey {
    /// All-digit keys become indices, anything else a name.
    pub fn parse(key: &str) -> Self {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = key.parse() {
                return ArrayKey::Index(index);
            }
        }
        ArrayKey::Name(key.to_owned())
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            ArrayKey::Name(name) => Some(name),
            ArrayKey::Index(_) => None,
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Name(name) => f.write_str(name),
            ArrayKey::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Ordered array literal. Positional entries get the next free index.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayNode {
    entries: IndexMap<ArrayKey, Value>,
    next_index: usize,
}

impl ArrayNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: ArrayKey, value: Value) -> Option<Value> {
        if let ArrayKey::Index(index) = key {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }
        self.entries.insert(key, value)
    }

    /// Append under the next free index.
    pub fn push(&mut self, value: Value) {
        let key = ArrayKey::Index(self.next_index);
        self.insert(key, value);
    }

    pub fn contains_key(&self, key: &ArrayKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.entries.get(&ArrayKey::Name(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.entries.keys()
    }

    pub fn into_entries(self) -> IndexMap<ArrayKey, Value> {
        self.entries
    }
}

impl FromIterator<(ArrayKey, Value)> for ArrayNode {
    fn from_iter<I: IntoIterator<Item = (ArrayKey, Value)>>(iter: I) -> Self {
        let mut array = ArrayNode::new();
        for (key, value) in iter {
            array.insert(key, value);
        }
        array
    }
}
