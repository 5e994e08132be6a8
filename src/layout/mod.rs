//! Layout tree representation.
//!
//! The shape of a layout belongs to the board renderer (containers, splits,
//! leaves referencing blocks). This crate only needs to carry it around,
//! persist it and tell whether two layouts are the same, so [`LayoutNode`]
//! wraps an arbitrary JSON document and compares by canonical serialization.

pub mod canonical;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// A board layout tree, opaque but comparable.
///
/// Two nodes are equal iff their canonical serializations are byte-identical,
/// so layouts that went through a store round trip (and came back with a
/// different key order or whitespace) still compare equal.
///
/// # Example
///
/// ```
/// use blocky_board::LayoutNode;
/// use serde_json::json;
///
/// let a = LayoutNode::new(json!({"direction": "row", "children": []}));
/// let b = LayoutNode::from_json_str(r#"{ "children": [], "direction": "row" }"#).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutNode(Value);

impl LayoutNode {
    /// Wraps a JSON layout tree.
    pub fn new(tree: Value) -> Self {
        Self(tree)
    }

    /// Parses a layout from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self)
    }

    /// Returns the underlying tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the node and returns the underlying tree.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Canonical encoding: compact JSON with object keys sorted.
    pub fn canonical(&self) -> String {
        canonical::canonical_string(&self.0)
    }
}

impl PartialEq for LayoutNode {
    fn eq(&self, other: &Self) -> bool {
        canonical::canonical_eq(&self.0, &other.0)
    }
}

impl Eq for LayoutNode {}

impl Hash for LayoutNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl From<Value> for LayoutNode {
    fn from(tree: Value) -> Self {
        Self(tree)
    }
}
