//! Tests for the layout store implementations.
//!
//! Tests are organized into categories:
//! - `memory`: in-memory store ordering and isolation
//! - `file`: JSON Lines log persistence and corruption handling
//! - `concurrent`: concurrent writers on a shared store

mod concurrent;

use crate::LayoutNode;
use serde_json::json;

/// Helper function to create a distinguishable layout.
pub(super) fn numbered_layout(n: u32) -> LayoutNode {
    LayoutNode::new(json!({"direction": "vertical", "children": [{"block": "counter", "n": n}]}))
}
