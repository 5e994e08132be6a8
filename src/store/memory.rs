//! In-memory layout store.

use super::LayoutStore;
use crate::error::StoreError;
use crate::{LayoutNode, Scope};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe layout store keeping every scope's log in a HashMap.
///
/// Clones share the same underlying storage. Multiple async tasks can read
/// simultaneously, while writes are exclusive.
///
/// # Example
///
/// ```
/// use blocky_board::store::{LayoutStore, MemoryLayoutStore};
/// use blocky_board::{LayoutNode, Scope};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryLayoutStore::new();
///     let scope = Scope::new("space");
///     store.put_layout(&scope, &LayoutNode::new(json!({"v": 1}))).await.unwrap();
///     store.put_layout(&scope, &LayoutNode::new(json!({"v": 2}))).await.unwrap();
///     let layouts = store.get_all_layouts(&scope).await.unwrap();
///     assert_eq!(layouts[0], LayoutNode::new(json!({"v": 2})));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStore {
    /// Layout logs per scope, oldest first.
    layouts: Arc<RwLock<HashMap<Scope, Vec<LayoutNode>>>>,
}

impl MemoryLayoutStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count of layouts stored for `scope`.
    pub async fn len(&self, scope: &Scope) -> usize {
        let layouts = self.layouts.read().await;
        layouts.get(scope).map_or(0, Vec::len)
    }

    /// Returns `true` if nothing is stored for `scope`.
    pub async fn is_empty(&self, scope: &Scope) -> bool {
        self.len(scope).await == 0
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn get_all_layouts(&self, scope: &Scope) -> Result<Vec<LayoutNode>, StoreError> {
        let layouts = self.layouts.read().await;
        Ok(layouts
            .get(scope)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn put_layout(&self, scope: &Scope, layout: &LayoutNode) -> Result<(), StoreError> {
        let mut layouts = self.layouts.write().await;
        layouts
            .entry(scope.clone())
            .or_default()
            .push(layout.clone());
        Ok(())
    }
}
