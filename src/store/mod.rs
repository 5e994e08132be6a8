//! Layout store interface.
//!
//! A layout store is an append-only log of layouts per scope. Readers get
//! every layout ever written for a scope, **newest first**; the first element
//! is the scope's current layout. Implementations own the recency semantics.

use crate::error::StoreError;
use crate::{LayoutNode, Scope};
use async_trait::async_trait;

#[cfg(test)]
mod tests;

mod file;
mod memory;

pub use file::FileLayoutStore;
pub use memory::MemoryLayoutStore;

/// Persistence backend for board layouts.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Returns every layout stored for `scope`, newest first.
    ///
    /// An empty list means nothing has been stored for the scope.
    async fn get_all_layouts(&self, scope: &Scope) -> Result<Vec<LayoutNode>, StoreError>;

    /// Appends `layout` as the newest layout of `scope`.
    async fn put_layout(&self, scope: &Scope, layout: &LayoutNode) -> Result<(), StoreError>;
}
