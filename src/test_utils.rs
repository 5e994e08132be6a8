//! Test doubles for the registry and layout store.

use crate::error::{RegistryError, StoreError};
use crate::registry::{BlockRegistry, ManifestRegistry};
use crate::store::{LayoutStore, MemoryLayoutStore};
use crate::{BlockDefinition, LayoutNode, ModuleRenderers, Scope};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Builds a block owned by `module` with a derived renderer handle.
pub(crate) fn block(module: &str, name: &str) -> BlockDefinition {
    BlockDefinition::new(module, name, format!("{module}-{name}"))
}

/// A small two-column layout whose content varies with `tag`.
pub(crate) fn layout(tag: &str) -> LayoutNode {
    LayoutNode::new(json!({
        "direction": "horizontal",
        "children": [
            {"block": {"set": "calendar", "name": "month"}, "tag": tag},
            {"block": {"set": "notes", "name": "editor"}}
        ]
    }))
}

/// Registry whose every query fails.
#[derive(Debug, Default)]
pub(crate) struct FailingRegistry {
    calls: AtomicUsize,
}

impl FailingRegistry {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockRegistry for FailingRegistry {
    async fn renderer_info_for_all_modules(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ModuleRenderers>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RegistryError::Unavailable {
            scope: scope.clone(),
            message: "registry offline".to_string(),
        })
    }
}

/// Registry that answers only after [`GatedRegistry::open`] is called.
#[derive(Debug, Default)]
pub(crate) struct GatedRegistry {
    inner: ManifestRegistry,
    gate: Arc<Notify>,
}

impl GatedRegistry {
    pub(crate) fn new(inner: ManifestRegistry) -> Self {
        Self {
            inner,
            gate: Arc::new(Notify::new()),
        }
    }

    pub(crate) fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl BlockRegistry for GatedRegistry {
    async fn renderer_info_for_all_modules(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ModuleRenderers>, RegistryError> {
        self.gate.notified().await;
        self.inner.renderer_info_for_all_modules(scope).await
    }
}

/// Memory-backed store that counts calls and can inject failures.
#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    inner: MemoryLayoutStore,
    reads: AtomicUsize,
    write_attempts: AtomicUsize,
    failing_writes: AtomicUsize,
    fail_reads: AtomicBool,
    hold_reads: AtomicBool,
    read_gate: Notify,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `layouts` for `scope`, oldest first.
    pub(crate) async fn seeded(scope: &Scope, layouts: &[LayoutNode]) -> Self {
        let store = Self::new();
        for layout in layouts {
            store
                .inner
                .put_layout(scope, layout)
                .await
                .expect("memory store never fails");
        }
        store
    }

    /// Makes the next `count` writes fail.
    pub(crate) fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    pub(crate) fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Makes reads wait for [`RecordingStore::release_reads`].
    pub(crate) fn hold_reads(&self) {
        self.hold_reads.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_reads(&self) {
        self.hold_reads.store(false, Ordering::SeqCst);
        self.read_gate.notify_waiters();
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Layouts actually persisted for `scope`.
    pub(crate) async fn stored(&self, scope: &Scope) -> usize {
        self.inner.len(scope).await
    }

    pub(crate) async fn newest(&self, scope: &Scope) -> Option<LayoutNode> {
        self.inner
            .get_all_layouts(scope)
            .await
            .expect("memory store never fails")
            .into_iter()
            .next()
    }
}

#[async_trait]
impl LayoutStore for RecordingStore {
    async fn get_all_layouts(&self, scope: &Scope) -> Result<Vec<LayoutNode>, StoreError> {
        let released = self.read_gate.notified();
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.hold_reads.load(Ordering::SeqCst) {
            released.await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "store offline".to_string(),
            });
        }
        self.inner.get_all_layouts(scope).await
    }

    async fn put_layout(&self, scope: &Scope, layout: &LayoutNode) -> Result<(), StoreError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Unavailable {
                message: "write rejected".to_string(),
            });
        }
        // Yield so concurrent savers get a chance to interleave.
        tokio::task::yield_now().await;
        self.inner.put_layout(scope, layout).await
    }
}
