//! Equality-gated layout persistence for one scope.
//!
//! A [`LayoutSession`] remembers the layout it believes is currently stored
//! and only touches the store when a proposed layout differs from it. Save
//! events can therefore be emitted liberally: the store grows by one record
//! per distinct layout, never per save.

use crate::error::StoreError;
use crate::store::LayoutStore;
use crate::{LayoutNode, Scope};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of [`LayoutSession::propose_save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    /// The candidate differed and was written to the store.
    Written,
    /// The candidate equals the stored layout; nothing was written.
    Unchanged,
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaveOutcome::Written => "written",
            SaveOutcome::Unchanged => "unchanged",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Default)]
struct StoredLayout {
    /// Whether the store has been read for this session.
    loaded: bool,
    /// Most recently persisted layout, as far as this session knows.
    layout: Option<LayoutNode>,
}

/// Layout persistence for one scope over a [`LayoutStore`].
///
/// The compare-and-write in [`propose_save`](Self::propose_save) runs under an
/// async mutex, so concurrent saves on one session are serialized.
pub struct LayoutSession {
    store: Arc<dyn LayoutStore>,
    scope: Scope,
    stored: Mutex<StoredLayout>,
}

impl fmt::Debug for LayoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutSession")
            .field("scope", &self.scope)
            .field("stored", &self.stored)
            .finish_non_exhaustive()
    }
}

impl LayoutSession {
    /// Creates a session for `scope`. Nothing is read until [`load_latest`](Self::load_latest).
    pub fn new(store: Arc<dyn LayoutStore>, scope: Scope) -> Self {
        Self {
            store,
            scope,
            stored: Mutex::new(StoredLayout::default()),
        }
    }

    /// Returns the scope this session persists to.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Loads the newest stored layout for the scope.
    ///
    /// The store is queried at most once per session. Later calls return the
    /// session's current view without touching the store.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if nothing has ever been stored for the scope.
    pub async fn load_latest(&self) -> Result<Option<LayoutNode>, StoreError> {
        let mut stored = self.stored.lock().await;
        if stored.loaded {
            tracing::debug!(scope = %self.scope, "Layout already loaded, not querying store");
            return Ok(stored.layout.clone());
        }

        let layouts = self.store.get_all_layouts(&self.scope).await?;
        let count = layouts.len();
        let latest = layouts.into_iter().next();

        stored.loaded = true;
        stored.layout = latest.clone();
        tracing::debug!(
            scope = %self.scope,
            stored_layouts = count,
            found = latest.is_some(),
            "Loaded latest layout"
        );
        Ok(latest)
    }

    /// Persists `candidate` if it differs from the stored layout.
    ///
    /// Equality is canonical-serialization equality. A different candidate
    /// (including any candidate when nothing is stored yet) is written exactly
    /// once and becomes the stored layout.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails. The stored layout is left
    /// as it was, so retrying the same candidate performs a real write.
    pub async fn propose_save(&self, candidate: LayoutNode) -> Result<SaveOutcome, StoreError> {
        let mut stored = self.stored.lock().await;
        if stored.layout.as_ref() == Some(&candidate) {
            tracing::debug!(scope = %self.scope, "Layout unchanged, skipping write");
            return Ok(SaveOutcome::Unchanged);
        }

        if let Err(e) = self.store.put_layout(&self.scope, &candidate).await {
            tracing::warn!(scope = %self.scope, error = %e, "Layout write failed");
            return Err(e);
        }

        stored.layout = Some(candidate);
        tracing::info!(scope = %self.scope, "Layout written");
        Ok(SaveOutcome::Written)
    }

    /// Returns the layout this session believes is currently stored.
    pub async fn stored_layout(&self) -> Option<LayoutNode> {
        self.stored.lock().await.layout.clone()
    }
}
