//! Board session controller.
//!
//! Drives one board instance through `Loading → {Editing | Viewing}` and
//! relays save intents from the renderer into the [`LayoutSession`].
//!
//! ```text
//! Loading ──(nothing stored)──▶ Editing
//!    │                           │   ▲
//!    │                         save edit
//!    │                           ▼   │
//!    └──(layout stored)──────▶ Viewing
//! ```
//!
//! The mode decision happens once, when both initialization queries have
//! settled. The stored layout is never reloaded afterwards; seeing fresh store
//! content requires a new controller.

use crate::catalog::resolve_catalog;
use crate::error::{BoardError, BoardResult};
use crate::registry::BlockRegistry;
use crate::render::{BoardProps, BoardRenderer, BoardView};
use crate::session::{LayoutSession, SaveOutcome};
use crate::store::LayoutStore;
use crate::{BlockSet, LayoutNode, Scope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

#[cfg(test)]
mod tests;

/// Mode of a board instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMode {
    /// Waiting for the catalog and the stored layout.
    Loading,
    /// Showing a committed layout read-only.
    Viewing,
    /// The user is composing a layout.
    Editing,
}

impl fmt::Display for BoardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BoardMode::Loading => "loading",
            BoardMode::Viewing => "viewing",
            BoardMode::Editing => "editing",
        };
        write!(f, "{}", s)
    }
}

/// User intent coming from the board renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    /// The user asked to edit the board.
    #[serde(rename = "edit")]
    EditRequested,
    /// The user finished composing and wants to keep `layout`.
    Save {
        /// Candidate layout.
        layout: LayoutNode,
    },
}

/// Handles a controller needs, passed in explicitly at construction.
#[derive(Clone)]
pub struct SessionConfig {
    /// Block registry to resolve the catalog from.
    pub registry: Arc<dyn BlockRegistry>,
    /// Layout store for the board's layouts.
    pub store: Arc<dyn LayoutStore>,
    /// Scope the catalog and layouts belong to.
    pub scope: Scope,
}

impl SessionConfig {
    /// Bundles the registry, store and scope for a board instance.
    pub fn new(
        registry: Arc<dyn BlockRegistry>,
        store: Arc<dyn LayoutStore>,
        scope: impl Into<Scope>,
    ) -> Self {
        Self {
            registry,
            store,
            scope: scope.into(),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// State and orchestration for one board instance.
///
/// Every state change is followed by a render, so the renderer always holds
/// the controller's latest view.
pub struct SessionController<R> {
    registry: Arc<dyn BlockRegistry>,
    session: LayoutSession,
    renderer: R,
    mode: BoardMode,
    /// Resolved palette; `None` until initialization completes.
    catalog: Option<Vec<BlockSet>>,
    /// Layout handed to the renderer.
    layout: Option<LayoutNode>,
}

impl<R: BoardRenderer> SessionController<R> {
    /// Creates a controller in `Loading` and renders the not-ready view.
    pub fn new(config: SessionConfig, renderer: R) -> Self {
        let SessionConfig {
            registry,
            store,
            scope,
        } = config;
        let mut controller = Self {
            registry,
            session: LayoutSession::new(store, scope),
            renderer,
            mode: BoardMode::Loading,
            catalog: None,
            layout: None,
        };
        controller.render();
        controller
    }

    /// Current mode.
    pub fn mode(&self) -> BoardMode {
        self.mode
    }

    /// Scope of this board.
    pub fn scope(&self) -> &Scope {
        self.session.scope()
    }

    /// Resolved palette, once initialization has completed.
    pub fn catalog(&self) -> Option<&[BlockSet]> {
        self.catalog.as_deref()
    }

    /// Layout currently handed to the renderer.
    pub fn layout(&self) -> Option<&LayoutNode> {
        self.layout.as_ref()
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consumes the controller and returns the renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// The view the renderer currently holds.
    pub fn view(&self) -> BoardView {
        match (&self.mode, &self.catalog) {
            (BoardMode::Loading, _) | (_, None) => BoardView::NotReady,
            (mode, Some(catalog)) => BoardView::Ready(BoardProps {
                palette: catalog.clone(),
                layout: self.layout.clone(),
                editing: *mode == BoardMode::Editing,
            }),
        }
    }

    /// Resolves the catalog and loads the stored layout, then leaves `Loading`.
    ///
    /// Both queries run concurrently and are allowed to settle before anything
    /// is decided. With no stored layout the board enters `Editing`; otherwise
    /// it enters `Viewing` with that layout.
    ///
    /// Calling this again after a successful initialization does nothing.
    ///
    /// # Errors
    ///
    /// `RegistryQueryFailure` or `StoreReadFailure`; the board stays in
    /// `Loading` and no partial catalog is exposed. When both queries fail the
    /// registry failure is reported.
    pub async fn initialize(&mut self) -> BoardResult<BoardMode> {
        if self.mode != BoardMode::Loading {
            tracing::debug!(mode = %self.mode, "Board already initialized");
            return Ok(self.mode);
        }

        let registry = Arc::clone(&self.registry);
        let session = &self.session;
        let scope = session.scope().clone();

        let (catalog, latest) = futures::join!(
            async move { resolve_catalog(&*registry, &scope).await },
            session.load_latest(),
        );
        let catalog = catalog.map_err(BoardError::RegistryQueryFailure)?;
        let latest = latest.map_err(BoardError::StoreReadFailure)?;

        self.mode = if latest.is_some() {
            BoardMode::Viewing
        } else {
            BoardMode::Editing
        };
        self.catalog = Some(catalog);
        self.layout = latest;

        tracing::info!(
            scope = %self.session.scope(),
            mode = %self.mode,
            block_sets = self.catalog.as_ref().map_or(0, Vec::len),
            "Board ready"
        );
        self.render();
        Ok(self.mode)
    }

    /// Switches a viewed board to edit mode.
    ///
    /// Already editing is a no-op.
    ///
    /// # Errors
    ///
    /// `NotReady` while the board is loading.
    pub fn request_edit(&mut self) -> BoardResult<()> {
        match self.mode {
            BoardMode::Loading => Err(BoardError::NotReady),
            BoardMode::Editing => Ok(()),
            BoardMode::Viewing => {
                self.transition(BoardMode::Editing);
                self.render();
                Ok(())
            }
        }
    }

    /// Relays a save intent to the layout session.
    ///
    /// Whether the layout was `Written` or `Unchanged`, the board then shows
    /// `candidate` in `Viewing`.
    ///
    /// # Errors
    ///
    /// `NotReady` while loading. `StoreWriteFailure` if the write fails; the
    /// mode and the rendered layout are left untouched so the user can retry.
    pub async fn save(&mut self, candidate: LayoutNode) -> BoardResult<SaveOutcome> {
        if self.mode == BoardMode::Loading {
            return Err(BoardError::NotReady);
        }

        let outcome = self
            .session
            .propose_save(candidate.clone())
            .await
            .map_err(BoardError::StoreWriteFailure)?;

        self.layout = Some(candidate);
        self.transition(BoardMode::Viewing);
        self.render();
        Ok(outcome)
    }

    /// Applies one renderer event.
    ///
    /// Returns the save outcome for [`BoardEvent::Save`], `None` otherwise.
    pub async fn handle_event(&mut self, event: BoardEvent) -> BoardResult<Option<SaveOutcome>> {
        match event {
            BoardEvent::EditRequested => self.request_edit().map(|()| None),
            BoardEvent::Save { layout } => self.save(layout).await.map(Some),
        }
    }

    /// Initializes the board, then applies events in arrival order until the
    /// channel closes.
    ///
    /// Events are handled one at a time, which serializes concurrent save
    /// intents. A failed write is logged and the loop continues; the session
    /// keeps its previous stored layout so the next save retries for real.
    ///
    /// # Errors
    ///
    /// Fatal initialization errors.
    pub async fn run(&mut self, mut events: mpsc::Receiver<BoardEvent>) -> BoardResult<()> {
        self.initialize().await?;

        while let Some(event) = events.recv().await {
            match self.handle_event(event).await {
                Ok(Some(outcome)) => tracing::debug!(%outcome, "Save handled"),
                Ok(None) => {}
                Err(e @ BoardError::StoreWriteFailure(_)) => {
                    tracing::warn!(error = %e, "Save failed, board left in {}", self.mode);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("Event channel closed");
        Ok(())
    }

    fn transition(&mut self, to: BoardMode) {
        if self.mode != to {
            tracing::info!(from = %self.mode, to = %to, "Board mode changed");
            self.mode = to;
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.renderer.render(&view);
    }
}
