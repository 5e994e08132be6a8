//! Board renderer interface.
//!
//! The renderer is the presentation surface: it receives the palette, the
//! layout and the edit flag, and reports back when a human wants to save.
//! Saves reach the controller as [`BoardEvent::Save`](crate::BoardEvent::Save).

use crate::{BlockSet, LayoutNode};
use serde::Serialize;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Rendering input handed to a [`BoardRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoardView {
    /// Initialization has not finished; no palette is available yet.
    NotReady,
    /// The board can be rendered.
    Ready(BoardProps),
}

impl BoardView {
    /// Returns the props if the board is ready.
    pub fn props(&self) -> Option<&BoardProps> {
        match self {
            BoardView::NotReady => None,
            BoardView::Ready(props) => Some(props),
        }
    }
}

/// Palette, layout and mode of a ready board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardProps {
    /// Block sets available for composition.
    pub palette: Vec<BlockSet>,
    /// Layout to show; absent when nothing has been composed yet.
    pub layout: Option<LayoutNode>,
    /// Whether the board is in edit mode.
    pub editing: bool,
}

/// Presentation surface for a board.
pub trait BoardRenderer: Send {
    /// Presents `view`. Called after every state change of the controller.
    fn render(&mut self, view: &BoardView);
}

/// Writes each view as one JSON line.
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write + Send> JsonRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> BoardRenderer for JsonRenderer<W> {
    fn render(&mut self, view: &BoardView) {
        let result = serde_json::to_writer(&mut self.out, view)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to write board view: {}", e);
        }
    }
}

/// Keeps every rendered view in memory.
///
/// Clones share the same history, so a host can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    views: Arc<Mutex<Vec<BoardView>>>,
}

impl RecordingRenderer {
    /// Creates a renderer with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every view rendered so far, oldest first.
    pub fn views(&self) -> Vec<BoardView> {
        self.views.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns the most recently rendered view.
    pub fn last(&self) -> Option<BoardView> {
        self.views
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl BoardRenderer for RecordingRenderer {
    fn render(&mut self, view: &BoardView) {
        self.views
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(view.clone());
    }
}
