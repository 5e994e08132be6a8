//! Tests for the SessionController.
//!
//! Tests are organized into categories:
//! - `lifecycle`: initialization join and the initial mode decision
//! - `save`: save relay, idempotence and write failures
//! - `events`: edit requests and the event loop


use super::{SessionConfig, SessionController};
use crate::registry::{BlockRegistry, ManifestRegistry};
use crate::render::RecordingRenderer;
use crate::test_utils::{block, RecordingStore};
use crate::{ModuleRenderers, Scope};
use std::sync::Arc;

pub(super) const SCOPE: &str = "team-space";

/// Registry with one usable module, one empty module and one without renderers.
pub(super) fn sample_registry() -> ManifestRegistry {
    ManifestRegistry::default().with_modules(
        SCOPE,
        vec![
            ModuleRenderers::offered(
                "calendar",
                vec![block("calendar", "month"), block("calendar", "agenda")],
            ),
            ModuleRenderers::offered("notes", vec![]),
            ModuleRenderers::not_offered("profiles"),
        ],
    )
}

/// Builds a controller over the given collaborators, recording every view.
pub(super) fn controller_with(
    registry: Arc<dyn BlockRegistry>,
    store: &Arc<RecordingStore>,
) -> (SessionController<RecordingRenderer>, RecordingRenderer) {
    let renderer = RecordingRenderer::new();
    let config = SessionConfig::new(registry, store.clone(), Scope::new(SCOPE));
    (SessionController::new(config, renderer.clone()), renderer)
}

/// Builds an initialized controller over `store` and the sample registry.
pub(super) async fn ready_controller(
    store: &Arc<RecordingStore>,
) -> (SessionController<RecordingRenderer>, RecordingRenderer) {
    let (mut controller, renderer) = controller_with(Arc::new(sample_registry()), store);
    controller
        .initialize()
        .await
        .expect("initialization should succeed");
    (controller, renderer)
}
