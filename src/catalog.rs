//! Block catalog resolution.
//!
//! Turns a registry listing into the palette of [`BlockSet`]s offered to the
//! board renderer.

use crate::error::RegistryError;
use crate::registry::BlockRegistry;
use crate::{BlockSet, ModuleRenderers, Renderers, Scope};

/// Resolves the block catalog for `scope`.
///
/// Queries the registry once. Modules that report no renderer information
/// are dropped; every other module yields exactly one [`BlockSet`] named after
/// the module, even when its standalone list is empty. Registry order is kept.
///
/// A failed query is returned as-is: there is no retry and no partial catalog.
pub async fn resolve_catalog(
    registry: &dyn BlockRegistry,
    scope: &Scope,
) -> Result<Vec<BlockSet>, RegistryError> {
    let modules = registry.renderer_info_for_all_modules(scope).await?;
    let listed = modules.len();

    let catalog: Vec<BlockSet> = modules.into_iter().filter_map(block_set_for).collect();

    tracing::debug!(
        scope = %scope,
        listed,
        block_sets = catalog.len(),
        "Resolved block catalog"
    );
    Ok(catalog)
}

fn block_set_for(module: ModuleRenderers) -> Option<BlockSet> {
    match module.renderers {
        Renderers::Offered(info) => Some(BlockSet {
            name: module.descriptor.name,
            blocks: info.standalone,
        }),
        Renderers::NotOffered => {
            tracing::trace!("Module {} offers no renderers", module.descriptor.name);
            None
        }
    }
}
