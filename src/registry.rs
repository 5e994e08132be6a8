//! Block registry interface.
//!
//! A registry enumerates the capability modules installed in a scope and, for
//! each, reports the renderer information it offers (or nothing). Hosts
//! implement [`BlockRegistry`] over their own transport; [`ManifestRegistry`]
//! serves listings from a JSON manifest.

use crate::error::RegistryError;
use crate::{ModuleRenderers, Renderers, Scope};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Source of module renderer listings.
#[async_trait]
pub trait BlockRegistry: Send + Sync {
    /// Lists every module installed in `scope` with its renderer information.
    ///
    /// The returned order is the registry's order and is preserved by the
    /// catalog. An empty list is a valid answer.
    async fn renderer_info_for_all_modules(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ModuleRenderers>, RegistryError>;
}

/// On-disk registry listing, keyed by scope identifier.
///
/// ```json
/// {
///   "scopes": {
///     "team-space": [
///       { "descriptor": { "name": "calendar" },
///         "renderers": { "standalone": [ { "name": "month", "renderer": "calendar-month" } ] } },
///       { "descriptor": { "name": "profiles" }, "renderers": null }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryManifest {
    /// Ordered module listings per scope.
    pub scopes: BTreeMap<String, Vec<ModuleRenderers>>,
}

/// A [`BlockRegistry`] answering from a [`RegistryManifest`].
#[derive(Debug, Clone, Default)]
pub struct ManifestRegistry {
    manifest: RegistryManifest,
}

impl ManifestRegistry {
    /// Creates a registry serving the given manifest.
    pub fn new(manifest: RegistryManifest) -> Self {
        Self { manifest }
    }

    /// Loads a manifest from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path).map_err(|e| RegistryError::ManifestRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let manifest =
            serde_json::from_str(&content).map_err(|e| RegistryError::ManifestParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        tracing::debug!("Loaded registry manifest from {}", path.display());
        Ok(Self::new(manifest))
    }

    /// Replaces the module listing of `scope`.
    pub fn with_modules(mut self, scope: impl Into<String>, modules: Vec<ModuleRenderers>) -> Self {
        self.manifest.scopes.insert(scope.into(), modules);
        self
    }
}

#[async_trait]
impl BlockRegistry for ManifestRegistry {
    async fn renderer_info_for_all_modules(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ModuleRenderers>, RegistryError> {
        let Some(modules) = self.manifest.scopes.get(scope.as_str()) else {
            tracing::debug!("No modules registered for scope {}", scope);
            return Ok(Vec::new());
        };

        let mut modules = modules.clone();
        for module in &mut modules {
            if let Renderers::Offered(info) = &mut module.renderers {
                for block in &mut info.standalone {
                    if block.module.is_empty() {
                        block.module = module.descriptor.name.clone();
                    }
                }
            }
        }
        Ok(modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockDefinition, RendererInfo};

    const MANIFEST: &str = r#"{
        "scopes": {
            "team": [
                {
                    "descriptor": { "name": "calendar" },
                    "renderers": {
                        "standalone": [
                            { "name": "month", "renderer": "calendar-month" },
                            { "name": "agenda", "module": "agenda-lib", "renderer": "agenda-list" }
                        ]
                    }
                },
                { "descriptor": { "name": "profiles" }, "renderers": null }
            ]
        }
    }"#;

    #[tokio::test]
    async fn test_manifest_registry_lists_modules_in_order() {
        let manifest: RegistryManifest = serde_json::from_str(MANIFEST).unwrap();
        let registry = ManifestRegistry::new(manifest);
        let modules = registry
            .renderer_info_for_all_modules(&Scope::new("team"))
            .await
            .unwrap();

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].descriptor.name, "calendar");
        assert_eq!(modules[1].descriptor.name, "profiles");
        assert_eq!(modules[1].renderers, Renderers::NotOffered);
    }

    #[tokio::test]
    async fn test_manifest_registry_stamps_owning_module() {
        let manifest: RegistryManifest = serde_json::from_str(MANIFEST).unwrap();
        let registry = ManifestRegistry::new(manifest);
        let modules = registry
            .renderer_info_for_all_modules(&Scope::new("team"))
            .await
            .unwrap();

        let Renderers::Offered(RendererInfo { standalone }) = &modules[0].renderers else {
            panic!("calendar should offer renderers");
        };
        assert_eq!(standalone[0].module, "calendar");
        // An explicit owner is kept as-is.
        assert_eq!(standalone[1].module, "agenda-lib");
    }

    #[tokio::test]
    async fn test_unknown_scope_is_empty() {
        let registry = ManifestRegistry::default();
        let modules = registry
            .renderer_info_for_all_modules(&Scope::new("nowhere"))
            .await
            .unwrap();
        assert!(modules.is_empty());
    }

    #[tokio::test]
    async fn test_with_modules_builder() {
        let registry = ManifestRegistry::default().with_modules(
            "s",
            vec![ModuleRenderers::offered(
                "notes",
                vec![BlockDefinition::new("notes", "editor", "notes-editor")],
            )],
        );
        let modules = registry
            .renderer_info_for_all_modules(&Scope::new("s"))
            .await
            .unwrap();
        assert_eq!(modules.len(), 1);
    }

    #[test]
    fn test_from_path_reads_manifest() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("registry.json");
        fs::write(&path, MANIFEST).expect("failed to write manifest");
        let registry = ManifestRegistry::from_path(&path).expect("manifest should load");
        assert!(registry.manifest.scopes.contains_key("team"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let err = ManifestRegistry::from_path(&dir.path().join("missing.json"))
            .expect_err("should fail");
        assert!(matches!(err, RegistryError::ManifestRead { .. }));
    }

    #[test]
    fn test_from_path_invalid_json() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("registry.json");
        fs::write(&path, "{ not json").expect("failed to write manifest");
        let err = ManifestRegistry::from_path(&path).expect_err("should fail");
        assert!(matches!(err, RegistryError::ManifestParse { .. }));
    }
}
