//! Blocky Board library
//!
//! This crate provides the core of a composable block board: it discovers
//! which blocks are usable from a remote block registry, keeps track of the
//! board's layout, and persists a layout only when it actually changed.
//!
//! The three collaborators around the core are traits so that hosts can plug
//! in their own transport:
//! - [`registry::BlockRegistry`] enumerates capability modules and their renderers
//! - [`store::LayoutStore`] reads and appends layouts for a scope
//! - [`render::BoardRenderer`] presents the palette and layout to a human
//!
//! [`controller::SessionController`] wires them together for one board instance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block catalog resolution from registry module listings.
pub mod catalog;

/// Configuration utilities including XDG path resolution.
pub mod config;

/// Board session state machine and save relay.
pub mod controller;

/// Error types shared across the crate.
pub mod error;

/// Layout tree representation and canonical serialization.
pub mod layout;

/// Tracing subscriber setup.
pub mod logging;

/// Block registry interface and the manifest-backed registry.
pub mod registry;

/// Board renderer interface and built-in renderers.
pub mod render;

/// Equality-gated layout persistence for one scope.
pub mod session;

/// Layout store interface with in-memory and file-backed implementations.
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use catalog::resolve_catalog;
pub use controller::{BoardEvent, BoardMode, SessionConfig, SessionController};
pub use error::{BoardError, BoardResult, RegistryError, StoreError};
pub use layout::LayoutNode;
pub use render::{BoardProps, BoardRenderer, BoardView};
pub use session::{LayoutSession, SaveOutcome};

/// Logical target context a catalog or layout is resolved against.
///
/// Typically identifies one collaborative space. Compared and hashed by its
/// string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Creates a scope from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the scope identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Scope {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque handle the board renderer uses to instantiate a block.
///
/// The core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererHandle(String);

impl RendererHandle {
    /// Wraps a renderer identifier.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the raw renderer identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One reusable interactive capability exposed by a registered module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Name of the block as shown in the palette.
    pub name: String,
    /// Name of the module that owns this block.
    ///
    /// Registries may leave it empty in their wire format; the registry
    /// implementation stamps the owning module before handing blocks out.
    #[serde(default)]
    pub module: String,
    /// Renderer handle, opaque to this crate.
    pub renderer: RendererHandle,
}

impl BlockDefinition {
    /// Creates a block definition owned by `module`.
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        renderer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            renderer: RendererHandle::new(renderer),
        }
    }
}

/// A named, ordered group of blocks contributed by one capability module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSet {
    /// Display label, taken from the module's descriptor.
    pub name: String,
    /// Standalone blocks in registry order. May be empty.
    pub blocks: Vec<BlockDefinition>,
}

/// Descriptor of an installed capability module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Declared module name.
    pub name: String,
}

impl ModuleDescriptor {
    /// Creates a descriptor with the given module name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Renderer information reported by a module that can render blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererInfo {
    /// Blocks usable on their own, outside any entry context.
    #[serde(default)]
    pub standalone: Vec<BlockDefinition>,
}

/// Whether a module offers any rendering capability at all.
///
/// A module that offers renderers with an empty `standalone` list is
/// [`Renderers::Offered`]; only a module reporting nothing is
/// [`Renderers::NotOffered`]. On the wire the latter is `null` or a missing
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<RendererInfo>", into = "Option<RendererInfo>")]
pub enum Renderers {
    /// The module reports renderer information.
    Offered(RendererInfo),
    /// The module reports no renderer information.
    #[default]
    NotOffered,
}

impl From<Option<RendererInfo>> for Renderers {
    fn from(info: Option<RendererInfo>) -> Self {
        match info {
            Some(info) => Renderers::Offered(info),
            None => Renderers::NotOffered,
        }
    }
}

impl From<Renderers> for Option<RendererInfo> {
    fn from(renderers: Renderers) -> Self {
        match renderers {
            Renderers::Offered(info) => Some(info),
            Renderers::NotOffered => None,
        }
    }
}

/// One entry of a registry listing: a module and what it can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRenderers {
    /// The module's own descriptor.
    pub descriptor: ModuleDescriptor,
    /// Renderer information, if the module offers any.
    #[serde(default)]
    pub renderers: Renderers,
}

impl ModuleRenderers {
    /// A module offering the given standalone blocks.
    pub fn offered(name: impl Into<String>, standalone: Vec<BlockDefinition>) -> Self {
        Self {
            descriptor: ModuleDescriptor::new(name),
            renderers: Renderers::Offered(RendererInfo { standalone }),
        }
    }

    /// A module that offers no renderers.
    pub fn not_offered(name: impl Into<String>) -> Self {
        Self {
            descriptor: ModuleDescriptor::new(name),
            renderers: Renderers::NotOffered,
        }
    }
}
