//! TOML configuration schema types for Blocky Board.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial file only overrides what it names.
//! Empty path strings select the XDG default location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::xdg;

/// Root configuration encompassing all sections.
///
/// ```toml
/// [board]
/// [registry]
/// [store]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Board defaults.
    pub board: BoardConfig,
    /// Block registry source.
    pub registry: RegistryConfig,
    /// Layout store location.
    pub store: StoreConfig,
}

impl Config {
    /// Path of the registry manifest, with `~` expanded.
    pub fn registry_manifest_path(&self) -> PathBuf {
        if self.registry.manifest.is_empty() {
            xdg::config_dir().join("registry.json")
        } else {
            xdg::expand_tilde(&self.registry.manifest)
        }
    }

    /// Directory of the layout logs, with `~` expanded.
    pub fn store_dir(&self) -> PathBuf {
        if self.store.dir.is_empty() {
            xdg::data_dir().join("layouts")
        } else {
            xdg::expand_tilde(&self.store.dir)
        }
    }
}

/// Board configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Scope used when a command does not name one.
    pub scope: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            scope: "default".to_string(),
        }
    }
}

/// Registry configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Path to the JSON registry manifest. Empty means `<config dir>/registry.json`.
    pub manifest: String,
}

/// Layout store configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one layout log per scope. Empty means `<data dir>/layouts`.
    pub dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scope_is_default() {
        assert_eq!(Config::default().board.scope, "default");
    }

    #[test]
    fn explicit_paths_are_used() {
        let mut config = Config::default();
        config.registry.manifest = "/srv/registry.json".to_string();
        config.store.dir = "/srv/layouts".to_string();
        assert_eq!(
            config.registry_manifest_path(),
            PathBuf::from("/srv/registry.json")
        );
        assert_eq!(config.store_dir(), PathBuf::from("/srv/layouts"));
    }

    #[test]
    fn tilde_paths_are_expanded() {
        let mut config = Config::default();
        config.store.dir = "~/boards".to_string();
        let dir = config.store_dir();
        assert!(dir.ends_with("boards"));
        assert!(!dir.starts_with("~"));
    }

    #[test]
    fn empty_paths_fall_back_to_xdg() {
        let config = Config::default();
        assert!(config.registry_manifest_path().ends_with("registry.json"));
        assert!(config.store_dir().ends_with("layouts"));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.board.scope = "team".to_string();
        let text = toml::to_string(&config).expect("serialize");
        let parsed: Config = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}
