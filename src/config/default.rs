//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! functions to write it to the XDG config path or an explicit location.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Blocky Board Configuration
#
# This file was auto-generated with default values.
# Uncomment and modify options to customize your board.
#
# Location: $XDG_CONFIG_HOME/blocky-board/config.toml

# ==============================================================================
# Board
# ==============================================================================

[board]

# Scope whose catalog and layouts commands operate on.
# Override per invocation with `blocky --scope <id>`.
scope = "default"

# ==============================================================================
# Block Registry
# ==============================================================================

[registry]

# JSON manifest listing, per scope, each module's renderer information.
# Empty string means $XDG_CONFIG_HOME/blocky-board/registry.json.
# Tilde (~) is expanded to the user's home directory.
manifest = ""

# ==============================================================================
# Layout Store
# ==============================================================================

[store]

# Directory holding one append-only layout log per scope.
# Empty string means $XDG_DATA_HOME/blocky-board/layouts.
# Tilde (~) is expanded to the user's home directory.
dir = ""
"#;

/// Creates (or force-overwrites) the default config file at `path`, or at
/// the XDG location when `path` is `None`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(path: Option<&Path>, force: bool) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(xdg::config_path, Path::to_path_buf);

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Wrote default configuration to {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_err)?;
    }

    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_err)?;
    }

    Ok(())
}
