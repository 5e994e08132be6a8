//! Errors raised while loading, checking or writing `blocky` configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration failure, always tied to the file it concerns.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read configuration file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the configuration schema.
    ///
    /// `line` and `column` are one-based, or 0 when TOML reports no position.
    #[error("Invalid configuration at {path}:{line}:{column}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// The file parsed but holds a value the board cannot use.
    #[error("Invalid configuration in {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// An explicitly named configuration file does not exist.
    #[error("Configuration file not found: {path} (create one with `blocky config init`)")]
    NotFound { path: PathBuf },

    /// `config init` found an existing file and was not forced.
    #[error("Configuration file already exists: {path} (use --force to replace it)")]
    AlreadyExists { path: PathBuf },

    /// The default file or its backup could not be written.
    #[error("Failed to write configuration file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
