//! Blocky Board - CLI entry point
//!
//! Resolves block catalogs from a registry manifest and reads or saves board
//! layouts in a file-backed layout store.

use blocky_board::config::error::ConfigError;
use blocky_board::config::schema::Config;
use blocky_board::config::{default, loader::ConfigLoader, xdg};
use blocky_board::registry::ManifestRegistry;
use blocky_board::render::{JsonRenderer, RecordingRenderer};
use blocky_board::store::FileLayoutStore;
use blocky_board::{
    logging, resolve_catalog, BoardError, BoardEvent, LayoutNode, RegistryError, Scope,
    SessionConfig, SessionController,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;


/// Number of parsed events buffered between stdin and the board.
const EVENT_BUFFER: usize = 64;

/// Blocky Board command-line interface
#[derive(Parser)]
#[command(name = "blocky")]
#[command(version, about = "Block catalog discovery and layout persistence for boards")]
struct Cli {
    /// Configuration file (defaults to the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scope to operate on (overrides `board.scope`)
    #[arg(long, global = true)]
    scope: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the blocky CLI
#[derive(Subcommand)]
enum Commands {
    /// Print the block catalog of the scope as JSON
    Catalog,

    /// Load the board and print its initial view as JSON
    Show,

    /// Save a layout read from a JSON file
    Save {
        /// Path to the layout JSON
        layout: PathBuf,
    },

    /// Drive a board from JSON events on stdin, rendering views to stdout
    Session,

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

/// Failures reported by the CLI.
#[derive(Error, Debug)]
enum CliError {
    #[error("Config error")]
    Config(#[from] ConfigError),

    #[error("Registry error")]
    Registry(#[from] RegistryError),

    #[error("Board error")]
    Board(#[from] BoardError),

    #[error("Failed to read layout file: {path}")]
    LayoutRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid layout JSON in {path}")]
    LayoutParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode output")]
    Output(#[from] serde_json::Error),

    #[error("Failed to start async runtime")]
    Runtime(#[source] std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config: config_path,
        scope,
        command,
    } = cli;

    if let Commands::Config { action } = command {
        return config_command(action, config_path.as_deref());
    }

    let config = ConfigLoader::load(config_path.as_deref())?;
    let scope = Scope::new(scope.unwrap_or_else(|| config.board.scope.clone()));
    tracing::debug!(%scope, "Using configuration {:?}", config_path);

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let result = runtime.block_on(async {
        match command {
            Commands::Catalog => catalog(&config, &scope).await,
            Commands::Show => show(&config, scope).await,
            Commands::Save { layout } => save(&config, scope, &layout).await,
            Commands::Session => session(&config, scope).await,
            Commands::Config { .. } => Ok(()),
        }
    });
    // A stdin reader may still be parked on a blocking read.
    runtime.shutdown_background();
    result
}

fn config_command(action: ConfigAction, path: Option<&Path>) -> Result<(), CliError> {
    match action {
        ConfigAction::Init { force } => {
            let path = default::create_default_config(path, force)?;
            println!("Created configuration at {}", path.display());
        }
        ConfigAction::Path => {
            let path = path.map_or_else(xdg::config_path, Path::to_path_buf);
            println!("{}", path.display());
        }
        ConfigAction::Validate => {
            let config = ConfigLoader::load(path)?;
            println!("Configuration is valid");
            println!("{config:#?}");
        }
    }
    Ok(())
}

fn session_config(config: &Config, scope: Scope) -> Result<SessionConfig, CliError> {
    let registry = ManifestRegistry::from_path(&config.registry_manifest_path())?;
    let store = FileLayoutStore::new(config.store_dir());
    Ok(SessionConfig::new(Arc::new(registry), Arc::new(store), scope))
}

async fn catalog(config: &Config, scope: &Scope) -> Result<(), CliError> {
    let registry = ManifestRegistry::from_path(&config.registry_manifest_path())?;
    let catalog = resolve_catalog(&registry, scope).await?;
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

async fn show(config: &Config, scope: Scope) -> Result<(), CliError> {
    let mut controller = SessionController::new(
        session_config(config, scope)?,
        RecordingRenderer::new(),
    );
    let mode = controller.initialize().await?;
    let output = json!({
        "scope": controller.scope(),
        "mode": mode,
        "board": controller.view(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn save(config: &Config, scope: Scope, path: &Path) -> Result<(), CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::LayoutRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let layout = LayoutNode::from_json_str(&content).map_err(|e| CliError::LayoutParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut controller = SessionController::new(
        session_config(config, scope)?,
        RecordingRenderer::new(),
    );
    controller.initialize().await?;
    let outcome = controller.save(layout).await?;
    println!("{outcome}");
    Ok(())
}

async fn session(config: &Config, scope: Scope) -> Result<(), CliError> {
    let mut controller = SessionController::new(
        session_config(config, scope)?,
        JsonRenderer::new(std::io::stdout()),
    );
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(forward_stdin_events(tx));
    controller.run(rx).await?;
    Ok(())
}

/// Parses one [`BoardEvent`] per stdin line and forwards it to the board.
///
/// Blank lines are ignored and malformed lines are logged and skipped.
async fn forward_stdin_events(tx: mpsc::Sender<BoardEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BoardEvent>(&line) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!("Ignoring malformed event: {}", e),
        }
    }
}

/// Formats an error with its chain of causes.
fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}
