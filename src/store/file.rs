//! File-backed layout store.
//!
//! Each scope gets one JSON Lines log, `<dir>/<scope>.jsonl`, holding one
//! canonical layout per line in write order. Reads return the lines reversed
//! so the newest layout comes first.
//!
//! A failed append is truncated back to the previous length. A log that still
//! ends in an unterminated, unparseable line (for instance after a crash
//! mid-write) is read without that line, and the next append drops it.

use super::LayoutStore;
use crate::error::StoreError;
use crate::{LayoutNode, Scope};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Layout store persisting append-only logs under a directory.
///
/// Clones share one append lock, so appends through any clone never
/// interleave.
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    dir: PathBuf,
    append: Arc<Mutex<()>>,
}

impl FileLayoutStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            append: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the log file path for `scope`.
    ///
    /// Scope identifiers are percent-encoded outside `[A-Za-z0-9_-]` so that
    /// any identifier maps to a single, distinct file name.
    pub fn log_path(&self, scope: &Scope) -> PathBuf {
        self.dir.join(format!("{}.jsonl", encode_scope(scope.as_str())))
    }
}

fn encode_scope(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// How a log that does not end in a newline ends.
enum TornTail {
    /// The last line is a complete record missing its newline; the log is
    /// `len` bytes long.
    Unterminated { len: u64 },
    /// The last line is a partial record; `keep` bytes precede it.
    Unparseable { keep: u64 },
}

async fn torn_tail(path: &Path) -> std::io::Result<Option<TornTail>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if content.is_empty() || content.ends_with('\n') {
        return Ok(None);
    }
    let keep = content.rfind('\n').map_or(0, |p| p + 1);
    if LayoutNode::from_json_str(&content[keep..]).is_ok() {
        Ok(Some(TornTail::Unterminated {
            len: content.len() as u64,
        }))
    } else {
        Ok(Some(TornTail::Unparseable { keep: keep as u64 }))
    }
}

#[async_trait]
impl LayoutStore for FileLayoutStore {
    async fn get_all_layouts(&self, scope: &Scope) -> Result<Vec<LayoutNode>, StoreError> {
        let path = self.log_path(scope);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No layout log at {}", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    scope: scope.clone(),
                    source: e,
                })
            }
        };

        let terminated = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().collect();
        let mut layouts = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match LayoutNode::from_json_str(line) {
                Ok(layout) => layouts.push(layout),
                // A torn append leaves an unterminated last line.
                Err(e) if !terminated && index + 1 == lines.len() => {
                    tracing::warn!(
                        "Skipping unterminated record at {}:{}: {}",
                        path.display(),
                        index + 1,
                        e
                    );
                }
                Err(e) => {
                    return Err(StoreError::Corrupt {
                        scope: scope.clone(),
                        line: index + 1,
                        source: e,
                    })
                }
            }
        }
        layouts.reverse();
        Ok(layouts)
    }

    async fn put_layout(&self, scope: &Scope, layout: &LayoutNode) -> Result<(), StoreError> {
        let write_err = |e| StoreError::Write {
            scope: scope.clone(),
            source: e,
        };

        let _guard = self.append.lock().await;
        fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        let path = self.log_path(scope);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(write_err)?;

        let mut line = layout.canonical();
        line.push('\n');
        let previous_len = match torn_tail(&path).await.map_err(write_err)? {
            Some(TornTail::Unparseable { keep }) => {
                tracing::warn!("Dropping torn record at the end of {}", path.display());
                file.set_len(keep).await.map_err(write_err)?;
                keep
            }
            Some(TornTail::Unterminated { len }) => {
                file.write_all(b"\n").await.map_err(write_err)?;
                len + 1
            }
            None => file.metadata().await.map_err(write_err)?.len(),
        };
        let written = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.sync_data().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(truncate) = file.set_len(previous_len).await {
                tracing::warn!(
                    "Failed to roll back partial append to {}: {}",
                    path.display(),
                    truncate
                );
            }
            return Err(write_err(e));
        }

        tracing::debug!("Appended layout to {}", path.display());
        Ok(())
    }
}
