//! Concurrent access tests for the layout stores.

use super::numbered_layout;
use crate::store::{FileLayoutStore, LayoutStore, MemoryLayoutStore};
use crate::Scope;
use std::sync::Arc;

/// Test that concurrent writers don't lose records in the memory store.
#[tokio::test]
async fn test_concurrent_memory_writes_no_loss() {
    let store = MemoryLayoutStore::new();
    let scope = Scope::new("space");
    let num_writers = 20;

    let mut handles = vec![];
    for i in 0..num_writers {
        let store_clone = store.clone();
        let scope = scope.clone();
        handles.push(tokio::spawn(async move {
            store_clone
                .put_layout(&scope, &numbered_layout(i))
                .await
                .expect("memory write should succeed");
        }));
    }

    for handle in handles {
        handle.await.expect("Writer task panicked");
    }

    assert_eq!(store.len(&scope).await, num_writers as usize);
}

/// Test that concurrent appends to the same log keep every line intact.
#[tokio::test]
async fn test_concurrent_file_writes_keep_lines_whole() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = Arc::new(FileLayoutStore::new(dir.path()));
    let scope = Scope::new("space");

    let mut handles = vec![];
    for i in 0..10 {
        let store = Arc::clone(&store);
        let scope = scope.clone();
        handles.push(tokio::spawn(async move {
            store
                .put_layout(&scope, &numbered_layout(i))
                .await
                .expect("file write should succeed");
        }));
    }

    for handle in handles {
        handle.await.expect("Writer task panicked");
    }

    let layouts = store.get_all_layouts(&scope).await.unwrap();
    assert_eq!(layouts.len(), 10);
}
