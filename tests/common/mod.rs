//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

pub use mobf::{
    ArrayValue, Charset, Compression, Document, DocumentSource, DocumentStore, FileSource,
    ListValue, MemorySource, MobfError, ObjectValue, Payload, StoreConfig, Timestamp, TypeId,
    TypeRegistry, TypedValue,
};
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Documents
// ============================================================================

/// Root `""` with `id: 1`, `user: "abc"` and `tags: ["a", "b"]`.
pub fn sample_document() -> Document {
    let mut document = Document::new();
    let root = document.root_object_mut();
    root.add(TypedValue::new("id", 1i32)).unwrap();
    root.add(TypedValue::new("user", "abc")).unwrap();
    root.add(TypedValue::new(
        "tags",
        ListValue::from_values([TypedValue::new("a", "a"), TypedValue::new("b", "b")]).unwrap(),
    ))
    .unwrap();
    document
}

/// Encode then decode through the standard registry.
pub fn round_trip(document: &mut Document) -> Document {
    let bytes = document.to_bytes().unwrap();
    Document::from_bytes(&bytes).unwrap()
}

// ============================================================================
// Stores
// ============================================================================

/// File-backed store in a fresh temp dir. Keep the `TempDir` alive.
pub struct TestStore {
    pub store: Arc<DocumentStore<FileSource>>,
    pub dir: TempDir,
}

impl TestStore {
    /// Fresh document with the given config.
    pub fn create(config: StoreConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("doc"));
        let store = DocumentStore::create(source, config).unwrap();
        TestStore {
            store: Arc::new(store),
            dir,
        }
    }

    /// Unopened store over the same file.
    pub fn reopen(&self, config: StoreConfig) -> DocumentStore<FileSource> {
        DocumentStore::open(self.store.source().clone(), config).unwrap()
    }
}
