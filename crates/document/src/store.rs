//! Document store: read/write orchestration over a [`DocumentSource`]
//!
//! A store is either *unopened* (no document) or *open* (a document is
//! installed). [`DocumentStore::read`] hydrates it from the source;
//! [`DocumentStore::write`] persists it back.
//!
//! ## Locking
//!
//! - `io`: held for the whole of every `read` and `write`, so one store
//!   never overlaps an encode with a decode.
//! - `document`: guards the in-memory graph. `write` holds it exclusively
//!   while encoding, and [`DocumentStore::with_document_mut`] needs it too,
//!   so a graph is never mutated while it is being encoded.
//!
//! Lock order is always `io` then `document`.
//!
//! Neither lock spans calls. A caller that reads the graph, releases it and
//! then writes must serialize those steps itself if other threads mutate
//! the same store.

use crate::config::StoreConfig;
use crate::document::Document;
use crate::header::Header;
use crate::source::DocumentSource;
use mobf_core::{MobfError, MobfResult};
use mobf_values::TypeRegistry;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Read/write orchestration for one document
#[derive(Debug)]
pub struct DocumentStore<S: DocumentSource> {
    source: S,
    config: StoreConfig,
    registry: TypeRegistry,
    io: Mutex<()>,
    document: RwLock<Option<Document>>,
}

impl<S: DocumentSource> DocumentStore<S> {
    /// Open store over an existing source; nothing is read until [`read`](Self::read)
    pub fn open(source: S, config: StoreConfig) -> MobfResult<Self> {
        config.validate()?;
        info!(target: "mobf::store", source = ?source, "opening store");
        Ok(DocumentStore {
            source,
            config,
            registry: TypeRegistry::standard(),
            io: Mutex::new(()),
            document: RwLock::new(None),
        })
    }

    /// Store holding a fresh, empty document
    ///
    /// The document reports modified, so the first unforced write persists it.
    pub fn create(source: S, config: StoreConfig) -> MobfResult<Self> {
        config.validate()?;
        info!(target: "mobf::store", source = ?source, "creating document");
        let document = Document::with_header(Header::new(config.charset, config.version))
            .with_compression(config.compression);
        Ok(DocumentStore {
            source,
            config,
            registry: TypeRegistry::standard(),
            io: Mutex::new(()),
            document: RwLock::new(Some(document)),
        })
    }

    /// Decode with `registry` instead of the standard one
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// True if a document is installed
    pub fn is_open(&self) -> bool {
        self.document.read().is_some()
    }

    /// Hydrate the document from the source
    ///
    /// A no-op returning `Ok(false)` when already open, unless `force`.
    /// On failure the previously installed document, if any, is kept.
    pub fn read(&self, force: bool) -> MobfResult<bool> {
        let _io = self.io.lock();
        if !force && self.is_open() {
            debug!(target: "mobf::store", "read skipped, already open");
            return Ok(false);
        }

        let reader = self.source.open_read()?;
        let document = Document::read_from(reader, &self.registry)?;
        debug!(
            target: "mobf::store",
            compression = %document.compression(),
            version = document.header().version(),
            "document read"
        );
        *self.document.write() = Some(document);
        Ok(true)
    }

    /// Persist the document to the source
    ///
    /// Fails with `NoHeaderOrRoot` when unopened. Skipped, returning
    /// `Ok(false)`, unless `force` or the root is modified. The document is
    /// encoded in full before the source is touched, and the source only
    /// changes once the compressed stream is complete.
    pub fn write(&self, force: bool) -> MobfResult<bool> {
        let _io = self.io.lock();
        let mut guard = self.document.write();
        let document = guard.as_mut().ok_or(MobfError::NoHeaderOrRoot)?;

        if !force && !document.is_modified() {
            debug!(target: "mobf::store", "write skipped, root unmodified");
            return Ok(false);
        }

        let compression = self.config.compression;
        let mut writer = self.source.open_write()?;
        let len = match document.write_to(&mut *writer, compression, self.config.gzip_level) {
            Ok(len) => len,
            Err(e) => {
                warn!(target: "mobf::store", error = %e, force, "write failed, source left unchanged");
                return Err(e);
            }
        };
        if let Err(e) = writer.commit() {
            warn!(target: "mobf::store", error = %e, force, "commit failed, source left unchanged");
            document.mark_modified();
            return Err(e);
        }
        document.set_compression(compression);
        debug!(target: "mobf::store", len, compression = %compression, force, "document written");
        Ok(true)
    }

    /// Run `f` against the installed document
    ///
    /// Returns `None` when unopened.
    pub fn with_document<T>(&self, f: impl FnOnce(&Document) -> T) -> Option<T> {
        self.document.read().as_ref().map(f)
    }

    /// Run `f` against the installed document, mutably
    ///
    /// Returns `None` when unopened. Mutations made through
    /// [`Document::root_object_mut`] mark the root modified.
    pub fn with_document_mut<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Option<T> {
        self.document.write().as_mut().map(f)
    }

    /// Remove and return the installed document, leaving the store unopened
    pub fn close(&self) -> Option<Document> {
        let _io = self.io.lock();
        self.document.write().take()
    }
}
