//! MOBF - typed, self-describing binary container documents
//!
//! A MOBF document is an 8-byte header followed by one root object whose
//! children are typed, named values: primitives, strings, partial
//! timestamps, and nested objects, lists and arrays. The whole stream may
//! be gzip-wrapped; readers detect that on their own.
//!
//! # Quick Start
//!
//! ```no_run
//! use mobf::{DocumentStore, FileSource, StoreConfig, TypedValue};
//!
//! let store = DocumentStore::create(FileSource::new("settings"), StoreConfig::default())?;
//! store.with_document_mut(|doc| {
//!     doc.root_object_mut().add(TypedValue::new("retries", 3i32))
//! });
//! store.write(false)?;
//! # Ok::<(), mobf::MobfError>(())
//! ```
//!
//! # Architecture
//!
//! - `mobf-core`: byte-level codec, timestamps, charsets, type ids, errors
//! - `mobf-values`: the value tree and the decode registry
//! - `mobf-document`: header, document, sources, store and configuration

pub use mobf_core::*;
pub use mobf_document::*;
pub use mobf_values::*;
