//! Container documents and their persistence for MOBF
//!
//! This crate turns a value tree into a file:
//! - `header`: the fixed 8-byte signature/charset/version header
//! - `compression`: gzip envelope detection and wrapping
//! - `document`: header + root object, encoded all-or-nothing
//! - `source`: file and in-memory byte sources with commit-on-success writes
//! - `store`: read/write orchestration with per-store locking
//! - `config`: `mobf.toml` store configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compression;
pub mod config;
pub mod document;
pub mod header;
pub mod source;
pub mod store;

pub use compression::{Compression, DEFAULT_GZIP_LEVEL, GZIP_MAGIC, MAX_GZIP_LEVEL};
pub use config::{StoreConfig, CONFIG_FILE_NAME};
pub use document::Document;
pub use header::{Header, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use source::{DocumentSource, FileSource, MemorySource, SourceWriter, MOBF_EXTENSION};
pub use store::DocumentStore;
