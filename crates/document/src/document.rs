//! Container document: header, root object and compression mode
//!
//! ## Body layout
//!
//! ```text
//! header:     8 bytes (see header.rs)
//! root_id:    u8 = 1 (Object)
//! root_name:  string (may be empty)
//! root:       object payload
//! ```
//!
//! When compressed, the whole stream above is gzip-wrapped.

use crate::compression::{Compression, DEFAULT_GZIP_LEVEL};
use crate::header::{Header, FORMAT_VERSION};
use mobf_core::{Charset, MobfError, MobfRead, MobfResult, MobfWrite, TypeId};
use mobf_values::{ObjectValue, TypeRegistry, TypedValue};
use std::io::{BufReader, Read, Write};
use tracing::debug;

/// A header plus one root object
///
/// A fresh document starts with an empty root named `""` that reports
/// modified, so its first write is never skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    header: Header,
    root: TypedValue,
    compression: Compression,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    /// Empty UTF-8 document at the current format version
    pub fn new() -> Self {
        Document::with_header(Header::new(Charset::Utf8, FORMAT_VERSION))
    }

    /// Empty document with an explicit header
    pub fn with_header(header: Header) -> Self {
        Document {
            header,
            root: TypedValue::new("", ObjectValue::new()),
            compression: Compression::None,
        }
    }

    /// Replace the root object; the new root reports modified
    pub fn with_root(mut self, name: impl Into<String>, root: ObjectValue) -> Self {
        self.root = TypedValue::new(name, root);
        self
    }

    /// Set the compression mode used by [`Document::to_bytes`]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Compression mode: the one detected on read, or the one last written with
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Change the compression mode
    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    /// Root value (always an object)
    pub fn root(&self) -> &TypedValue {
        &self.root
    }

    /// Root name
    pub fn root_name(&self) -> &str {
        self.root.name().unwrap_or_default()
    }

    /// Root object
    pub fn root_object(&self) -> &ObjectValue {
        match self.root.as_object() {
            Some(object) => object,
            None => unreachable!("document root is always an object"),
        }
    }

    /// Mutable root object; marks the root modified
    pub fn root_object_mut(&mut self) -> &mut ObjectValue {
        match self.root.as_object_mut() {
            Some(object) => object,
            None => unreachable!("document root is always an object"),
        }
    }

    /// Top-level child by name, without marking the root modified
    pub fn child_mut(&mut self, name: &str) -> Option<&mut TypedValue> {
        self.root.child_mut(name)
    }

    /// Mark the root modified so the next unforced write persists it
    pub fn mark_modified(&mut self) {
        self.root.mark_modified();
    }

    /// True if the root has been mutated since the last encode or decode
    pub fn is_modified(&self) -> bool {
        self.root.is_modified()
    }

    // =========================================================================
    // Encode
    // =========================================================================

    /// Encode header and body, uncompressed, into a fresh buffer
    ///
    /// Nothing reaches any stream until the whole document has encoded, so
    /// a failure partway through leaves no partial output.
    pub fn encode(&mut self) -> MobfResult<Vec<u8>> {
        let charset = self.header.charset();
        let name = self.root_name().to_string();

        let mut buf = Vec::new();
        self.header.write_to(&mut buf)?;
        buf.write_type_id(TypeId::Object.as_u8())?;
        buf.write_string(&name, charset)?;
        self.root.encode(&mut buf, charset)?;
        Ok(buf)
    }

    /// Encode and write through `compression`
    ///
    /// If the stream fails after encoding succeeded, the root is marked
    /// modified again since nothing was persisted.
    pub fn write_to<W: Write + ?Sized>(
        &mut self,
        w: &mut W,
        compression: Compression,
        gzip_level: u32,
    ) -> MobfResult<usize> {
        let bytes = self.encode()?;
        if let Err(e) = compression.write_all(&bytes, w, gzip_level) {
            self.root.mark_modified();
            return Err(e);
        }
        debug!(
            target: "mobf::document",
            len = bytes.len(),
            compression = %compression,
            "document encoded"
        );
        Ok(bytes.len())
    }

    /// Encode into bytes using this document's compression mode
    pub fn to_bytes(&mut self) -> MobfResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out, self.compression, DEFAULT_GZIP_LEVEL)?;
        Ok(out)
    }

    // =========================================================================
    // Decode
    // =========================================================================

    /// Decode a document, sniffing the compression envelope first
    pub fn read_from<R: Read>(r: R, registry: &TypeRegistry) -> MobfResult<Self> {
        let mut buffered = BufReader::new(r);
        let compression = Compression::sniff(&mut buffered)?;
        let mut reader = compression.reader(buffered);
        let mut document = Self::decode_uncompressed(&mut reader, registry)?;
        document.compression = compression;
        Ok(document)
    }

    /// Decode from bytes with the standard registry
    pub fn from_bytes(bytes: &[u8]) -> MobfResult<Self> {
        Self::read_from(bytes, &TypeRegistry::standard())
    }

    /// Decode a raw (already decompressed) header and body
    pub fn decode_uncompressed<R: Read + ?Sized>(
        r: &mut R,
        registry: &TypeRegistry,
    ) -> MobfResult<Self> {
        let header = Header::read_from(r)?;
        let charset = header.charset();

        let id = r.read_type_id()?;
        if id != TypeId::Object.as_u8() {
            return Err(MobfError::NotAnObject(id));
        }
        let name = r.read_string(charset)?;
        let mut root = registry.instantiate(id)?;
        if root.type_id() != TypeId::Object {
            return Err(MobfError::NotAnObject(id));
        }
        root.decode(r, registry, charset)?;

        debug!(
            target: "mobf::document",
            version = header.version(),
            charset = %charset,
            entries = root.as_object().map_or(0, ObjectValue::len),
            "document decoded"
        );
        Ok(Document {
            header,
            root: root.with_name(name),
            compression: Compression::None,
        })
    }
}
