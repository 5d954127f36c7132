//! Document header
//!
//! ## Layout
//!
//! ```text
//! offset  size  field
//! 0       4     magic "MOBF"
//! 4       1     charset id (0x01 UTF-8, 0x02 UTF-16)
//! 5       1     format version
//! 6       2     reserved, must be zero
//! ```
//!
//! Offsets are relative to the (possibly decompressed) byte stream.

use mobf_core::{Charset, MobfError, MobfResult};
use std::io::{Read, Write};

/// Magic bytes opening every document
pub const MAGIC: [u8; 4] = *b"MOBF";

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Version written by default
pub const FORMAT_VERSION: u8 = 1;

/// Parsed document header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    charset: Charset,
    version: u8,
}

impl Default for Header {
    fn default() -> Self {
        Header::new(Charset::Utf8, FORMAT_VERSION)
    }
}

impl Header {
    /// Header with the given charset and version
    pub fn new(charset: Charset, version: u8) -> Self {
        Header { charset, version }
    }

    /// Charset every string in the body uses
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Format version byte
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Serialize to the fixed 8-byte layout
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4] = self.charset.id();
        bytes[5] = self.version;
        bytes
    }

    /// Parse the fixed 8-byte layout
    ///
    /// Checks run in layout order: signature, charset, reserved bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> MobfResult<Self> {
        let found = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if found != MAGIC {
            return Err(MobfError::BadSignature {
                expected: MAGIC,
                found,
            });
        }
        let charset = Charset::from_id(bytes[4])?;
        let version = bytes[5];
        let trailer = [bytes[6], bytes[7]];
        if trailer != [0, 0] {
            return Err(MobfError::BadTrailer(trailer));
        }
        Ok(Header { charset, version })
    }

    /// Write the header; returns bytes written
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> MobfResult<usize> {
        w.write_all(&self.to_bytes())?;
        Ok(HEADER_SIZE)
    }

    /// Read and validate a header
    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> MobfResult<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        r.read_exact(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}
