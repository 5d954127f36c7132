//! Compression envelope
//!
//! A stream whose first two bytes are the gzip magic is gzip-compressed as
//! a whole; anything else is read as-is. Nothing else records the mode, so
//! reads sniff it and writes use whatever the store is configured with.

use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use mobf_core::MobfResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Read, Write};

/// Gzip member magic
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Default gzip level (flate2's default)
pub const DEFAULT_GZIP_LEVEL: u32 = 6;

/// Highest gzip level
pub const MAX_GZIP_LEVEL: u32 = 9;

/// Envelope applied to the encoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Raw header and body
    #[default]
    None,
    /// Whole stream gzip-compressed
    Gzip,
}

impl Compression {
    /// Mode indicated by the first bytes of a stream
    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    /// Peek at a buffered stream without consuming anything
    pub fn sniff<R: BufRead + ?Sized>(r: &mut R) -> MobfResult<Self> {
        Ok(Self::detect(r.fill_buf()?))
    }

    /// Write `bytes` through this envelope
    ///
    /// The gzip encoder is finished before returning, so the trailer is
    /// always written on success.
    pub fn write_all<W: Write + ?Sized>(self, bytes: &[u8], w: &mut W, level: u32) -> MobfResult<()> {
        match self {
            Compression::None => w.write_all(bytes)?,
            Compression::Gzip => {
                let mut encoder =
                    GzEncoder::new(&mut *w, flate2::Compression::new(level.min(MAX_GZIP_LEVEL)));
                encoder.write_all(bytes)?;
                encoder.finish()?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Wrap a buffered stream so reads yield the raw document bytes
    pub fn reader<'a, R: BufRead + 'a>(self, r: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(r),
            Compression::Gzip => Box::new(GzDecoder::new(r)),
        }
    }

    /// Config-file spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
