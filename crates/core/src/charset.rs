//! String charsets declared in the document header

use crate::error::{MobfError, MobfResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Charset used for every string in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    /// Standard UTF-8 (wire id `0x01`)
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-16, big-endian code units (wire id `0x02`)
    #[serde(rename = "utf-16")]
    Utf16,
}

impl Charset {
    /// Header byte for this charset
    pub const fn id(self) -> u8 {
        match self {
            Charset::Utf8 => 0x01,
            Charset::Utf16 => 0x02,
        }
    }

    /// Parse a header byte
    pub fn from_id(id: u8) -> MobfResult<Self> {
        match id {
            0x01 => Ok(Charset::Utf8),
            0x02 => Ok(Charset::Utf16),
            other => Err(MobfError::BadCharset(other)),
        }
    }

    /// Encode `s` into its wire bytes (without the length prefix)
    pub fn encode(self, s: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => s.as_bytes().to_vec(),
            Charset::Utf16 => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }

    /// Decode wire bytes (without the length prefix)
    pub fn decode(self, bytes: Vec<u8>) -> MobfResult<String> {
        match self {
            Charset::Utf8 => {
                String::from_utf8(bytes).map_err(|e| MobfError::invalid_string(e.to_string()))
            }
            Charset::Utf16 => {
                if bytes.len() % 2 != 0 {
                    return Err(MobfError::invalid_string(format!(
                        "odd UTF-16 byte length {}",
                        bytes.len()
                    )));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|e| MobfError::invalid_string(e.to_string()))
            }
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charset::Utf8 => f.write_str("utf-8"),
            Charset::Utf16 => f.write_str("utf-16"),
        }
    }
}
