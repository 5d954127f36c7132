//! Store configuration via `mobf.toml`
//!
//! Controls how a store writes new output. Reads never need configuration:
//! compression is sniffed and charset and version come from the header.

use crate::compression::{Compression, DEFAULT_GZIP_LEVEL, MAX_GZIP_LEVEL};
use crate::header::FORMAT_VERSION;
use mobf_core::{Charset, MobfError, MobfResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally placed next to the documents
pub const CONFIG_FILE_NAME: &str = "mobf.toml";

/// Store configuration loaded from `mobf.toml`
///
/// # Example
///
/// ```toml
/// compression = "gzip"
/// charset = "utf-8"
/// version = 1
/// gzip_level = 6
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Envelope for writes: `"none"` or `"gzip"`
    #[serde(default)]
    pub compression: Compression,
    /// Charset for new documents: `"utf-8"` or `"utf-16"`
    #[serde(default)]
    pub charset: Charset,
    /// Version byte for new documents
    #[serde(default = "default_version")]
    pub version: u8,
    /// Gzip level, 0 to 9
    #[serde(default = "default_gzip_level")]
    pub gzip_level: u32,
}

fn default_version() -> u8 {
    FORMAT_VERSION
}

fn default_gzip_level() -> u32 {
    DEFAULT_GZIP_LEVEL
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            compression: Compression::None,
            charset: Charset::Utf8,
            version: default_version(),
            gzip_level: default_gzip_level(),
        }
    }
}

impl StoreConfig {
    /// Set the write envelope
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the charset for new documents
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Set the version byte for new documents
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Set the gzip level
    pub fn with_gzip_level(mut self, level: u32) -> Self {
        self.gzip_level = level;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> MobfResult<()> {
        if self.gzip_level > MAX_GZIP_LEVEL {
            return Err(MobfError::invalid_config(format!(
                "gzip_level {} is out of range 0..={}",
                self.gzip_level, MAX_GZIP_LEVEL
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# MOBF store configuration
#
# Envelope for new output: "none" (default) or "gzip".
# Reads detect gzip on their own regardless of this setting.
compression = "none"

# Charset for strings in new documents: "utf-8" (default) or "utf-16"
charset = "utf-8"

# Format version byte written into new headers
version = 1

# Gzip level 0-9, used only when compression = "gzip"
gzip_level = 6
"#
    }

    /// Parse and validate config from TOML text
    pub fn from_toml_str(content: &str) -> MobfResult<Self> {
        let config: StoreConfig = toml::from_str(content)
            .map_err(|e| MobfError::invalid_config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path
    pub fn from_file(path: &Path) -> MobfResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content).map_err(|e| {
            MobfError::invalid_config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist
    pub fn write_default_if_missing(path: &Path) -> MobfResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path
    pub fn write_to_file(&self, path: &Path) -> MobfResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MobfError::invalid_config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
