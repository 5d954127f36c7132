//! Byte sources a store reads from and writes to
//!
//! A [`DocumentSource`] hands out a fresh reader per read and a
//! [`SourceWriter`] per write. Writes become visible only on
//! [`SourceWriter::commit`]; dropping an uncommitted writer discards it.

use mobf_core::MobfResult;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// File extension for persisted documents
pub const MOBF_EXTENSION: &str = "mobf";

/// Pending write; nothing is visible until [`commit`](SourceWriter::commit)
pub trait SourceWriter: Write {
    /// Make everything written so far the source's content
    fn commit(self: Box<Self>) -> MobfResult<()>;
}

/// Where a store's bytes live
pub trait DocumentSource: Send + Sync + fmt::Debug {
    /// Open the current content for reading
    fn open_read(&self) -> MobfResult<Box<dyn Read + '_>>;

    /// Start a replacement of the content
    fn open_write(&self) -> MobfResult<Box<dyn SourceWriter + '_>>;

    /// True if there is content to read
    fn exists(&self) -> bool;
}

// =============================================================================
// File source
// =============================================================================

/// Document stored in a `.mobf` file
///
/// Writes go to a sibling temp file that is fsynced and renamed over the
/// target on commit, so readers never see a half-written document.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source at `path`, with `.mobf` appended unless already present
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileSource {
            path: Self::with_mobf_extension(path.as_ref()),
        }
    }

    /// `path` with the `.mobf` extension enforced
    ///
    /// A different extension is kept and `.mobf` appended after it.
    pub fn with_mobf_extension(path: &Path) -> PathBuf {
        if path.extension().map_or(false, |ext| ext == MOBF_EXTENSION) {
            return path.to_path_buf();
        }
        let mut name = OsString::from(path.as_os_str());
        name.push(".");
        name.push(MOBF_EXTENSION);
        PathBuf::from(name)
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("mobf.tmp")
    }
}

impl DocumentSource for FileSource {
    fn open_read(&self) -> MobfResult<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn open_write(&self) -> MobfResult<Box<dyn SourceWriter + '_>> {
        let temp_path = self.temp_path();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(Box::new(FileWriter {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: &self.path,
        }))
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

struct FileWriter<'a> {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: &'a Path,
}

impl FileWriter<'_> {
    fn inner(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "writer already committed"))
    }
}

impl Write for FileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner()?.flush()
    }
}

impl FileWriter<'_> {
    fn persist(file: BufWriter<File>, temp_path: &Path, final_path: &Path) -> io::Result<()> {
        let file = file.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(temp_path, final_path)?;

        // Sync parent directory so the rename itself is durable
        if let Some(parent) = final_path.parent() {
            if !parent.as_os_str().is_empty() && parent.exists() {
                File::open(parent)?.sync_all()?;
            }
        }
        Ok(())
    }
}

impl SourceWriter for FileWriter<'_> {
    fn commit(mut self: Box<Self>) -> MobfResult<()> {
        let file = match self.file.take() {
            Some(file) => file,
            None => return Ok(()),
        };
        if let Err(e) = Self::persist(file, &self.temp_path, self.final_path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl Drop for FileWriter<'_> {
    fn drop(&mut self) {
        // Uncommitted: discard the temp file
        if self.file.take().is_some() {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                warn!(
                    target: "mobf::store",
                    path = %self.temp_path.display(),
                    error = %e,
                    "failed to remove temp file"
                );
            }
        }
    }
}

// =============================================================================
// Memory source
// =============================================================================

/// Document held in a shared in-memory buffer
///
/// Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemorySource {
    /// Source with no content yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Source preloaded with `bytes`
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        MemorySource {
            bytes: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Copy of the current content
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.lock().clone()
    }
}

impl DocumentSource for MemorySource {
    fn open_read(&self) -> MobfResult<Box<dyn Read + '_>> {
        match self.bytes() {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "memory source is empty").into()),
        }
    }

    fn open_write(&self) -> MobfResult<Box<dyn SourceWriter + '_>> {
        Ok(Box::new(MemoryWriter {
            buf: Vec::new(),
            target: &self.bytes,
        }))
    }

    fn exists(&self) -> bool {
        self.bytes.lock().is_some()
    }
}

struct MemoryWriter<'a> {
    buf: Vec<u8>,
    target: &'a Mutex<Option<Vec<u8>>>,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SourceWriter for MemoryWriter<'_> {
    fn commit(self: Box<Self>) -> MobfResult<()> {
        *self.target.lock() = Some(self.buf);
        Ok(())
    }
}
