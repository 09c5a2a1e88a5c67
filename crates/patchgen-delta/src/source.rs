//! Input loading. The diff core only ever sees fully materialized buffers.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DeltaResult;

/// A readable input that can report its size and be loaded in one go.
pub trait ByteSource {
    /// Total size of the input in bytes.
    fn total_size(&mut self) -> DeltaResult<u64>;

    /// Load the whole input into memory.
    fn read_all(&mut self) -> DeltaResult<Vec<u8>>;
}

/// A file on disk.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
}

impl FileSource {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> DeltaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn total_size(&mut self) -> DeltaResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn read_all(&mut self) -> DeltaResult<Vec<u8>> {
        let size = self.total_size()?;
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        self.file.read_to_end(&mut buf)?;
        debug!(path = %self.path.display(), bytes = buf.len(), "loaded input");
        Ok(buf)
    }
}

/// An input already held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    fn total_size(&mut self) -> DeltaResult<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_all(&mut self) -> DeltaResult<Vec<u8>> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeltaError;

    #[test]
    fn file_source_reads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.bin");
        std::fs::write(&path, b"file contents here").unwrap();

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.total_size().unwrap(), 18);
        assert_eq!(source.read_all().unwrap(), b"file contents here");
        // A second load starts from the beginning again.
        assert_eq!(source.read_all().unwrap(), b"file contents here");
    }

    #[test]
    fn file_source_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.total_size().unwrap(), 0);
        assert!(source.read_all().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, DeltaError::Io(_)));
    }

    #[test]
    fn memory_source() {
        let mut source = MemorySource::new(b"abc".to_vec());
        assert_eq!(source.total_size().unwrap(), 3);
        assert_eq!(source.read_all().unwrap(), b"abc");
    }
}
