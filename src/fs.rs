use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

#[cfg(test)]
pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// An open file that can be read at arbitrary offsets. Dropping it releases the handle.
#[async_trait]
pub trait RangeReader: Send {
    async fn len(&mut self) -> io::Result<u64>;

    /// Read up to `len` bytes starting at `offset`. Short reads only happen at end of file.
    async fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>>;
}

/// Filesystem primitives the scanner depends on
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    async fn file_size(&self, path: &Path) -> io::Result<u64>;

    async fn open(&self, path: &Path) -> io::Result<Box<dyn RangeReader>>;
}

/// The real filesystem, backed by `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut read_dir = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(entry) = read_dir.next_entry().await? {
            // Entries whose type can't be determined are treated as files and
            // filtered out later by extension or stat. Symlinks are followed.
            let is_dir = match entry.file_type().await {
                Ok(file_type) if file_type.is_symlink() => tokio::fs::metadata(entry.path())
                    .await
                    .is_ok_and(|metadata| metadata.is_dir()),
                Ok(file_type) => file_type.is_dir(),
                Err(_) => false,
            };
            entries.push(DirEntry {
                path: entry.path(),
                is_dir,
            });
        }

        Ok(entries)
    }

    async fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn open(&self, path: &Path) -> io::Result<Box<dyn RangeReader>> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(LocalFile { file }))
    }
}

struct LocalFile {
    file: tokio::fs::File,
}

#[async_trait]
impl RangeReader for LocalFile {
    async fn len(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata().await?.len())
    }

    async fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset)).await?;

        let mut buf = Vec::with_capacity(len);
        (&mut self.file).take(len as u64).read_to_end(&mut buf).await?;
        Ok(buf)
    }
}
