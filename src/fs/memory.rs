//! In-memory [`FileSystem`] for tests. Tracks open handles so tests can assert
//! that readers are released on every path.

use super::{DirEntry, FileSystem, RangeReader};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, Arc<Vec<u8>>>,
    dirs: BTreeSet<PathBuf>,
    denied_dirs: HashSet<PathBuf>,
    failing_reads: HashSet<PathBuf>,
    open_handles: Arc<AtomicUsize>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        self.add_parents(&path);
        self.files.insert(path, Arc::new(contents.into()));
    }

    pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.insert(path);
    }

    /// Listing this directory fails with `PermissionDenied`.
    pub fn deny_dir(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_dir(path.clone());
        self.denied_dirs.insert(path);
    }

    /// Opening succeeds but every read of this file fails.
    pub fn fail_reads(&mut self, path: impl Into<PathBuf>) {
        self.failing_reads.insert(path.into());
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    fn add_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(parent) = current {
            if parent.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(parent.to_path_buf());
            current = parent.parent();
        }
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if self.denied_dirs.contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if !self.dirs.contains(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        let dirs = self
            .dirs
            .iter()
            .filter(|dir| dir.parent() == Some(path))
            .map(|dir| DirEntry {
                path: dir.clone(),
                is_dir: true,
            });
        let files = self
            .files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .map(|file| DirEntry {
                path: file.clone(),
                is_dir: false,
            });

        Ok(dirs.chain(files).collect())
    }

    async fn file_size(&self, path: &Path) -> io::Result<u64> {
        self.files
            .get(path)
            .map(|contents| contents.len() as u64)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    async fn open(&self, path: &Path) -> io::Result<Box<dyn RangeReader>> {
        let contents = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;

        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryFile {
            contents,
            fail_reads: self.failing_reads.contains(path),
            open_handles: Arc::clone(&self.open_handles),
        }))
    }
}

struct MemoryFile {
    contents: Arc<Vec<u8>>,
    fail_reads: bool,
    open_handles: Arc<AtomicUsize>,
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RangeReader for MemoryFile {
    async fn len(&mut self) -> io::Result<u64> {
        Ok(self.contents.len() as u64)
    }

    async fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        if self.fail_reads {
            return Err(io::Error::other("simulated read failure"));
        }

        let start = (offset as usize).min(self.contents.len());
        let end = start.saturating_add(len).min(self.contents.len());
        Ok(self.contents[start..end].to_vec())
    }
}
