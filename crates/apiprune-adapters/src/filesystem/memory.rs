//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use apiprune_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{PruneError, PruneResult},
};

use super::pattern;

/// In-memory filesystem for testing.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    writes: usize,
}

impl MemoryFilesystemInner {
    fn add_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.into();
            inner.add_parents(&path);
            inner.files.insert(path, content.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `write_file` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|inner| inner.writes).unwrap_or(0)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> PruneResult<String> {
        let inner = self.inner.read().map_err(|_| lock_error(path))?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> PruneResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove(&self, path: &Path) -> PruneResult<bool> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;

        if inner.files.remove(path).is_some() {
            return Ok(true);
        }
        if !inner.directories.remove(path) {
            return Ok(false);
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(true)
    }

    fn list_files(&self, dir: &Path) -> PruneResult<Vec<PathBuf>> {
        let inner = self.inner.read().map_err(|_| lock_error(dir))?;
        Ok(inner
            .files
            .keys()
            .filter(|p| {
                p.strip_prefix(dir)
                    .is_ok_and(|rel| !pattern::is_skipped(rel))
            })
            .cloned()
            .collect())
    }

    fn glob(&self, root: &Path, glob: &str) -> PruneResult<Vec<PathBuf>> {
        let matcher = pattern::compile(glob)?;
        let inner = self.inner.read().map_err(|_| lock_error(root))?;

        let mut matches: Vec<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| {
                p.strip_prefix(root).is_ok_and(|rel| {
                    !rel.as_os_str().is_empty() && !pattern::is_skipped(rel) && matcher.is_match(rel)
                })
            })
            .cloned()
            .collect();
        matches.sort();
        Ok(matches)
    }
}

fn lock_error(path: &Path) -> PruneError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "Memory filesystem lock poisoned".into(),
    }
    .into()
}
