//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use apiprune_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{PruneError, PruneResult},
};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use super::pattern;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }

    /// Walk `dir` in name order, skipping dependency and VCS directories.
    fn walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !pattern::SKIPPED_DIRS.contains(&name))
            })
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> PruneResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PruneResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> PruneResult<bool> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(map_io_error(path, e, "inspect path")),
        };

        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };

        match result {
            Ok(()) => {
                trace!(path = %path.display(), "Removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_io_error(path, e, "remove path")),
        }
    }

    fn list_files(&self, dir: &Path) -> PruneResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in Self::walk(dir) {
            let entry = entry.map_err(|e| map_walk_error(dir, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn glob(&self, root: &Path, glob: &str) -> PruneResult<Vec<PathBuf>> {
        let matcher = pattern::compile(glob)?;
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in Self::walk(root) {
            let entry = entry.map_err(|e| map_walk_error(root, e))?;
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if matcher.is_match(relative) {
                matches.push(entry.into_path());
            }
        }
        matches.sort();
        Ok(matches)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PruneError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

fn map_walk_error(root: &Path, e: walkdir::Error) -> PruneError {
    ApplicationError::FilesystemError {
        path: e.path().unwrap_or(root).to_path_buf(),
        reason: format!("Failed to walk directory: {}", e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/users")).unwrap();
        fs::create_dir_all(root.join("src/graphql")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/main.ts"), "main").unwrap();
        fs::write(root.join("src/users/users.resolver.ts"), "r").unwrap();
        fs::write(root.join("src/graphql/schema.ts"), "s").unwrap();
        fs::write(root.join("node_modules/pkg/a.resolver.ts"), "x").unwrap();
        dir
    }

    #[test]
    fn glob_matches_recursively_and_skips_node_modules() {
        let dir = project();
        let fs = LocalFilesystem::new();
        let found = fs.glob(dir.path(), "**/*.resolver.ts").unwrap();
        assert_eq!(found, vec![dir.path().join("src/users/users.resolver.ts")]);
    }

    #[test]
    fn glob_can_match_directories() {
        let dir = project();
        let found = LocalFilesystem::new()
            .glob(dir.path(), "src/graphql")
            .unwrap();
        assert_eq!(found, vec![dir.path().join("src/graphql")]);
    }

    #[test]
    fn unmatched_glob_is_empty() {
        let dir = project();
        assert!(LocalFilesystem::new()
            .glob(dir.path(), "src/**/*.gql")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn remove_is_idempotent_for_files_and_dirs() {
        let dir = project();
        let fs = LocalFilesystem::new();
        let graphql = dir.path().join("src/graphql");
        let main = dir.path().join("src/main.ts");

        assert!(fs.remove(&graphql).unwrap());
        assert!(!graphql.exists());
        assert!(!fs.remove(&graphql).unwrap());

        assert!(fs.remove(&main).unwrap());
        assert!(!fs.remove(&main).unwrap());
    }

    #[test]
    fn list_files_is_sorted_and_tolerates_missing_dirs() {
        let dir = project();
        let fs = LocalFilesystem::new();
        let files = fs.list_files(&dir.path().join("src")).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("src/graphql/schema.ts"),
                dir.path().join("src/main.ts"),
                dir.path().join("src/users/users.resolver.ts"),
            ]
        );
        assert!(fs.list_files(&dir.path().join("tests")).unwrap().is_empty());
    }

    #[test]
    fn read_missing_file_is_filesystem_error() {
        let dir = project();
        let err = LocalFilesystem::new()
            .read_to_string(&dir.path().join("nope.ts"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
