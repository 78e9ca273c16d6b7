//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `apiprune-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::ConfigEdits;
use crate::error::PruneResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `apiprune_adapters::filesystem::LocalFilesystem` (production)
/// - `apiprune_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Removal is idempotent: an absent path is success, not an error
/// - Listing and globbing return sorted, de-duplicated paths
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> PruneResult<String>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> PruneResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file or a directory with all its contents.
    ///
    /// Returns `false` if nothing was there.
    fn remove(&self, path: &Path) -> PruneResult<bool>;

    /// Every file below `dir`, recursively. A missing `dir` yields nothing.
    fn list_files(&self, dir: &Path) -> PruneResult<Vec<PathBuf>>;

    /// Resolve a glob (`**` supported) relative to `root`.
    ///
    /// Matches are returned joined onto `root`. Both files and directories
    /// can match. An unmatched pattern yields nothing.
    fn glob(&self, root: &Path, pattern: &str) -> PruneResult<Vec<PathBuf>>;
}

/// Port for rewriting the environment configuration module.
///
/// Implemented by:
/// - `apiprune_adapters::rewriter::StructuralRewriter` (object-literal parse)
/// - `apiprune_adapters::rewriter::TextualRewriter` (pattern fallback)
///
/// Strategies are tried in order; an `Err` hands the source to the next.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigRewriter: Send + Sync {
    /// Short strategy name for logs and reports.
    fn name(&self) -> &'static str;

    /// Apply `edits` to the module source, returning the new source.
    fn rewrite(&self, source: &str, edits: &ConfigEdits) -> PruneResult<String>;
}
