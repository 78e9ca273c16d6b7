//! Glob compilation shared by the filesystem adapters.

use std::path::Path;

use apiprune_core::{domain::DomainError, error::PruneResult};
use globset::{GlobBuilder, GlobMatcher};

/// Directories never descended into when listing or globbing.
pub(crate) const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Compile a manifest file pattern.
///
/// `*` stays within one path segment; `**` crosses any number of them.
pub(crate) fn compile(pattern: &str) -> PruneResult<GlobMatcher> {
    let normalized = pattern.trim().trim_start_matches("./");
    let glob = GlobBuilder::new(normalized)
        .literal_separator(true)
        .build()
        .map_err(|e| DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })?;
    Ok(glob.compile_matcher())
}

/// Is any component of `relative` a skipped directory?
pub(crate) fn is_skipped(relative: &Path) -> bool {
    relative.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
    })
}
