//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! text transforms. Transform and document errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A configuration rewrite strategy could not handle the module.
    #[error("{strategy} rewrite failed: {reason}")]
    RewriteFailed {
        strategy: &'static str,
        reason: String,
    },

    /// No manifest where one was required (inspection only; pruning
    /// treats a missing manifest as a no-op).
    #[error("No manifest found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// The project directory does not exist.
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "The project may be partially pruned; inspect it before re-running".into(),
            ],
            Self::RewriteFailed { strategy, .. } => vec![
                format!("The {} strategy could not parse the config module", strategy),
                "Edit the config module by hand".into(),
            ],
            Self::ManifestNotFound { path } => vec![
                format!("Expected a manifest at {}", path.display()),
                "The project may already be finalized".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("Directory does not exist: {}", path.display()),
                "Pass the path of a generated project".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::RewriteFailed { .. } => ErrorCategory::Validation,
            Self::ManifestNotFound { .. } | Self::ProjectNotFound { .. } => {
                ErrorCategory::NotFound
            }
        }
    }
}
