// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so reports can carry them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid manifest '{path}': {reason}")]
    InvalidManifest { path: String, reason: String },

    #[error("Invalid package descriptor '{path}': {reason}")]
    InvalidPackageDescriptor { path: String, reason: String },

    #[error("Malformed region markers in {path} at line {line}: {reason}")]
    MalformedRegions {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown API mode: {0}")]
    UnknownMode(String),

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Manifest has no '{mode}' mode")]
    MissingMode { mode: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidManifest { path, reason } => vec![
                format!("The manifest at {} could not be used", path),
                format!("Details: {}", reason),
                "Every mode needs a non-empty \"regionMarker\"".into(),
            ],
            Self::InvalidPackageDescriptor { path, .. } => vec![
                format!("Check that {} is valid JSON", path),
                "Nothing is edited until the descriptor parses".into(),
            ],
            Self::MalformedRegions { path, line, .. } => vec![
                format!("Inspect {}:{}", path.display(), line),
                "Every '// #region <name>' needs a matching '// #endregion <name>'".into(),
                "Spans of different names may nest but must not cross".into(),
            ],
            Self::UnknownMode(_) => vec!["Supported modes: rest, graphql, both".into()],
            Self::MissingMode { mode } => vec![
                format!("Add a \"{}\" entry under \"modes\" in the manifest", mode),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidManifest { .. }
            | Self::InvalidPackageDescriptor { .. }
            | Self::MalformedRegions { .. }
            | Self::InvalidPattern { .. }
            | Self::UnknownMode(_) => ErrorCategory::Validation,
            Self::MissingMode { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
