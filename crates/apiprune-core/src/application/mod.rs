//! Application layer for apiprune.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (PruneService, ManifestService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer sequences the domain transforms but holds no text
//! logic itself. Region and import rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ManifestService, ManifestSummary, ModeSummary, PruneReport, PruneService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ConfigRewriter, Filesystem};

pub use error::ApplicationError;
