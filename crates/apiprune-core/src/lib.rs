//! apiprune Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the apiprune
//! variant-pruning engine, following hexagonal (ports and adapters) architecture.
//!
//! A freshly generated project ships both a REST and a GraphQL API surface,
//! interleaved in the same source files. Given the mode the user picked,
//! the engine deletes the unselected variant and leaves a coherent project.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          apiprune-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (PruneService, ManifestService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Filesystem, ConfigRewriter)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    apiprune-adapters (Infrastructure)   │
//! │ (LocalFilesystem, StructuralRewriter..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Manifest, PackageDescriptor, regions,  │
//! │   imports)  No I/O                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apiprune_core::{
//!     application::PruneService,
//!     domain::{ApiMode, ConfigEdits, ProjectLayout},
//! };
//!
//! // Inject adapters (see `apiprune-adapters`)
//! let service = PruneService::new(filesystem, rewriters, ProjectLayout::default(), ConfigEdits::default());
//! let report = service.process_api_mode("./my-server", ApiMode::Rest).unwrap();
//! println!("removed {} paths", report.removed_paths.len());
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ManifestService, PruneReport, PruneService,
        ports::{ConfigRewriter, Filesystem},
    };
    pub use crate::domain::{
        ApiMode, ConfigEdits, Manifest, ModeConfig, PackageDescriptor, ProjectLayout, Variant,
    };
    pub use crate::error::{PruneError, PruneResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
