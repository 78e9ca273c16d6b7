//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "prune a project to one API mode" or
//! "describe what a manifest would remove".

pub mod manifest_service;
pub mod prune_service;

pub use manifest_service::{ManifestService, ManifestSummary, ModeSummary};
pub use prune_service::{PruneReport, PruneService};
