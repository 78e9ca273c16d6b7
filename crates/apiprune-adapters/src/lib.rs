//! Infrastructure adapters for apiprune.
//!
//! This crate implements the ports defined in `apiprune-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod rewriter;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use rewriter::{StructuralRewriter, TextualRewriter, default_chain};
