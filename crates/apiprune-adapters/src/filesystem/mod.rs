//! Filesystem adapters.

mod local;
mod memory;
mod pattern;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
