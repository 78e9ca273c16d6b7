pub mod layout;
pub mod manifest;
pub mod package;

pub use crate::domain::DomainError;
pub use layout::ProjectLayout;
pub use manifest::{ControlScript, Manifest, ModeConfig, ScriptEdit};
pub use package::{PackageChanges, PackageDescriptor};
