//! Core domain layer for apiprune.
//!
//! This module contains the pure text and document transforms. All I/O is
//! handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem or process calls
//! - **Narrow dependencies**: std, serde/serde_json for documents, thiserror
//! - **Pure transforms**: Every function maps input text to output text
//!
pub mod config_edit;
pub mod entities;
pub mod error;
pub mod imports;
pub mod regions;
pub mod value_objects;

// Re-exports for convenience
pub use config_edit::{ConfigEdits, PropertyEdit};
pub use entities::{
    ControlScript, Manifest, ModeConfig, PackageChanges, PackageDescriptor, ProjectLayout,
    ScriptEdit,
};
pub use error::{DomainError, ErrorCategory};
pub use value_objects::{ApiMode, Variant};

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "version": "1.0.0",
        "modes": {
            "graphql": { "regionMarker": "graphql" },
            "rest": { "regionMarker": "rest" }
        }
    }"#;

    // ========================================================================
    // Cross-module pipeline
    // ========================================================================

    #[test]
    fn strip_then_clean_drops_imports_of_removed_code() {
        let manifest = Manifest::from_json(MANIFEST, "m.json").unwrap();
        let mode = ApiMode::Rest;
        let removed = manifest.mode(mode.removed_variant().unwrap()).unwrap();
        let kept = manifest.mode(mode.kept_variant().unwrap()).unwrap();

        let src = "\
import { Module } from '@nestjs/common';
import { GraphQLModule } from '@nestjs/graphql';
import { UsersController } from './users.controller';

@Module({
  // #region graphql
  imports: [GraphQLModule.forRoot({})],
  // #endregion graphql
  // #region rest
  controllers: [UsersController],
  // #endregion rest
})
export class AppModule {}
";
        let stripped = regions::strip(src, &removed.region_marker, &kept.region_marker);
        let cleaned = imports::clean_orphan_imports(&stripped);

        assert_eq!(
            cleaned,
            "\
import { Module } from '@nestjs/common';
import { UsersController } from './users.controller';

@Module({
  controllers: [UsersController],
})
export class AppModule {}
"
        );
    }

    #[test]
    fn markers_of_every_mode_are_known() {
        let manifest = Manifest::from_json(MANIFEST, "m.json").unwrap();
        assert_eq!(manifest.region_markers(), vec!["graphql", "rest"]);
    }
}
