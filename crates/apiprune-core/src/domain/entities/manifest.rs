//! The declarative variant manifest (`api-mode.manifest.json`).
//!
//! A manifest describes, per variant, which files, dependencies, script
//! entries and script-text edits belong to it, and which marker name
//! delimits its regions in source files.
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "modes": {
//!     "graphql": {
//!       "filePatterns": ["src/**/*.resolver.ts"],
//!       "packages": ["graphql-subscriptions"],
//!       "devPackages": ["@graphql-codegen/cli"],
//!       "scripts": ["codegen"],
//!       "scriptEdits": { "build": { "remove": " && npm run codegen" } },
//!       "regionMarker": "graphql"
//!     },
//!     "rest": { "regionMarker": "rest" }
//!   }
//! }
//! ```
//!
//! Every field except `regionMarker` is optional; an absent field means
//! "nothing to do for that aspect".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, value_objects::Variant};

/// Parsed and validated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    pub modes: BTreeMap<String, ModeConfig>,
    /// Overrides the project layout's control script for this template.
    #[serde(default, rename = "controlScript", skip_serializing_if = "Option::is_none")]
    pub control_script: Option<ControlScript>,
}

/// What one variant owns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeConfig {
    #[serde(default)]
    pub file_patterns: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub dev_packages: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub script_edits: BTreeMap<String, ScriptEdit>,
    pub region_marker: String,
}

/// Remove the first literal occurrence of `remove` from a retained script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEdit {
    pub remove: String,
}

/// The marker-stripping utility shipped with a template, and its
/// `package.json` script entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScript {
    pub path: String,
    pub script: String,
}

impl Manifest {
    /// Parse and validate manifest JSON.
    ///
    /// `origin` only labels errors (usually the manifest path).
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, DomainError> {
        let manifest: Manifest =
            serde_json::from_str(raw).map_err(|e| DomainError::InvalidManifest {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;
        manifest.validate(origin)?;
        Ok(manifest)
    }

    /// Both variants must be present and carry a usable region marker.
    fn validate(&self, origin: &str) -> Result<(), DomainError> {
        for variant in Variant::ALL {
            let config = self.modes.get(variant.key()).ok_or_else(|| {
                DomainError::InvalidManifest {
                    path: origin.to_string(),
                    reason: format!("missing mode '{}'", variant.key()),
                }
            })?;

            let marker = config.region_marker.trim();
            if marker.is_empty() || marker.contains(char::is_whitespace) {
                return Err(DomainError::InvalidManifest {
                    path: origin.to_string(),
                    reason: format!(
                        "mode '{}' has an invalid regionMarker {:?}",
                        variant.key(),
                        config.region_marker
                    ),
                });
            }
        }

        let graphql = &self.modes[Variant::GraphQl.key()];
        let rest = &self.modes[Variant::Rest.key()];
        if graphql.region_marker.trim() == rest.region_marker.trim() {
            return Err(DomainError::InvalidManifest {
                path: origin.to_string(),
                reason: "graphql and rest share the same regionMarker".into(),
            });
        }

        Ok(())
    }

    /// The configuration of one variant.
    pub fn mode(&self, variant: Variant) -> Result<&ModeConfig, DomainError> {
        self.modes
            .get(variant.key())
            .ok_or_else(|| DomainError::MissingMode {
                mode: variant.key().to_string(),
            })
    }

    /// Region marker names of every declared mode, in key order.
    pub fn region_markers(&self) -> Vec<&str> {
        self.modes
            .values()
            .map(|m| m.region_marker.trim())
            .collect()
    }
}

impl ModeConfig {
    /// `true` when this mode declares nothing but its marker.
    pub fn is_marker_only(&self) -> bool {
        self.file_patterns.is_empty()
            && self.packages.is_empty()
            && self.dev_packages.is_empty()
            && self.scripts.is_empty()
            && self.script_edits.is_empty()
    }
}
