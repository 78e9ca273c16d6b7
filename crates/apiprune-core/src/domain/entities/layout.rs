use serde::{Deserialize, Serialize};

use crate::domain::entities::manifest::ControlScript;

pub const DEFAULT_MANIFEST_FILE: &str = "api-mode.manifest.json";
pub const DEFAULT_PACKAGE_FILE: &str = "package.json";
pub const DEFAULT_CONTROL_SCRIPT: &str = "scripts/strip-markers.mjs";
pub const DEFAULT_CONTROL_SCRIPT_ENTRY: &str = "strip-markers";
pub const DEFAULT_CONFIG_MODULE: &str = "src/config.env.ts";

/// Where things live inside a generated project.
///
/// All paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    pub manifest_file: String,
    pub package_file: String,
    pub control_script: ControlScript,
    /// Trees that get region stripping and import cleaning.
    pub source_roots: Vec<String>,
    /// Trees that get region stripping only.
    pub test_roots: Vec<String>,
    /// File extensions (without the dot) treated as source.
    pub extensions: Vec<String>,
    pub config_module: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            manifest_file: DEFAULT_MANIFEST_FILE.into(),
            package_file: DEFAULT_PACKAGE_FILE.into(),
            control_script: ControlScript {
                path: DEFAULT_CONTROL_SCRIPT.into(),
                script: DEFAULT_CONTROL_SCRIPT_ENTRY.into(),
            },
            source_roots: vec!["src".into()],
            test_roots: vec!["tests".into()],
            extensions: vec!["ts".into(), "js".into()],
            config_module: DEFAULT_CONFIG_MODULE.into(),
        }
    }
}

impl ProjectLayout {
    /// Does `path` carry one of the configured source extensions?
    pub fn is_source_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// The control script to delete, preferring a manifest override.
    pub fn control_script_for<'a>(
        &'a self,
        manifest_override: Option<&'a ControlScript>,
    ) -> &'a ControlScript {
        manifest_override.unwrap_or(&self.control_script)
    }
}
