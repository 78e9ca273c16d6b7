//! Manifest Service - read-only manifest inspection.
//!
//! Reports what each mode owns and what it currently matches in the
//! project, without changing anything.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{ControlScript, Manifest, ProjectLayout, regions},
    error::PruneResult,
};

/// Summary of a manifest and its effect on the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestSummary {
    pub path: PathBuf,
    pub version: String,
    pub control_script: ControlScript,
    pub modes: Vec<ModeSummary>,
}

/// One mode of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeSummary {
    pub name: String,
    pub region_marker: String,
    pub file_patterns: Vec<String>,
    /// Paths the patterns match right now, relative to the project root.
    pub matched_paths: Vec<PathBuf>,
    pub packages: Vec<String>,
    pub dev_packages: Vec<String>,
    pub scripts: Vec<String>,
    pub script_edits: Vec<String>,
    /// Source and test files containing this mode's markers.
    pub marked_files: Vec<PathBuf>,
}

/// Service for manifest inspection.
pub struct ManifestService {
    filesystem: Box<dyn Filesystem>,
    layout: ProjectLayout,
}

impl ManifestService {
    /// Create a new manifest service.
    pub fn new(filesystem: Box<dyn Filesystem>, layout: ProjectLayout) -> Self {
        Self { filesystem, layout }
    }

    /// Load the manifest of `project`. Unlike pruning, a missing manifest
    /// is an error here.
    pub fn load(&self, project: &Path) -> PruneResult<Manifest> {
        if !self.filesystem.exists(project) {
            return Err(ApplicationError::ProjectNotFound {
                path: project.to_path_buf(),
            }
            .into());
        }

        let path = project.join(&self.layout.manifest_file);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::ManifestNotFound { path }.into());
        }

        let raw = self.filesystem.read_to_string(&path)?;
        Ok(Manifest::from_json(&raw, &path.display().to_string())?)
    }

    /// Describe the manifest of `project` and what it currently matches.
    #[instrument(skip_all, fields(project = %project.display()))]
    pub fn inspect(&self, project: &Path) -> PruneResult<ManifestSummary> {
        let manifest = self.load(project)?;
        let sources = self.source_files(project)?;

        let mut modes = Vec::with_capacity(manifest.modes.len());
        for (name, mode) in &manifest.modes {
            let mut matched_paths = Vec::new();
            for pattern in &mode.file_patterns {
                for path in self.filesystem.glob(project, pattern)? {
                    let rel = relative(project, &path);
                    if !matched_paths.contains(&rel) {
                        matched_paths.push(rel);
                    }
                }
            }
            matched_paths.sort();

            let marker = [mode.region_marker.trim()];
            let marked_files = sources
                .iter()
                .filter(|(_, content)| regions::has_markers(content, &marker))
                .map(|(path, _)| relative(project, path))
                .collect();

            modes.push(ModeSummary {
                name: name.clone(),
                region_marker: mode.region_marker.clone(),
                file_patterns: mode.file_patterns.clone(),
                matched_paths,
                packages: mode.packages.clone(),
                dev_packages: mode.dev_packages.clone(),
                scripts: mode.scripts.clone(),
                script_edits: mode.script_edits.keys().cloned().collect(),
                marked_files,
            });
        }

        Ok(ManifestSummary {
            path: PathBuf::from(&self.layout.manifest_file),
            version: manifest.version.clone(),
            control_script: self
                .layout
                .control_script_for(manifest.control_script.as_ref())
                .clone(),
            modes,
        })
    }

    fn source_files(&self, project: &Path) -> PruneResult<Vec<(PathBuf, String)>> {
        let mut files = Vec::new();
        for dir in self.layout.source_roots.iter().chain(&self.layout.test_roots) {
            for path in self.filesystem.list_files(&project.join(dir))? {
                if self.layout.is_source_file(&path) {
                    let content = self.filesystem.read_to_string(&path)?;
                    files.push((path, content));
                }
            }
        }
        Ok(files)
    }
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::error::{ErrorCategory, PruneError};

    const MANIFEST: &str = r#"{
        "version": "2.1.0",
        "modes": {
            "graphql": {
                "filePatterns": ["src/**/*.resolver.ts"],
                "packages": ["@nestjs/graphql"],
                "scriptEdits": { "build": { "remove": " && codegen" } },
                "regionMarker": "graphql"
            },
            "rest": { "regionMarker": "rest" }
        }
    }"#;

    #[test]
    fn missing_project_is_not_found() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);

        let err = ManifestService::new(Box::new(fs), ProjectLayout::default())
            .inspect(Path::new("/nope"))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(matches!(
            err,
            PruneError::Application(ApplicationError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| !p.ends_with("api-mode.manifest.json"));

        let err = ManifestService::new(Box::new(fs), ProjectLayout::default())
            .inspect(Path::new("/proj"))
            .unwrap_err();
        assert!(matches!(
            err,
            PruneError::Application(ApplicationError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn inspect_reports_matches_and_marked_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string().returning(|p| {
            Ok(if p.ends_with("api-mode.manifest.json") {
                MANIFEST.to_string()
            } else {
                "// #region graphql\nq\n// #endregion graphql\n".to_string()
            })
        });
        fs.expect_list_files().returning(|dir| {
            Ok(if dir.ends_with("src") {
                vec![PathBuf::from("/proj/src/app.module.ts")]
            } else {
                vec![]
            })
        });
        fs.expect_glob().returning(|_, _| {
            Ok(vec![
                PathBuf::from("/proj/src/users/users.resolver.ts"),
                PathBuf::from("/proj/src/users/users.resolver.ts"),
            ])
        });

        let summary = ManifestService::new(Box::new(fs), ProjectLayout::default())
            .inspect(Path::new("/proj"))
            .unwrap();

        assert_eq!(summary.version, "2.1.0");
        assert_eq!(summary.control_script.script, "strip-markers");
        let graphql = &summary.modes[0];
        assert_eq!(graphql.name, "graphql");
        assert_eq!(
            graphql.matched_paths,
            vec![PathBuf::from("src/users/users.resolver.ts")]
        );
        assert_eq!(graphql.script_edits, vec!["build"]);
        assert_eq!(
            graphql.marked_files,
            vec![PathBuf::from("src/app.module.ts")]
        );
        let rest = &summary.modes[1];
        assert!(rest.marked_files.is_empty());
        assert!(rest.matched_paths.is_empty());
    }
}
