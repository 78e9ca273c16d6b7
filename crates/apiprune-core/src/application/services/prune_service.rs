//! Prune Service - main application orchestrator.
//!
//! This service coordinates the whole pruning workflow for one project:
//! 1. Load the manifest (absent or unreadable means nothing to do)
//! 2. Validate region markers in every source and test file
//! 3. Delete the removed variant's files
//! 4. Edit the package descriptor
//! 5. Strip regions, then clean orphan imports in source files
//! 6. Rewrite the config module (REST only)
//! 7. Delete the manifest and control script
//!
//! Steps run strictly in sequence. There is no rollback: a failure part
//! way through leaves the project as far as it got.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ConfigRewriter, Filesystem},
    },
    domain::{
        ApiMode, ConfigEdits, ControlScript, Manifest, ModeConfig, PackageDescriptor,
        ProjectLayout, imports, regions,
    },
    error::PruneResult,
};

/// What a [`PruneService::process_api_mode`] run did.
///
/// All paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub mode: ApiMode,
    pub manifest_found: bool,
    pub removed_paths: Vec<PathBuf>,
    pub rewritten_files: Vec<PathBuf>,
    pub removed_dependencies: Vec<String>,
    pub removed_scripts: Vec<String>,
    pub edited_scripts: Vec<String>,
    /// Strategy that rewrote the config module, if it was rewritten.
    pub config_strategy: Option<String>,
}

impl PruneReport {
    fn new(mode: ApiMode) -> Self {
        Self {
            mode,
            manifest_found: false,
            removed_paths: Vec::new(),
            rewritten_files: Vec::new(),
            removed_dependencies: Vec::new(),
            removed_scripts: Vec::new(),
            edited_scripts: Vec::new(),
            config_strategy: None,
        }
    }

    /// `true` if the run touched nothing.
    pub fn is_noop(&self) -> bool {
        self.removed_paths.is_empty()
            && self.rewritten_files.is_empty()
            && self.removed_dependencies.is_empty()
            && self.removed_scripts.is_empty()
            && self.edited_scripts.is_empty()
    }
}

/// A source or test file loaded for transformation.
struct SourceFile {
    path: PathBuf,
    content: String,
    /// Source files get import cleaning; test files do not.
    clean_imports: bool,
}

/// Main pruning service.
pub struct PruneService {
    filesystem: Box<dyn Filesystem>,
    rewriters: Vec<Box<dyn ConfigRewriter>>,
    layout: ProjectLayout,
    edits: ConfigEdits,
}

impl PruneService {
    /// Create a new prune service with the given adapters.
    ///
    /// `rewriters` are tried in order on the config module; put the most
    /// precise strategy first.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use apiprune_core::application::PruneService;
    /// use apiprune_core::domain::{ConfigEdits, ProjectLayout};
    ///
    /// let service = PruneService::new(
    ///     filesystem, // Box<dyn Filesystem>
    ///     rewriters,  // Vec<Box<dyn ConfigRewriter>>
    ///     ProjectLayout::default(),
    ///     ConfigEdits::default(),
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        rewriters: Vec<Box<dyn ConfigRewriter>>,
        layout: ProjectLayout,
        edits: ConfigEdits,
    ) -> Self {
        Self {
            filesystem,
            rewriters,
            layout,
            edits,
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Prune `project` down to `mode`.
    ///
    /// A project without a readable manifest is left untouched and yields a
    /// report with `manifest_found == false`.
    #[instrument(skip_all, fields(project = %project.as_ref().display(), mode = %mode))]
    pub fn process_api_mode(
        &self,
        project: impl AsRef<Path>,
        mode: ApiMode,
    ) -> PruneResult<PruneReport> {
        let root = project.as_ref();
        let mut report = PruneReport::new(mode);

        let Some(manifest) = self.load_manifest(root)? else {
            info!("No manifest, nothing to prune");
            return Ok(report);
        };
        report.manifest_found = true;

        match (mode.removed_variant(), mode.kept_variant()) {
            (Some(removed), Some(kept)) => {
                let removed = manifest.mode(removed)?;
                let kept = manifest.mode(kept)?;
                self.prune_variant(root, &manifest, removed, kept, &mut report)?;

                if mode.rewrites_config() {
                    self.rewrite_config(root, &mut report)?;
                }
            }
            _ => self.strip_all_markers(root, &manifest, &mut report)?,
        }

        self.finalize(root, &manifest, &mut report)?;

        info!(
            removed = report.removed_paths.len(),
            rewritten = report.rewritten_files.len(),
            "Prune completed"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// `Ok(None)` when the manifest is missing or unreadable. Malformed
    /// JSON is an error.
    fn load_manifest(&self, root: &Path) -> PruneResult<Option<Manifest>> {
        let path = root.join(&self.layout.manifest_file);
        if !self.filesystem.exists(&path) {
            return Ok(None);
        }

        let raw = match self.filesystem.read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Manifest unreadable, skipping");
                return Ok(None);
            }
        };

        let manifest = Manifest::from_json(&raw, &path.display().to_string())?;
        debug!(version = %manifest.version, "Manifest loaded");
        Ok(Some(manifest))
    }

    fn prune_variant(
        &self,
        root: &Path,
        manifest: &Manifest,
        removed: &ModeConfig,
        kept: &ModeConfig,
        report: &mut PruneReport,
    ) -> PruneResult<()> {
        let files = self.load_sources(root)?;

        // Nothing is mutated until every file's markers check out.
        let markers = manifest.region_markers();
        for file in &files {
            regions::validate(relative(root, &file.path), &file.content, &markers)?;
        }

        self.prune_files(root, removed, report)?;
        self.edit_package(root, removed, report)?;

        let removed_marker = removed.region_marker.trim();
        let kept_marker = kept.region_marker.trim();
        for file in files {
            if !self.filesystem.exists(&file.path) {
                continue;
            }
            let mut output = regions::strip(&file.content, removed_marker, kept_marker);
            if file.clean_imports {
                output = imports::clean_orphan_imports(&output);
            }
            self.write_if_changed(root, &file.path, &file.content, &output, report)?;
        }

        Ok(())
    }

    fn strip_all_markers(
        &self,
        root: &Path,
        manifest: &Manifest,
        report: &mut PruneReport,
    ) -> PruneResult<()> {
        let markers = manifest.region_markers();
        for file in self.load_sources(root)? {
            let output = regions::strip_markers(&file.content, &markers);
            self.write_if_changed(root, &file.path, &file.content, &output, report)?;
        }
        Ok(())
    }

    /// Source roots first, then test roots. A file under both is loaded once
    /// as source.
    fn load_sources(&self, root: &Path) -> PruneResult<Vec<SourceFile>> {
        let mut seen = BTreeSet::new();
        let mut files = Vec::new();

        let trees = self
            .layout
            .source_roots
            .iter()
            .map(|dir| (dir, true))
            .chain(self.layout.test_roots.iter().map(|dir| (dir, false)));

        for (dir, clean_imports) in trees {
            for path in self.filesystem.list_files(&root.join(dir))? {
                if !self.layout.is_source_file(&path) || !seen.insert(path.clone()) {
                    continue;
                }
                let content = self.filesystem.read_to_string(&path)?;
                files.push(SourceFile {
                    path,
                    content,
                    clean_imports,
                });
            }
        }

        debug!(count = files.len(), "Source files loaded");
        Ok(files)
    }

    fn prune_files(
        &self,
        root: &Path,
        removed: &ModeConfig,
        report: &mut PruneReport,
    ) -> PruneResult<()> {
        let mut matches = BTreeSet::new();
        for pattern in &removed.file_patterns {
            let found = self.filesystem.glob(root, pattern)?;
            debug!(pattern = %pattern, matches = found.len(), "Pattern resolved");
            matches.extend(found);
        }

        // Sorted order puts a directory before anything inside it.
        for path in matches {
            if self.filesystem.remove(&path)? {
                report.removed_paths.push(relative(root, &path).to_path_buf());
            }
        }
        Ok(())
    }

    fn edit_package(
        &self,
        root: &Path,
        removed: &ModeConfig,
        report: &mut PruneReport,
    ) -> PruneResult<()> {
        let Some(mut package) = self.load_package(root)? else {
            debug!("No package descriptor, skipping package edits");
            return Ok(());
        };

        let changes = package.prune_mode(removed);
        if changes.is_empty() {
            return Ok(());
        }

        let path = root.join(&self.layout.package_file);
        self.filesystem.write_file(&path, &package.to_json_string())?;
        push_unique(&mut report.rewritten_files, relative(root, &path));
        report.removed_dependencies.extend(changes.removed_dependencies);
        report.removed_scripts.extend(changes.removed_scripts);
        report.edited_scripts.extend(changes.edited_scripts);
        Ok(())
    }

    fn load_package(&self, root: &Path) -> PruneResult<Option<PackageDescriptor>> {
        let path = root.join(&self.layout.package_file);
        if !self.filesystem.exists(&path) {
            return Ok(None);
        }
        let raw = self.filesystem.read_to_string(&path)?;
        Ok(Some(PackageDescriptor::from_json(
            &raw,
            &path.display().to_string(),
        )?))
    }

    /// Try each strategy in order; the first success wins.
    fn rewrite_config(&self, root: &Path, report: &mut PruneReport) -> PruneResult<()> {
        let path = root.join(&self.layout.config_module);
        if !self.filesystem.exists(&path) {
            debug!(path = %path.display(), "No config module, skipping rewrite");
            return Ok(());
        }
        if self.rewriters.is_empty() || self.edits.is_empty() {
            warn!("No config rewrite configured");
            return Ok(());
        }

        let source = self.filesystem.read_to_string(&path)?;
        let mut last_error = None;

        for rewriter in &self.rewriters {
            match rewriter.rewrite(&source, &self.edits) {
                Ok(output) => {
                    info!(strategy = rewriter.name(), "Config module rewritten");
                    report.config_strategy = Some(rewriter.name().to_string());
                    return self.write_if_changed(root, &path, &source, &output, report);
                }
                Err(e) => {
                    warn!(strategy = rewriter.name(), error = %e, "Rewrite strategy failed, falling back");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ApplicationError::RewriteFailed {
                strategy: "none",
                reason: "no strategy available".into(),
            }
            .into()
        }))
    }

    /// Remove the manifest, the control script and its script entry.
    fn finalize(
        &self,
        root: &Path,
        manifest: &Manifest,
        report: &mut PruneReport,
    ) -> PruneResult<()> {
        let control: &ControlScript = self
            .layout
            .control_script_for(manifest.control_script.as_ref());

        for file in [&self.layout.manifest_file, &control.path] {
            let path = root.join(file);
            if self.filesystem.remove(&path)? {
                report.removed_paths.push(relative(root, &path).to_path_buf());
            }
        }

        if let Some(mut package) = self.load_package(root)? {
            if package.remove_script(&control.script) {
                let path = root.join(&self.layout.package_file);
                self.filesystem.write_file(&path, &package.to_json_string())?;
                push_unique(&mut report.rewritten_files, relative(root, &path));
                report.removed_scripts.push(control.script.clone());
            }
        }

        Ok(())
    }

    fn write_if_changed(
        &self,
        root: &Path,
        path: &Path,
        before: &str,
        after: &str,
        report: &mut PruneReport,
    ) -> PruneResult<()> {
        if before == after {
            return Ok(());
        }
        self.filesystem.write_file(path, after)?;
        debug!(path = %path.display(), "Rewrote file");
        push_unique(&mut report.rewritten_files, relative(root, path));
        Ok(())
    }
}

fn relative<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn push_unique(paths: &mut Vec<PathBuf>, path: &Path) {
    if !paths.iter().any(|p| p == path) {
        paths.push(path.to_path_buf());
    }
}
