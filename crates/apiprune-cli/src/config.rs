//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only receives the resolved
//! [`ProjectLayout`] and [`ConfigEdits`].
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables, `APIPRUNE__<SECTION>__<KEY>`
//!    (e.g. `APIPRUNE__LAYOUT__CONFIG_MODULE=src/env.ts`)
//! 2. Config file (`--config FILE`, else the platform config dir if present)
//! 3. Built-in defaults

use std::path::PathBuf;

use anyhow::Context as _;
use apiprune_core::domain::{ConfigEdits, ProjectLayout};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "APIPRUNE";

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &[
    "layout.source_roots",
    "layout.test_roots",
    "layout.extensions",
    "rewrite.flip_to_false",
    "rewrite.delete",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where things live inside a generated project.
    pub layout: ProjectLayout,
    /// Edits applied to the config module in REST mode.
    pub rewrite: ConfigEdits,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.
    /// Without it the default location is read only if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialise built-in defaults")?;

        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        let env = LIST_KEYS.iter().fold(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .try_parsing(true),
            |env, key| env.with_list_parse_key(key),
        );

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Configuration has an invalid shape")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.apiprune.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "apiprune", "apiprune")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".apiprune.toml"))
    }

    /// Look up a dotted key such as `layout.control_script.path`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let root = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(&root, |value, segment| value.get(segment))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_match_generated_projects() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.layout.manifest_file, "api-mode.manifest.json");
        assert_eq!(cfg.layout.config_module, "src/config.env.ts");
        assert_eq!(cfg.rewrite.binding, "config");
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apiprune.toml");
        fs::write(
            &path,
            "[layout]\nconfig_module = \"src/env.ts\"\nsource_roots = [\"src\", \"lib\"]\n\n[rewrite]\ndelete = [\"execAfterInit\", \"seed\"]\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.layout.config_module, "src/env.ts");
        assert_eq!(cfg.layout.source_roots, vec!["src", "lib"]);
        assert_eq!(cfg.layout.manifest_file, "api-mode.manifest.json");
        assert_eq!(cfg.rewrite.delete, vec!["execAfterInit", "seed"]);
        assert_eq!(cfg.rewrite.flip_to_false, vec!["graphQl"]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn dotted_lookup() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.get("layout.control_script.script").unwrap(),
            serde_json::json!("strip-markers")
        );
        assert!(cfg.get("layout.nope").is_none());
    }

    #[test]
    fn config_path_is_not_empty() {
        let path = AppConfig::config_path();
        assert!(path.extension().is_some_and(|ext| ext == "toml"));
    }
}
