//! The project package descriptor (`package.json`).
//!
//! Only three sections are ever touched: `dependencies`, `devDependencies`
//! and `scripts`. Everything else round-trips in its original key order.

use serde_json::{Map, Value};

use crate::domain::DomainError;
use crate::domain::entities::manifest::ModeConfig;

const DEPENDENCIES: &str = "dependencies";
const DEV_DEPENDENCIES: &str = "devDependencies";
const SCRIPTS: &str = "scripts";

/// A parsed `package.json` document.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    root: Map<String, Value>,
}

/// What a [`PackageDescriptor::prune_mode`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageChanges {
    pub removed_dependencies: Vec<String>,
    pub removed_scripts: Vec<String>,
    pub edited_scripts: Vec<String>,
}

impl PackageChanges {
    pub fn is_empty(&self) -> bool {
        self.removed_dependencies.is_empty()
            && self.removed_scripts.is_empty()
            && self.edited_scripts.is_empty()
    }
}

impl PackageDescriptor {
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| DomainError::InvalidPackageDescriptor {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DomainError::InvalidPackageDescriptor {
                path: origin.to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Serialize with 2-space indentation and a trailing newline.
    pub fn to_json_string(&self) -> String {
        // Serializing a map of JSON values cannot fail.
        let mut out = serde_json::to_string_pretty(&self.root).unwrap_or_default();
        out.push('\n');
        out
    }

    /// Remove everything `mode` owns. Missing keys are skipped.
    pub fn prune_mode(&mut self, mode: &ModeConfig) -> PackageChanges {
        let mut changes = PackageChanges::default();

        for name in &mode.packages {
            if self.remove_entry(DEPENDENCIES, name) {
                changes.removed_dependencies.push(name.clone());
            }
        }
        for name in &mode.dev_packages {
            if self.remove_entry(DEV_DEPENDENCIES, name) {
                changes.removed_dependencies.push(name.clone());
            }
        }
        for name in &mode.scripts {
            if self.remove_script(name) {
                changes.removed_scripts.push(name.clone());
            }
        }
        for (name, edit) in &mode.script_edits {
            if self.edit_script(name, &edit.remove) {
                changes.edited_scripts.push(name.clone());
            }
        }

        changes
    }

    /// Drop a `scripts` entry. Returns whether it existed.
    pub fn remove_script(&mut self, name: &str) -> bool {
        self.remove_entry(SCRIPTS, name)
    }

    /// Cut the first literal occurrence of `remove` out of a script value.
    ///
    /// The entry stays even if it becomes empty. Returns whether the value
    /// changed.
    pub fn edit_script(&mut self, name: &str, remove: &str) -> bool {
        if remove.is_empty() {
            return false;
        }
        let Some(Value::String(script)) = self
            .root
            .get_mut(SCRIPTS)
            .and_then(Value::as_object_mut)
            .and_then(|scripts| scripts.get_mut(name))
        else {
            return false;
        };

        if !script.contains(remove) {
            return false;
        }
        *script = script.replacen(remove, "", 1);
        true
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.section(SCRIPTS)?.get(name)?.as_str()
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.section(DEPENDENCIES)
            .is_some_and(|deps| deps.contains_key(name))
    }

    pub fn has_dev_dependency(&self, name: &str) -> bool {
        self.section(DEV_DEPENDENCIES)
            .is_some_and(|deps| deps.contains_key(name))
    }

    fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key)?.as_object()
    }

    fn remove_entry(&mut self, section: &str, name: &str) -> bool {
        self.root
            .get_mut(section)
            .and_then(Value::as_object_mut)
            .is_some_and(|entries| entries.shift_remove(name).is_some())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
