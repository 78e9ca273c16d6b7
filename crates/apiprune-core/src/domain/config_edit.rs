use serde::{Deserialize, Serialize};

/// Property edits applied to the environment configuration module when a
/// project drops its GraphQL server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigEdits {
    /// Variable the configuration object is bound to (`const config = ...`).
    pub binding: String,
    /// Properties whose object-literal value becomes `false`.
    pub flip_to_false: Vec<String>,
    /// Properties deleted whatever their value.
    pub delete: Vec<String>,
}

/// What to do with one property of an environment section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyEdit {
    FlipToFalse,
    Delete,
    Recurse,
}

impl Default for ConfigEdits {
    fn default() -> Self {
        Self {
            binding: "config".into(),
            flip_to_false: vec!["graphQl".into()],
            delete: vec!["execAfterInit".into()],
        }
    }
}

impl ConfigEdits {
    pub fn edit_for(&self, key: &str) -> PropertyEdit {
        if self.delete.iter().any(|k| k == key) {
            PropertyEdit::Delete
        } else if self.flip_to_false.iter().any(|k| k == key) {
            PropertyEdit::FlipToFalse
        } else {
            PropertyEdit::Recurse
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flip_to_false.is_empty() && self.delete.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_graphql_server_settings() {
        let edits = ConfigEdits::default();
        assert_eq!(edits.edit_for("graphQl"), PropertyEdit::FlipToFalse);
        assert_eq!(edits.edit_for("execAfterInit"), PropertyEdit::Delete);
        assert_eq!(edits.edit_for("local"), PropertyEdit::Recurse);
        assert!(!edits.is_empty());
    }
}
