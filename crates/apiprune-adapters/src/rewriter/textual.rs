//! Line-oriented regex rewriter, the fallback when the module cannot be
//! walked structurally.
//!
//! It only understands the common layouts: a flipped property whose object
//! nests at most one level deep, and a deleted property whose value fits on
//! its own line.

use apiprune_core::{
    application::{ApplicationError, ports::ConfigRewriter},
    domain::ConfigEdits,
    error::PruneResult,
};
use regex::Regex;
use tracing::{debug, instrument};

const STRATEGY: &str = "textual";

#[derive(Debug, Clone, Copy, Default)]
pub struct TextualRewriter;

impl TextualRewriter {
    pub fn new() -> Self {
        Self
    }
}

fn compile(pattern: &str) -> PruneResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        ApplicationError::RewriteFailed {
            strategy: STRATEGY,
            reason: e.to_string(),
        }
        .into()
    })
}

impl ConfigRewriter for TextualRewriter {
    fn name(&self) -> &'static str {
        STRATEGY
    }

    #[instrument(skip_all)]
    fn rewrite(&self, source: &str, edits: &ConfigEdits) -> PruneResult<String> {
        let mut out = source.to_string();

        for key in &edits.flip_to_false {
            let object = compile(&format!(
                r"\b{}[ \t]*:\s*\{{(?:[^{{}}]|\{{[^{{}}]*\}})*\}}(?:[ \t]*,)?",
                regex::escape(key)
            ))?;
            let replacement = format!("{key}: false,");
            let count = object.find_iter(&out).count();
            out = object
                .replace_all(&out, regex::NoExpand(&replacement))
                .into_owned();
            debug!(key, count, "Flipped objects to false");
        }

        for key in &edits.delete {
            let line = compile(&format!(
                r"(?m)^[ \t]*{}[ \t]*:.*,[ \t]*(?://.*)?\r?\n",
                regex::escape(key)
            ))?;
            let count = line.find_iter(&out).count();
            out = line.replace_all(&out, "").into_owned();
            debug!(key, count, "Deleted property lines");
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_nested_objects_and_drops_lines() {
        let src = "\
import { merge } from 'lodash';

const config = merge(base, {
  local: {
    graphQl: {
      playground: true,
      cors: { origin: '*' },
    },
    execAfterInit: seedDatabase,
    port: 3000,
  },
});

export default config;
";
        let out = TextualRewriter::new()
            .rewrite(src, &ConfigEdits::default())
            .unwrap();
        assert_eq!(
            out,
            "\
import { merge } from 'lodash';

const config = merge(base, {
  local: {
    graphQl: false,
    port: 3000,
  },
});

export default config;
"
        );
    }

    #[test]
    fn last_property_gains_a_comma() {
        let src = "const config = { graphQl: { a: 1 } };\n";
        let out = TextualRewriter::new()
            .rewrite(src, &ConfigEdits::default())
            .unwrap();
        assert_eq!(out, "const config = { graphQl: false, };\n");
    }

    #[test]
    fn untouched_without_targets() {
        let src = "const config = { port: 1 };\n";
        let out = TextualRewriter::new()
            .rewrite(src, &ConfigEdits::default())
            .unwrap();
        assert_eq!(out, src);
    }
}
