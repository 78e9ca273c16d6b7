//! Config module rewrite strategies.
//!
//! The prune service tries strategies in order and falls back on failure,
//! so the structural walker goes first and the regex pass last.

mod structural;
mod textual;

use apiprune_core::application::ports::ConfigRewriter;

pub use structural::StructuralRewriter;
pub use textual::TextualRewriter;

/// Structural first, textual as the fallback.
pub fn default_chain() -> Vec<Box<dyn ConfigRewriter>> {
    vec![
        Box::new(StructuralRewriter::new()),
        Box::new(TextualRewriter::new()),
    ]
}
