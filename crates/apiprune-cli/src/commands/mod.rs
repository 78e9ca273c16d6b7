//! Command handlers. Each translates parsed arguments into a core service
//! call and renders the result.

pub mod completions;
pub mod config;
pub mod inspect;
pub mod prune;
