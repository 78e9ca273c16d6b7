//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use apiprune_core::domain::ApiMode;
use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "apiprune",
    bin_name = "apiprune",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2702} Prune REST or GraphQL out of a generated project",
    long_about = "apiprune finalizes a freshly generated project that ships both a REST \
                  and a GraphQL API surface, deleting the variant you did not pick.",
    after_help = "EXAMPLES:\n\
        \x20 apiprune prune ./my-server --mode rest\n\
        \x20 apiprune prune --mode both\n\
        \x20 apiprune inspect ./my-server\n\
        \x20 apiprune completions bash > /usr/share/bash-completion/completions/apiprune",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Remove the unselected API variant from a project.
    #[command(
        visible_alias = "p",
        about = "Prune a project down to one API mode",
        after_help = "EXAMPLES:\n\
            \x20 apiprune prune ./my-server --mode rest\n\
            \x20 apiprune prune ./my-server --mode graphql\n\
            \x20 apiprune prune --mode both --output-format json"
    )]
    Prune(PruneArgs),

    /// Show what a project's manifest would remove.
    #[command(
        about = "Inspect a project's variant manifest",
        after_help = "EXAMPLES:\n\
            \x20 apiprune inspect\n\
            \x20 apiprune inspect ./my-server --output-format json"
    )]
    Inspect(InspectArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 apiprune completions bash > ~/.local/share/bash-completion/completions/apiprune\n\
            \x20 apiprune completions zsh  > ~/.zfunc/_apiprune\n\
            \x20 apiprune completions fish > ~/.config/fish/completions/apiprune.fish"
    )]
    Completions(CompletionsArgs),

    /// Show the apiprune configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 apiprune config get layout.config_module\n\
            \x20 apiprune config list\n\
            \x20 apiprune config path"
    )]
    Config(ConfigCommands),
}

// ── prune ─────────────────────────────────────────────────────────────────────

/// Arguments for `apiprune prune`.
#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Project root containing the variant manifest.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    /// API mode to keep. Prompted for when omitted on a terminal.
    #[arg(
        short = 'm',
        long = "mode",
        value_name = "MODE",
        value_enum,
        help = "API mode to keep"
    )]
    pub mode: Option<Mode>,
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `apiprune inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Project root containing the variant manifest.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `apiprune completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `apiprune config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `layout.manifest_file`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// API modes accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Mode {
    /// Keep REST, remove GraphQL.
    Rest,
    /// Keep GraphQL, remove REST. Also accepted as `gql`.
    #[value(alias = "gql")]
    Graphql,
    /// Keep both, strip markers only.
    Both,
}

impl From<Mode> for ApiMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rest => ApiMode::Rest,
            Mode::Graphql => ApiMode::GraphQl,
            Mode::Both => ApiMode::Both,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ApiMode::from(*self).fmt(f)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
