//! Domain value objects: ApiMode, Variant.
//!
//! # Design
//!
//! These are pure `Copy` value types with no identity.
//! `ApiMode` is what the user selects; `Variant` names one of the two
//! competing API surfaces a manifest describes. Only `Rest` and `GraphQl`
//! modes remove a variant; `Both` keeps everything.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ApiMode ──────────────────────────────────────────────────────────────────

/// The API surface a generated project should end up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiMode {
    Rest,
    #[serde(rename = "GraphQL")]
    GraphQl,
    Both,
}

impl ApiMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "Rest",
            Self::GraphQl => "GraphQL",
            Self::Both => "Both",
        }
    }

    /// The variant whose code is deleted, or `None` for [`ApiMode::Both`].
    pub const fn removed_variant(self) -> Option<Variant> {
        match self {
            Self::Rest => Some(Variant::GraphQl),
            Self::GraphQl => Some(Variant::Rest),
            Self::Both => None,
        }
    }

    /// The variant whose code survives (markers stripped, content kept).
    pub const fn kept_variant(self) -> Option<Variant> {
        match self {
            Self::Rest => Some(Variant::Rest),
            Self::GraphQl => Some(Variant::GraphQl),
            Self::Both => None,
        }
    }

    /// Only REST-only projects run without a GraphQL server, so only they
    /// get the configuration module rewritten.
    pub const fn rewrites_config(self) -> bool {
        matches!(self, Self::Rest)
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "graphql" | "gql" => Ok(Self::GraphQl),
            "both" => Ok(Self::Both),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

// ── Variant ──────────────────────────────────────────────────────────────────

/// One of the two mutually-exclusive API surfaces, keyed as in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[serde(rename = "graphql")]
    GraphQl,
    Rest,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::GraphQl, Variant::Rest];

    /// The key this variant is stored under in `modes`.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::GraphQl => "graphql",
            Self::Rest => "rest",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
