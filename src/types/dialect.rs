//! Supported document dialects.

use serde::{Deserialize, Serialize};

/// One supported API description format and version.
///
/// Configuration documents carry one rule map per dialect (`oas3_0Rules`,
/// `oas2Rules`, ...), each overlaid on the dialect-agnostic `rules` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Oas2,
    Oas3_0,
    Oas3_1,
    Async2,
}

impl Dialect {
    /// All dialects, in configuration field order.
    pub const ALL: [Dialect; 4] = [
        Dialect::Oas2,
        Dialect::Oas3_0,
        Dialect::Oas3_1,
        Dialect::Async2,
    ];

    /// The major version family plugins register rules under.
    pub fn major(self) -> SpecMajor {
        match self {
            Dialect::Oas2 => SpecMajor::Oas2,
            Dialect::Oas3_0 | Dialect::Oas3_1 => SpecMajor::Oas3,
            Dialect::Async2 => SpecMajor::Async2,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Oas2 => write!(f, "oas2"),
            Dialect::Oas3_0 => write!(f, "oas3_0"),
            Dialect::Oas3_1 => write!(f, "oas3_1"),
            Dialect::Async2 => write!(f, "async2"),
        }
    }
}

/// Major version family used to key plugin rule buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecMajor {
    Oas2,
    Oas3,
    Async2,
}

impl std::fmt::Display for SpecMajor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecMajor::Oas2 => write!(f, "oas2"),
            SpecMajor::Oas3 => write!(f, "oas3"),
            SpecMajor::Async2 => write!(f, "async2"),
        }
    }
}
