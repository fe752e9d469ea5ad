//! Entity trait - common interface for all catalog record types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{PartKey, ValueParseError};

/// Common trait for all catalog records that carry a unique key
pub trait Entity: Serialize + DeserializeOwned {
    /// Human-readable record kind (e.g., "component", "variant")
    const KIND: &'static str;

    /// The record's identifying text as stored in the catalog
    fn key(&self) -> &str;

    /// The record's normalized lookup key
    fn part_key(&self) -> PartKey {
        PartKey::new(self.key())
    }
}

/// Lifecycle status shared by components, variants and alternatives
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lifecycle {
    #[default]
    Active,
    Eol,
    Nrnd,
    Preliminary,
    Obsolete,
}

impl Lifecycle {
    pub fn all() -> &'static [Lifecycle] {
        &[
            Lifecycle::Active,
            Lifecycle::Eol,
            Lifecycle::Nrnd,
            Lifecycle::Preliminary,
            Lifecycle::Obsolete,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Active => "ACTIVE",
            Lifecycle::Eol => "EOL",
            Lifecycle::Nrnd => "NRND",
            Lifecycle::Preliminary => "PRELIMINARY",
            Lifecycle::Obsolete => "OBSOLETE",
        }
    }

    /// True for parts that should not be designed in
    pub fn is_discontinued(&self) -> bool {
        matches!(self, Lifecycle::Eol | Lifecycle::Obsolete)
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Lifecycle {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(Lifecycle::Active),
            "EOL" => Ok(Lifecycle::Eol),
            "NRND" => Ok(Lifecycle::Nrnd),
            "PRELIMINARY" => Ok(Lifecycle::Preliminary),
            "OBSOLETE" => Ok(Lifecycle::Obsolete),
            _ => Err(ValueParseError::UnknownLifecycle(s.to_string())),
        }
    }
}
