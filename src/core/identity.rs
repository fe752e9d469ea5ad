//! Part identity - case-insensitive keys for part numbers, models and markings

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A normalized lookup key for a part number, model or marking
///
/// Catalog lookups never depend on the letter case the caller typed, so every
/// key is trimmed and upper-cased once when it is built. Substring checks go
/// through [`PartKey::contains`] so both sides share the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartKey(String);

impl PartKey {
    /// Build a key from any part-number-like text
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// The normalized text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the normalized text is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `raw` (normalized) is equal to this key
    pub fn matches(&self, raw: &str) -> bool {
        self.0 == PartKey::new(raw).0
    }

    /// True if `needle` occurs inside this key
    ///
    /// An empty needle never matches; callers that want "match everything"
    /// for blank input handle that case themselves.
    pub fn contains(&self, needle: &PartKey) -> bool {
        !needle.is_empty() && self.0.contains(&needle.0)
    }
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartKey {
    fn from(raw: &str) -> Self {
        PartKey::new(raw)
    }
}

/// Case-insensitive substring test for free text (descriptions, tags)
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Errors raised when a classification name is parsed at the boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("unknown compatibility tier '{0}' (valid: BOM2BOM, P2P, FUNCTIONAL, PACKAGE)")]
    UnknownTier(String),

    #[error("unknown brand category '{0}' (valid: SAME_BRAND, DOMESTIC, FOREIGN)")]
    UnknownBrandCategory(String),

    #[error("unknown lifecycle status '{0}' (valid: ACTIVE, EOL, NRND, PRELIMINARY, OBSOLETE)")]
    UnknownLifecycle(String),

    #[error("compatibility score {0} is outside 0..=100")]
    ScoreOutOfRange(i64),

    #[error("unknown filter dimension '{0}' (valid: brand, package, parameter)")]
    UnknownDimension(String),

    #[error("unknown capability flag '{0}' (valid: automotive, rohs, low-power, internal-oscillator)")]
    UnknownFlag(String),
}
