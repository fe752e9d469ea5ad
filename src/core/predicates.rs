//! Predicate primitives used by the filter engine
//!
//! Every function here is pure: a candidate value (possibly absent) and a
//! constraint go in, a boolean comes out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entities::category::split_path;
use crate::entities::component::{CapabilityFlags, Flag};

/// Markers the browsing layer appends to a category to mean "everything below"
const ALL_MARKERS: &[&str] = &["(全部)", "(all)"];

/// A closed numeric interval from a query; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl RangeQuery {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Both bounds set
    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// A query with neither bound constrains nothing
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// min > max can never be satisfied
    pub fn is_malformed(&self) -> bool {
        matches!((self.min, self.max), (Some(lo), Some(hi)) if lo > hi)
    }
}

/// Interval overlap between a candidate's [attr_min, attr_max] and a query
///
/// A query upper bound needs the candidate's lower bound and a query lower
/// bound needs the candidate's upper bound. A missing required bound fails:
/// absent data never satisfies a range constraint. Touching endpoints count
/// as overlap.
pub fn range_overlaps(attr_min: Option<f64>, attr_max: Option<f64>, query: &RangeQuery) -> bool {
    if query.is_malformed() {
        return false;
    }
    if let Some(q_max) = query.max {
        match attr_min {
            Some(lo) if lo <= q_max => {}
            _ => return false,
        }
    }
    if let Some(q_min) = query.min {
        match attr_max {
            Some(hi) if hi >= q_min => {}
            _ => return false,
        }
    }
    true
}

/// Case-sensitive exact membership; an absent value is never a member
pub fn in_set(value: Option<&str>, allowed: &BTreeSet<String>) -> bool {
    value.is_some_and(|v| allowed.contains(v))
}

/// True if any of `values` is a member of `allowed`
pub fn any_in_set<'a, I>(values: I, allowed: &BTreeSet<String>) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().any(|v| allowed.contains(v))
}

/// Remove a trailing "(全部)" / "(all)" marker and any separator before it
pub fn strip_all_marker(constraint: &str) -> &str {
    let mut trimmed = constraint.trim();
    for marker in ALL_MARKERS {
        if let Some(rest) = trimmed.strip_suffix(marker) {
            trimmed = rest.trim_end();
            break;
        }
    }
    trimmed.trim_end_matches('/').trim_end()
}

/// Category-prefix match over whole path segments
///
/// Both sides are split into trimmed segments, so "Power / LDO" sits under
/// "Power" but "PowerMgmt/PMIC" does not. An empty constraint (after marker
/// stripping) matches every path.
pub fn category_matches(path: &str, constraint: &str) -> bool {
    let prefix = split_path(strip_all_marker(constraint));
    let segments = split_path(path);
    segments.len() >= prefix.len() && segments.iter().zip(&prefix).all(|(a, b)| a == b)
}

/// Flag requirement: the flag is set, or the tag set carries its alias
pub fn flag_satisfied(flag: Flag, flags: &CapabilityFlags, tags: &[String]) -> bool {
    flag.is_set(flags) || tags.iter().any(|t| t.eq_ignore_ascii_case(flag.tag_alias()))
}
