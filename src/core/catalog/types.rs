//! Catalog type definitions
//!
//! Snapshot documents, statistics and query result envelopes.

use serde::{Deserialize, Serialize};

use crate::entities::alternative::AlternativeCandidate;
use crate::entities::component::ComponentRecord;
use crate::entities::silkscreen::SilkscreenMapping;
use crate::entities::variant::OrderVariant;

// =========================================================================
// Snapshot Data
// =========================================================================

/// Raw catalog records as read from a snapshot document
///
/// Every section is optional so a snapshot may be split across files
/// (e.g., one file per manufacturer, or alternatives kept separately).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentRecord>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<OrderVariant>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<AlternativeCandidate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub silkscreen: Vec<SilkscreenMapping>,
}

impl CatalogData {
    /// Append every section of `other`, keeping order
    pub fn extend(&mut self, other: CatalogData) {
        self.components.extend(other.components);
        self.variants.extend(other.variants);
        self.alternatives.extend(other.alternatives);
        self.silkscreen.extend(other.silkscreen);
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.variants.is_empty()
            && self.alternatives.is_empty()
            && self.silkscreen.is_empty()
    }
}

/// Record counts for a built index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub components: usize,
    pub variants: usize,
    pub alternatives: usize,
    pub silkscreen: usize,
    pub categories: usize,
}

// =========================================================================
// Query Results
// =========================================================================

/// Which resolution stage produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    /// Query equals a component id
    ExactComponent,
    /// Query equals an order variant id
    ExactVariant,
    /// Query is a substring of a component's id, model or manufacturer
    FuzzyComponent,
    /// Query is a substring of an order variant id
    FuzzyVariant,
    /// Nothing matched
    NoMatch,
}

impl MatchStage {
    pub fn is_exact(&self) -> bool {
        matches!(self, MatchStage::ExactComponent | MatchStage::ExactVariant)
    }
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStage::ExactComponent => write!(f, "exact component"),
            MatchStage::ExactVariant => write!(f, "exact variant"),
            MatchStage::FuzzyComponent => write!(f, "fuzzy component"),
            MatchStage::FuzzyVariant => write!(f, "fuzzy variant"),
            MatchStage::NoMatch => write!(f, "no match"),
        }
    }
}

/// Result envelope of single-family resolution
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a> {
    /// Resolved component, `None` when nothing matched
    pub component: Option<&'a ComponentRecord>,

    /// Variants returned for the component (after filtering)
    pub variants: Vec<&'a OrderVariant>,

    /// True for exact component or exact variant matches
    pub exact_match: bool,

    /// Alternative candidates available across `variants`
    pub total_alternatives: usize,

    /// Stage that produced this result
    pub stage: MatchStage,
}

impl QueryResult<'_> {
    /// The empty envelope returned when no stage matches
    pub fn empty() -> Self {
        Self {
            component: None,
            variants: Vec::new(),
            exact_match: false,
            total_alternatives: 0,
            stage: MatchStage::NoMatch,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.component.is_none()
    }
}
