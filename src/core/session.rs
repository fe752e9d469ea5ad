//! Per-session browsing state
//!
//! Everything a browsing session changes lives here and is owned by the
//! caller; the catalog itself stays read-only.

use crate::core::catalog::{CatalogIndex, QueryResult};
use crate::core::filter::FilterSpec;
use crate::core::selector::CategorySelector;
use crate::entities::component::ComponentRecord;

/// Search text, explicit filters and drill-down selection for one session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub query: String,
    pub filters: FilterSpec,
    pub selector: CategorySelector,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose selector validates against the catalog's categories
    pub fn for_catalog(index: &CatalogIndex) -> Self {
        Self {
            selector: CategorySelector::with_tree(index.category_tree()),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.filters = filters;
        self
    }

    /// Explicit filters merged with the selector's output
    ///
    /// An explicit category takes precedence over the selected path; value
    /// sets from both sides are unioned.
    pub fn effective_filter(&self) -> FilterSpec {
        self.filters.merge(&self.selector.to_filter_spec())
    }

    /// Catalog-wide search with the current query and filters
    pub fn search<'a>(&self, index: &'a CatalogIndex) -> Vec<&'a ComponentRecord> {
        index.search_components(&self.query, Some(&self.effective_filter()))
    }

    /// Single-family resolution with the current query and filters
    pub fn resolve<'a>(&self, index: &'a CatalogIndex) -> QueryResult<'a> {
        index.resolve_query(&self.query, Some(&self.effective_filter()))
    }

    /// Clear query, filters and selection
    pub fn clear(&mut self) {
        self.query.clear();
        self.filters = FilterSpec::default();
        self.selector.reset();
    }
}
