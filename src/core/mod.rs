//! Core module - catalog index, query engine and session state

pub mod catalog;
pub mod config;
pub mod entity;
pub mod filter;
pub mod identity;
pub mod loader;
pub mod predicates;
pub mod selector;
pub mod session;

pub use catalog::{
    filter_alternatives, BrandFilter, CatalogData, CatalogError, CatalogIndex, CatalogStats,
    MatchStage, QueryResult, TierFilter,
};
pub use config::Config;
pub use entity::{Entity, Lifecycle};
pub use filter::{ComponentSubject, Facets, FilterEngine, FilterSpec, VariantSubject};
pub use identity::{PartKey, ValueParseError};
pub use loader::{load_catalog, load_catalog_data, LoadError};
pub use predicates::RangeQuery;
pub use selector::{CategorySelector, FilterDimension, Level, SelectionState, SelectorError};
pub use session::SessionState;
