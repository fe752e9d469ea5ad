//! In-memory catalog index
//!
//! The index is built once from a [`CatalogData`] snapshot and never mutated
//! afterwards. All lookups are case-insensitive; iteration over components
//! and variants follows snapshot (insertion) order so that "first match"
//! results are reproducible.
//!
//! ## Module Structure
//!
//! - `types` - Snapshot documents, stats and result envelopes
//! - `queries` - Part-number resolution and catalog-wide search
//! - `alternatives` - Alternative-part listing, filtering and grouping
//! - `silkscreen` - Marking reverse lookup

mod alternatives;
mod queries;
mod silkscreen;
mod types;

pub use alternatives::{
    filter_alternatives, group_by_brand, group_by_tier, sort_candidates, tier_counts,
    BrandFilter, TierFilter,
};
pub use types::{CatalogData, CatalogStats, MatchStage, QueryResult};

use miette::Diagnostic;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::filter::{ComponentSubject, Facets};
use crate::core::identity::PartKey;
use crate::core::predicates::category_matches;
use crate::entities::alternative::AlternativeCandidate;
use crate::entities::category::{self, CategoryNode};
use crate::entities::component::ComponentRecord;
use crate::entities::silkscreen::SilkscreenMapping;
use crate::entities::variant::OrderVariant;

/// Errors raised while building an index from a snapshot
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("duplicate {kind} id '{id}'")]
    #[diagnostic(
        code(chipdex::catalog::duplicate_id),
        help("ids are compared case-insensitively; rename or remove one of the records")
    )]
    DuplicateId { kind: &'static str, id: String },

    #[error("variant '{variant}' references unknown component '{component}'")]
    #[diagnostic(
        code(chipdex::catalog::unknown_owner),
        help("a variant's `component` must equal the id or model of a component in the snapshot")
    )]
    UnknownOwner { variant: String, component: String },
}

/// Normalized search keys for one component
#[derive(Debug)]
struct ComponentKeys {
    id: PartKey,
    model: PartKey,
    manufacturer: PartKey,
}

/// Immutable catalog index
#[derive(Debug, Default)]
pub struct CatalogIndex {
    components: Vec<ComponentRecord>,
    variants: Vec<OrderVariant>,
    alternatives: Vec<AlternativeCandidate>,
    silkscreen: Vec<SilkscreenMapping>,

    component_keys: Vec<ComponentKeys>,
    variant_keys: Vec<PartKey>,
    component_by_id: HashMap<PartKey, usize>,
    components_by_model: HashMap<PartKey, Vec<usize>>,
    variant_by_id: HashMap<PartKey, usize>,
    variant_owner: Vec<usize>,
    variants_by_component: Vec<Vec<usize>>,
    alternatives_by_source: HashMap<PartKey, Vec<usize>>,
    silkscreen_by_marking: HashMap<PartKey, Vec<usize>>,
}

/// Map each record's key to its position, rejecting duplicates
fn index_unique<T: Entity>(items: &[T]) -> Result<HashMap<PartKey, usize>, CatalogError> {
    let mut map = HashMap::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if map.insert(item.part_key(), idx).is_some() {
            return Err(CatalogError::DuplicateId {
                kind: T::KIND,
                id: item.key().to_string(),
            });
        }
    }
    Ok(map)
}

impl CatalogIndex {
    /// Build an index from a snapshot
    pub fn build(data: CatalogData) -> Result<Self, CatalogError> {
        let CatalogData {
            components,
            variants,
            alternatives,
            silkscreen,
        } = data;

        let component_by_id = index_unique(&components)?;
        let variant_by_id = index_unique(&variants)?;

        let component_keys: Vec<ComponentKeys> = components
            .iter()
            .map(|c| ComponentKeys {
                id: PartKey::new(&c.id),
                model: PartKey::new(&c.model),
                manufacturer: PartKey::new(&c.manufacturer),
            })
            .collect();

        let mut components_by_model: HashMap<PartKey, Vec<usize>> = HashMap::new();
        for (idx, keys) in component_keys.iter().enumerate() {
            components_by_model
                .entry(keys.model.clone())
                .or_default()
                .push(idx);
        }

        // Owner: a component whose id equals the reference, else the first
        // component (snapshot order) whose model does.
        let mut variant_owner = Vec::with_capacity(variants.len());
        let mut variants_by_component = vec![Vec::new(); components.len()];
        for (vidx, variant) in variants.iter().enumerate() {
            let reference = PartKey::new(&variant.component);
            let owner = component_by_id.get(&reference).copied().or_else(|| {
                components_by_model
                    .get(&reference)
                    .and_then(|list| list.first().copied())
            });
            match owner {
                Some(cidx) => {
                    variant_owner.push(cidx);
                    variants_by_component[cidx].push(vidx);
                }
                None => {
                    return Err(CatalogError::UnknownOwner {
                        variant: variant.id.clone(),
                        component: variant.component.clone(),
                    })
                }
            }
        }

        let variant_keys: Vec<PartKey> = variants.iter().map(Entity::part_key).collect();

        let mut alternatives_by_source: HashMap<PartKey, Vec<usize>> = HashMap::new();
        for (idx, alt) in alternatives.iter().enumerate() {
            let source = PartKey::new(&alt.source);
            if !variant_by_id.contains_key(&source) {
                tracing::debug!(
                    "alternative {} refers to variant {} which is not in the snapshot",
                    alt.id,
                    alt.source
                );
            }
            alternatives_by_source.entry(source).or_default().push(idx);
        }

        let mut silkscreen_by_marking: HashMap<PartKey, Vec<usize>> = HashMap::new();
        for (idx, mapping) in silkscreen.iter().enumerate() {
            silkscreen_by_marking
                .entry(PartKey::new(&mapping.marking))
                .or_default()
                .push(idx);
            if !variant_by_id.contains_key(&PartKey::new(&mapping.target)) {
                tracing::debug!(
                    "marking {} targets variant {} which is not in the snapshot",
                    mapping.marking,
                    mapping.target
                );
            }
        }

        let index = Self {
            components,
            variants,
            alternatives,
            silkscreen,
            component_keys,
            variant_keys,
            component_by_id,
            components_by_model,
            variant_by_id,
            variant_owner,
            variants_by_component,
            alternatives_by_source,
            silkscreen_by_marking,
        };

        let stats = index.stats();
        tracing::info!(
            "Indexed {} components, {} variants, {} alternatives, {} markings",
            stats.components,
            stats.variants,
            stats.alternatives,
            stats.silkscreen
        );

        Ok(index)
    }

    // =====================================================================
    // Components
    // =====================================================================

    /// Component by id (case-insensitive)
    pub fn by_id(&self, id: &str) -> Option<&ComponentRecord> {
        self.component_by_id
            .get(&PartKey::new(id))
            .map(|&idx| &self.components[idx])
    }

    /// All components whose model equals `model` (case-insensitive)
    pub fn by_model_exact(&self, model: &str) -> Vec<&ComponentRecord> {
        self.components_by_model
            .get(&PartKey::new(model))
            .map(|list| list.iter().map(|&idx| &self.components[idx]).collect())
            .unwrap_or_default()
    }

    /// All components in snapshot order
    pub fn components(&self) -> &[ComponentRecord] {
        &self.components
    }

    fn component_index(&self, component: &ComponentRecord) -> Option<usize> {
        self.component_by_id.get(&component.part_key()).copied()
    }

    // =====================================================================
    // Variants
    // =====================================================================

    /// Order variant by id (case-insensitive)
    pub fn variant(&self, id: &str) -> Option<&OrderVariant> {
        self.variant_by_id
            .get(&PartKey::new(id))
            .map(|&idx| &self.variants[idx])
    }

    /// All order variants in snapshot order
    pub fn variants(&self) -> &[OrderVariant] {
        &self.variants
    }

    /// Variants owned by `component`, in snapshot order
    pub fn variants_of(&self, component: &ComponentRecord) -> Vec<&OrderVariant> {
        self.component_index(component)
            .map(|idx| self.variants_at(idx))
            .unwrap_or_default()
    }

    /// Owning component of `variant`
    pub fn owner_of(&self, variant: &OrderVariant) -> Option<&ComponentRecord> {
        self.variant_by_id
            .get(&variant.part_key())
            .map(|&vidx| &self.components[self.variant_owner[vidx]])
    }

    fn variants_at(&self, component_idx: usize) -> Vec<&OrderVariant> {
        self.variants_by_component[component_idx]
            .iter()
            .map(|&vidx| &self.variants[vidx])
            .collect()
    }

    /// A component together with its variants, ready for filtering
    pub fn subject<'a>(&'a self, component: &'a ComponentRecord) -> ComponentSubject<'a> {
        ComponentSubject {
            component,
            variants: self.variants_of(component),
        }
    }

    fn subject_at(&self, component_idx: usize) -> ComponentSubject<'_> {
        ComponentSubject {
            component: &self.components[component_idx],
            variants: self.variants_at(component_idx),
        }
    }

    // =====================================================================
    // Alternatives & Markings
    // =====================================================================

    /// Alternative candidates keyed by source variant id, in snapshot order
    pub fn alternatives_for(&self, source_id: &str) -> Vec<&AlternativeCandidate> {
        self.alternatives_by_source
            .get(&PartKey::new(source_id))
            .map(|list| list.iter().map(|&idx| &self.alternatives[idx]).collect())
            .unwrap_or_default()
    }

    /// All alternative candidates in snapshot order
    pub fn alternatives(&self) -> &[AlternativeCandidate] {
        &self.alternatives
    }

    /// All silkscreen mappings in snapshot order
    pub fn silkscreen(&self) -> &[SilkscreenMapping] {
        &self.silkscreen
    }

    /// Mappings whose primary marking equals `marking` (case-insensitive)
    pub fn silkscreen_by_marking(&self, marking: &str) -> Vec<&SilkscreenMapping> {
        self.silkscreen_by_marking
            .get(&PartKey::new(marking))
            .map(|idxs| idxs.iter().map(|&i| &self.silkscreen[i]).collect())
            .unwrap_or_default()
    }

    // =====================================================================
    // Categories & Stats
    // =====================================================================

    /// Category forest derived from component paths
    pub fn category_tree(&self) -> Vec<CategoryNode> {
        category::build_tree(self.components.iter().map(|c| c.category.as_str()))
    }

    /// Number of components under a category prefix
    pub fn count_in_category(&self, prefix: &str) -> usize {
        self.components
            .iter()
            .filter(|c| category_matches(&c.category, prefix))
            .count()
    }

    /// Facet counts over a set of components
    pub fn facets(&self, components: &[&ComponentRecord]) -> Facets {
        let subjects: Vec<ComponentSubject<'_>> =
            components.iter().map(|c| self.subject(c)).collect();
        Facets::collect(&subjects)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            components: self.components.len(),
            variants: self.variants.len(),
            alternatives: self.alternatives.len(),
            silkscreen: self.silkscreen.len(),
            categories: self
                .category_tree()
                .iter()
                .map(CategoryNode::size)
                .sum(),
        }
    }
}
