//! Part-number resolution and catalog-wide search

use super::types::{MatchStage, QueryResult};
use super::CatalogIndex;
use crate::core::filter::{ComponentSubject, FilterEngine, FilterSpec, VariantSubject};
use crate::core::identity::{contains_ignore_case, PartKey};
use crate::entities::component::ComponentRecord;

/// Outcome of the staged lookup before filtering
struct Resolution {
    stage: MatchStage,
    component: usize,
    variants: Vec<usize>,
}

impl CatalogIndex {
    /// Resolve free text to a single component family
    ///
    /// Stages are tried in order and the first hit wins:
    /// 1. exact component id, returning all its variants
    /// 2. exact variant id, returning that variant only
    /// 3. substring of a component id, model or manufacturer (first in
    ///    snapshot order), returning all its variants
    /// 4. substring of a variant id (first in snapshot order), returning all
    ///    variants of its owner
    ///
    /// A non-empty filter then narrows the returned variants; the resolved
    /// component is kept even when no variant survives.
    pub fn resolve_query(&self, text: &str, filter: Option<&FilterSpec>) -> QueryResult<'_> {
        let Some(resolution) = self.resolve_stages(text) else {
            tracing::debug!("query '{}' matched nothing", text);
            return QueryResult::empty();
        };

        let component = &self.components[resolution.component];
        let subjects = resolution.variants.iter().map(|&vidx| VariantSubject {
            component,
            variant: &self.variants[vidx],
        });
        let variants: Vec<_> = match filter {
            Some(spec) if !spec.is_empty() => FilterEngine::apply(subjects, spec),
            _ => subjects.collect(),
        }
        .into_iter()
        .map(|s| s.variant)
        .collect();

        let total_alternatives = variants
            .iter()
            .map(|v| self.alternatives_for(&v.id).len())
            .sum();

        tracing::debug!(
            "query '{}' resolved to {} ({}), {} variants",
            text,
            component.id,
            resolution.stage,
            variants.len()
        );

        QueryResult {
            component: Some(component),
            variants,
            exact_match: resolution.stage.is_exact(),
            total_alternatives,
            stage: resolution.stage,
        }
    }

    fn resolve_stages(&self, text: &str) -> Option<Resolution> {
        let key = PartKey::new(text);
        if key.is_empty() {
            return None;
        }

        if let Some(&cidx) = self.component_by_id.get(&key) {
            return Some(Resolution {
                stage: MatchStage::ExactComponent,
                component: cidx,
                variants: self.variants_by_component[cidx].clone(),
            });
        }

        if let Some(&vidx) = self.variant_by_id.get(&key) {
            return Some(Resolution {
                stage: MatchStage::ExactVariant,
                component: self.variant_owner[vidx],
                variants: vec![vidx],
            });
        }

        if let Some(cidx) = self.component_keys.iter().position(|k| {
            k.id.contains(&key) || k.model.contains(&key) || k.manufacturer.contains(&key)
        }) {
            return Some(Resolution {
                stage: MatchStage::FuzzyComponent,
                component: cidx,
                variants: self.variants_by_component[cidx].clone(),
            });
        }

        self.variant_keys
            .iter()
            .position(|k| k.contains(&key))
            .map(|vidx| {
                let cidx = self.variant_owner[vidx];
                Resolution {
                    stage: MatchStage::FuzzyVariant,
                    component: cidx,
                    variants: self.variants_by_component[cidx].clone(),
                }
            })
    }

    /// Search the whole catalog, returning components in snapshot order
    ///
    /// Blank text matches every component. Text equal to a variant id
    /// narrows the candidates to that variant's owner; otherwise a component
    /// matches when the text occurs in its model, description, manufacturer,
    /// tags, or any of its variant ids.
    pub fn search_components(
        &self,
        text: &str,
        filter: Option<&FilterSpec>,
    ) -> Vec<&ComponentRecord> {
        let key = PartKey::new(text);
        let needle = text.trim();

        let candidates: Vec<usize> = if key.is_empty() {
            (0..self.components.len()).collect()
        } else if let Some(&vidx) = self.variant_by_id.get(&key) {
            vec![self.variant_owner[vidx]]
        } else {
            (0..self.components.len())
                .filter(|&cidx| self.text_matches(cidx, &key, needle))
                .collect()
        };

        let subjects = candidates.into_iter().map(|cidx| self.subject_at(cidx));
        let matched: Vec<ComponentSubject<'_>> = match filter {
            Some(spec) => FilterEngine::apply(subjects, spec),
            None => subjects.collect(),
        };

        tracing::debug!("search '{}' matched {} components", text, matched.len());
        matched.into_iter().map(|s| s.component).collect()
    }

    fn text_matches(&self, cidx: usize, key: &PartKey, needle: &str) -> bool {
        let keys = &self.component_keys[cidx];
        let component = &self.components[cidx];
        keys.model.contains(key)
            || keys.manufacturer.contains(key)
            || contains_ignore_case(&component.description, needle)
            || component
                .tags
                .iter()
                .any(|t| contains_ignore_case(t, needle))
            || self.variants_by_component[cidx]
                .iter()
                .any(|&vidx| self.variant_keys[vidx].contains(key))
    }
}
