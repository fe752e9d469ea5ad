//! Silkscreen marking reverse lookup

use super::CatalogIndex;
use crate::core::identity::PartKey;
use crate::entities::silkscreen::SilkscreenMapping;

impl CatalogIndex {
    /// Resolve a package marking to candidate mappings
    ///
    /// A mapping matches when the marking equals or contains the input, when
    /// one of its alternate markings does, or when its target variant id
    /// contains the input. Each mapping is returned at most once; an exact
    /// marking match ranks first, then shorter markings.
    pub fn resolve_silkscreen(&self, marking: &str) -> Vec<&SilkscreenMapping> {
        let key = PartKey::new(marking);
        if key.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(bool, usize, &SilkscreenMapping)> = self
            .silkscreen
            .iter()
            .filter_map(|mapping| {
                let primary = PartKey::new(&mapping.marking);
                let exact = primary == key;
                let matched = exact
                    || primary.contains(&key)
                    || mapping
                        .alternate_markings
                        .iter()
                        .any(|alt| PartKey::new(alt).contains(&key))
                    || PartKey::new(&mapping.target).contains(&key);
                matched.then(|| (exact, mapping.marking.chars().count(), mapping))
            })
            .collect();

        hits.sort_by_key(|(exact, len, _)| (!exact, *len));
        tracing::debug!("marking '{}' matched {} mappings", marking, hits.len());
        hits.into_iter().map(|(_, _, mapping)| mapping).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::sample_index;

    fn markings(index: &super::CatalogIndex, input: &str) -> Vec<String> {
        index
            .resolve_silkscreen(input)
            .iter()
            .map(|m| m.marking.clone())
            .collect()
    }

    #[test]
    fn test_exact_marking_ranks_first() {
        let index = sample_index();
        assert_eq!(markings(&index, "3201"), vec!["3201", "33201"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let index = sample_index();
        assert_eq!(markings(&index, "st411"), vec!["ST411"]);
    }

    #[test]
    fn test_alternate_marking_and_target_match() {
        let index = sample_index();
        assert_eq!(markings(&index, "L17"), vec!["33201"]);
        // Matches the target variant id, not the marking
        assert_eq!(markings(&index, "CEU6"), vec!["ST411"]);
    }

    #[test]
    fn test_each_mapping_returned_once() {
        let index = sample_index();
        // "3" hits marking and target of several mappings
        let hits = markings(&index, "3");
        let mut unique = hits.clone();
        unique.dedup();
        assert_eq!(hits, unique);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_blank_or_unknown_marking() {
        let index = sample_index();
        assert!(index.resolve_silkscreen("").is_empty());
        assert!(index.resolve_silkscreen("ZZZ").is_empty());
    }
}
