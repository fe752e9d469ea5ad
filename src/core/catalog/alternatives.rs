//! Alternative-part listing, filtering and grouping

use std::collections::BTreeMap;
use std::str::FromStr;

use super::CatalogIndex;
use crate::core::identity::ValueParseError;
use crate::entities::alternative::{AlternativeCandidate, BrandCategory, Tier};

/// Tier constraint for alternative filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TierFilter {
    #[default]
    All,
    Only(Tier),
}

impl TierFilter {
    pub fn matches(&self, tier: Tier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Only(t) => *t == tier,
        }
    }
}

impl FromStr for TierFilter {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TierFilter::All);
        }
        s.parse().map(TierFilter::Only)
    }
}

impl std::fmt::Display for TierFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierFilter::All => write!(f, "ALL"),
            TierFilter::Only(t) => write!(f, "{}", t),
        }
    }
}

/// Brand constraint for alternative filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrandFilter {
    #[default]
    All,
    Only(BrandCategory),
}

impl BrandFilter {
    pub fn matches(&self, brand: BrandCategory) -> bool {
        match self {
            BrandFilter::All => true,
            BrandFilter::Only(b) => *b == brand,
        }
    }
}

impl FromStr for BrandFilter {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(BrandFilter::All);
        }
        s.parse().map(BrandFilter::Only)
    }
}

impl std::fmt::Display for BrandFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrandFilter::All => write!(f, "ALL"),
            BrandFilter::Only(b) => write!(f, "{}", b),
        }
    }
}

/// Sort by tier (strongest first), then score descending
///
/// The sort is stable: equal tier and score keep catalog order.
pub fn sort_candidates(candidates: &mut [&AlternativeCandidate]) {
    candidates.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| b.score.cmp(&a.score)));
}

/// Keep candidates matching both constraints, in tier/score order
pub fn filter_alternatives<'a>(
    candidates: &[&'a AlternativeCandidate],
    tier: TierFilter,
    brand: BrandFilter,
) -> Vec<&'a AlternativeCandidate> {
    let mut kept: Vec<&AlternativeCandidate> = candidates
        .iter()
        .copied()
        .filter(|c| tier.matches(c.tier) && brand.matches(c.brand))
        .collect();
    sort_candidates(&mut kept);
    kept
}

/// Group candidates by tier, strongest tier first; empty tiers are omitted
pub fn group_by_tier<'a>(
    candidates: &[&'a AlternativeCandidate],
) -> Vec<(Tier, Vec<&'a AlternativeCandidate>)> {
    Tier::all()
        .iter()
        .filter_map(|&tier| {
            let group = filter_alternatives(candidates, TierFilter::Only(tier), BrandFilter::All);
            (!group.is_empty()).then_some((tier, group))
        })
        .collect()
}

/// Group candidates by brand category; empty groups are omitted
pub fn group_by_brand<'a>(
    candidates: &[&'a AlternativeCandidate],
) -> Vec<(BrandCategory, Vec<&'a AlternativeCandidate>)> {
    BrandCategory::all()
        .iter()
        .filter_map(|&brand| {
            let group = filter_alternatives(candidates, TierFilter::All, BrandFilter::Only(brand));
            (!group.is_empty()).then_some((brand, group))
        })
        .collect()
}

/// Candidate count per tier, every tier present
pub fn tier_counts(candidates: &[&AlternativeCandidate]) -> BTreeMap<Tier, usize> {
    let mut counts: BTreeMap<Tier, usize> = Tier::all().iter().map(|&t| (t, 0)).collect();
    for c in candidates {
        *counts.entry(c.tier).or_default() += 1;
    }
    counts
}

impl CatalogIndex {
    /// Alternatives for a source variant, tier then score descending
    pub fn list_alternatives(&self, variant_id: &str) -> Vec<&AlternativeCandidate> {
        let mut list = self.alternatives_for(variant_id);
        sort_candidates(&mut list);
        list
    }
}
