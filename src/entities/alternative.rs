//! Alternative candidate - a replacement part for an order variant

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Lifecycle};
use crate::core::identity::ValueParseError;

/// Compatibility tier, ordered from strongest to weakest
///
/// The derived `Ord` follows declaration order, so sorting ascending puts
/// the strongest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Drop-in replacement
    #[serde(rename = "BOM2BOM")]
    Bom2Bom,
    /// Same pinout
    #[serde(rename = "P2P")]
    P2P,
    /// Similar function, needs validation
    #[serde(rename = "FUNCTIONAL")]
    Functional,
    /// Footprint only
    #[serde(rename = "PACKAGE")]
    Package,
}

impl Tier {
    /// All tiers in display order
    pub fn all() -> &'static [Tier] {
        &[Tier::Bom2Bom, Tier::P2P, Tier::Functional, Tier::Package]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bom2Bom => "BOM2BOM",
            Tier::P2P => "P2P",
            Tier::Functional => "FUNCTIONAL",
            Tier::Package => "PACKAGE",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BOM2BOM" => Ok(Tier::Bom2Bom),
            "P2P" => Ok(Tier::P2P),
            "FUNCTIONAL" => Ok(Tier::Functional),
            "PACKAGE" => Ok(Tier::Package),
            _ => Err(ValueParseError::UnknownTier(s.to_string())),
        }
    }
}

/// Manufacturer origin of an alternative relative to the source part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrandCategory {
    SameBrand,
    Domestic,
    Foreign,
}

impl BrandCategory {
    /// All brand categories in display order
    pub fn all() -> &'static [BrandCategory] {
        &[
            BrandCategory::SameBrand,
            BrandCategory::Domestic,
            BrandCategory::Foreign,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrandCategory::SameBrand => "SAME_BRAND",
            BrandCategory::Domestic => "DOMESTIC",
            BrandCategory::Foreign => "FOREIGN",
        }
    }
}

impl std::fmt::Display for BrandCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BrandCategory {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SAME_BRAND" => Ok(BrandCategory::SameBrand),
            "DOMESTIC" => Ok(BrandCategory::Domestic),
            "FOREIGN" => Ok(BrandCategory::Foreign),
            _ => Err(ValueParseError::UnknownBrandCategory(s.to_string())),
        }
    }
}

/// Compatibility score, 0 to 100 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CompatibilityScore(u8);

impl CompatibilityScore {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, ValueParseError> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValueParseError::ScoreOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for CompatibilityScore {
    type Error = ValueParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompatibilityScore> for u8 {
    fn from(score: CompatibilityScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for CompatibilityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate replacement for a source order variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeCandidate {
    /// Unique identifier of this candidate entry
    pub id: String,

    /// Order variant id this candidate replaces
    pub source: String,

    /// Part number of the replacement
    pub part_number: String,

    /// Manufacturer of the replacement
    pub manufacturer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    #[serde(default)]
    pub lifecycle: Lifecycle,

    #[serde(default)]
    pub description: String,

    pub tier: Tier,

    pub brand: BrandCategory,

    /// Curated compatibility score
    pub score: CompatibilityScore,

    /// What the two parts have in common
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similarities: Vec<String>,

    /// Where the two parts differ
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<String>,
}

impl Entity for AlternativeCandidate {
    const KIND: &'static str = "alternative";

    fn key(&self) -> &str {
        &self.id
    }
}

impl AlternativeCandidate {
    /// Create a candidate with the classification fields set
    pub fn new(
        id: &str,
        source: &str,
        part_number: &str,
        manufacturer: &str,
        tier: Tier,
        brand: BrandCategory,
        score: CompatibilityScore,
    ) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            part_number: part_number.to_string(),
            manufacturer: manufacturer.to_string(),
            package: None,
            lifecycle: Lifecycle::default(),
            description: String::new(),
            tier,
            brand,
            score,
            similarities: Vec::new(),
            differences: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_strongest_first() {
        let mut tiers = vec![Tier::Package, Tier::Bom2Bom, Tier::Functional, Tier::P2P];
        tiers.sort();
        assert_eq!(tiers, Tier::all());
    }

    #[test]
    fn test_tier_rejects_unknown_name() {
        assert_eq!("p2p".parse::<Tier>().unwrap(), Tier::P2P);
        let err = "PIN2PIN".parse::<Tier>().unwrap_err();
        assert!(matches!(err, ValueParseError::UnknownTier(_)));
    }

    #[test]
    fn test_brand_category_parse() {
        assert_eq!(
            "same-brand".parse::<BrandCategory>().unwrap(),
            BrandCategory::SameBrand
        );
        assert!("LOCAL".parse::<BrandCategory>().is_err());
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(CompatibilityScore::new(100).unwrap().value(), 100);
        assert_eq!(CompatibilityScore::new(0).unwrap().value(), 0);
        assert!(CompatibilityScore::new(101).is_err());
        assert!(CompatibilityScore::new(-1).is_err());
    }

    #[test]
    fn test_candidate_deserialization_rejects_bad_values() {
        let good = "id: A1\nsource: TPS563201DDCR\npart_number: SY8089\nmanufacturer: Silergy\ntier: P2P\nbrand: DOMESTIC\nscore: 88\n";
        let cand: AlternativeCandidate = serde_yml::from_str(good).unwrap();
        assert_eq!(cand.tier, Tier::P2P);
        assert_eq!(cand.brand, BrandCategory::Domestic);
        assert_eq!(cand.score.value(), 88);

        let bad_tier = good.replace("tier: P2P", "tier: PIN2PIN");
        assert!(serde_yml::from_str::<AlternativeCandidate>(&bad_tier).is_err());

        let bad_score = good.replace("score: 88", "score: 140");
        assert!(serde_yml::from_str::<AlternativeCandidate>(&bad_score).is_err());
    }
}
