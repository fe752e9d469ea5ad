//! Structured filtering over components and order variants
//!
//! A [`FilterSpec`] is a conjunction of optional constraints. Each field is
//! independent and an absent/empty field constrains nothing, so the empty
//! spec is the identity filter.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::entity::Lifecycle;
use crate::core::predicates::{
    any_in_set, category_matches, flag_satisfied, in_set, range_overlaps, RangeQuery,
};
use crate::entities::component::{Attribute, ComponentRecord, Flag};
use crate::entities::variant::OrderVariant;

/// Structured filter specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Category path prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Allowed manufacturers
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub manufacturers: BTreeSet<String>,

    /// Allowed packages
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub packages: BTreeSet<String>,

    /// Allowed lifecycle statuses
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub lifecycles: BTreeSet<Lifecycle>,

    /// Allowed interfaces (any listed interface may match)
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub interfaces: BTreeSet<String>,

    /// Supply/input voltage range that must overlap the part's range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<RangeQuery>,

    /// Current range that must overlap the part's range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<RangeQuery>,

    /// Capabilities the part must have
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub require: BTreeSet<Flag>,

    /// Allowed display values per parameter key
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturers.insert(manufacturer.to_string());
        self
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.packages.insert(package.to_string());
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycles.insert(lifecycle);
        self
    }

    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.insert(interface.to_string());
        self
    }

    pub fn with_voltage(mut self, range: RangeQuery) -> Self {
        self.voltage = Some(range);
        self
    }

    pub fn with_current(mut self, range: RangeQuery) -> Self {
        self.current = Some(range);
        self
    }

    pub fn requiring(mut self, flag: Flag) -> Self {
        self.require.insert(flag);
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters
            .entry(key.to_string())
            .or_default()
            .insert(value.to_string());
        self
    }

    /// True if no field is active
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.manufacturers.is_empty()
            && self.packages.is_empty()
            && self.lifecycles.is_empty()
            && self.interfaces.is_empty()
            && self.voltage.map_or(true, |r| r.is_empty())
            && self.current.map_or(true, |r| r.is_empty())
            && self.require.is_empty()
            && self.parameters.values().all(BTreeSet::is_empty)
    }

    /// Combine two specs; `self` keeps its scalar fields, sets are unioned
    pub fn merge(&self, other: &FilterSpec) -> FilterSpec {
        let mut merged = self.clone();
        if merged.category.is_none() {
            merged.category = other.category.clone();
        }
        merged.manufacturers.extend(other.manufacturers.iter().cloned());
        merged.packages.extend(other.packages.iter().cloned());
        merged.lifecycles.extend(other.lifecycles.iter().copied());
        merged.interfaces.extend(other.interfaces.iter().cloned());
        if merged.voltage.is_none() {
            merged.voltage = other.voltage;
        }
        if merged.current.is_none() {
            merged.current = other.current;
        }
        merged.require.extend(other.require.iter().copied());
        for (key, values) in &other.parameters {
            merged
                .parameters
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
        merged
    }

    /// Evaluate every active constraint, stopping at the first failure
    pub fn matches<S: FilterSubject + ?Sized>(&self, subject: &S) -> bool {
        let cmp = subject.component();

        if let Some(ref category) = self.category {
            if !category_matches(&cmp.category, category) {
                return false;
            }
        }

        if !self.manufacturers.is_empty()
            && !in_set(Some(cmp.manufacturer.as_str()), &self.manufacturers)
        {
            return false;
        }

        if !self.packages.is_empty() && !any_in_set(subject.packages(), &self.packages) {
            return false;
        }

        if !self.lifecycles.is_empty() && !self.lifecycles.contains(&subject.lifecycle()) {
            return false;
        }

        if !self.interfaces.is_empty() && !any_in_set(cmp.interfaces(), &self.interfaces) {
            return false;
        }

        if let Some(ref range) = self.voltage {
            if !range.is_empty()
                && !range_overlaps(
                    cmp.numeric_attribute(Attribute::VoltageMin),
                    cmp.numeric_attribute(Attribute::VoltageMax),
                    range,
                )
            {
                return false;
            }
        }

        if let Some(ref range) = self.current {
            if !range.is_empty()
                && !range_overlaps(
                    cmp.numeric_attribute(Attribute::CurrentMin),
                    cmp.numeric_attribute(Attribute::CurrentMax),
                    range,
                )
            {
                return false;
            }
        }

        if !self
            .require
            .iter()
            .all(|flag| flag_satisfied(*flag, &cmp.flags, &cmp.tags))
        {
            return false;
        }

        for (key, allowed) in &self.parameters {
            if allowed.is_empty() {
                continue;
            }
            let value = cmp.parameters.get(key).map(|v| v.to_string());
            if !in_set(value.as_deref(), allowed) {
                return false;
            }
        }

        true
    }
}

/// Anything a [`FilterSpec`] can be evaluated against
pub trait FilterSubject {
    /// The component whose attributes (category, manufacturer, parameters,
    /// flags, tags) are checked
    fn component(&self) -> &ComponentRecord;

    /// Packages this subject is available in
    fn packages(&self) -> Vec<&str>;

    /// Lifecycle status checked against the lifecycle constraint
    fn lifecycle(&self) -> Lifecycle;
}

/// A component together with its order variants
#[derive(Debug, Clone)]
pub struct ComponentSubject<'a> {
    pub component: &'a ComponentRecord,
    pub variants: Vec<&'a OrderVariant>,
}

impl FilterSubject for ComponentSubject<'_> {
    fn component(&self) -> &ComponentRecord {
        self.component
    }

    fn packages(&self) -> Vec<&str> {
        self.variants
            .iter()
            .filter_map(|v| v.package.as_deref())
            .collect()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.component.lifecycle
    }
}

/// A single order variant seen through its owning component
#[derive(Debug, Clone, Copy)]
pub struct VariantSubject<'a> {
    pub component: &'a ComponentRecord,
    pub variant: &'a OrderVariant,
}

impl FilterSubject for VariantSubject<'_> {
    fn component(&self) -> &ComponentRecord {
        self.component
    }

    fn packages(&self) -> Vec<&str> {
        self.variant.package.as_deref().into_iter().collect()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.variant.lifecycle
    }
}

/// Applies filter specifications to candidate collections
pub struct FilterEngine;

impl FilterEngine {
    /// Keep the candidates that pass every active constraint, in input order
    pub fn apply<S, I>(candidates: I, spec: &FilterSpec) -> Vec<S>
    where
        S: FilterSubject,
        I: IntoIterator<Item = S>,
    {
        if spec.is_empty() {
            return candidates.into_iter().collect();
        }
        candidates.into_iter().filter(|c| spec.matches(c)).collect()
    }
}

/// Count of one facet value in a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Value counts used to populate filter dimensions
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub manufacturers: Vec<FacetCount>,
    pub packages: Vec<FacetCount>,
    pub lifecycles: Vec<FacetCount>,
}

impl Facets {
    /// Count manufacturers, packages and lifecycle statuses over `subjects`
    ///
    /// A subject offered in the same package twice counts once for it.
    pub fn collect<'a, S, I>(subjects: I) -> Self
    where
        S: FilterSubject + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut manufacturers: HashMap<String, usize> = HashMap::new();
        let mut packages: HashMap<String, usize> = HashMap::new();
        let mut lifecycles: HashMap<String, usize> = HashMap::new();

        for subject in subjects {
            *manufacturers
                .entry(subject.component().manufacturer.clone())
                .or_default() += 1;
            let unique: BTreeSet<&str> = subject.packages().into_iter().collect();
            for pkg in unique {
                *packages.entry(pkg.to_string()).or_default() += 1;
            }
            *lifecycles
                .entry(subject.lifecycle().to_string())
                .or_default() += 1;
        }

        Self {
            manufacturers: sorted_counts(manufacturers),
            packages: sorted_counts(packages),
            lifecycles: sorted_counts(lifecycles),
        }
    }
}

fn sorted_counts(counts: HashMap<String, usize>) -> Vec<FacetCount> {
    let mut out: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}
