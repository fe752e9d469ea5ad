//! Hierarchical category selector
//!
//! A small state machine for drill-down browsing: up to three category
//! levels plus independent multi-select filter dimensions (brand, package,
//! parameter). The selector never queries the catalog; callers turn its
//! state into a [`FilterSpec`] with [`CategorySelector::to_filter_spec`].
//!
//! Each browsing session owns its own selector. Mutation requires `&mut`.

use miette::Diagnostic;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use thiserror::Error;

use crate::core::filter::FilterSpec;
use crate::core::identity::ValueParseError;
use crate::entities::category::{self, CategoryNode, PATH_SEPARATOR};

/// Prefix of parameter keys in the flat pair encoding
const PARAM_PREFIX: &str = "param.";

/// Category level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Level {
    L1,
    L2,
    L3,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Level::L1, Level::L2, Level::L3]
    }

    /// Zero-based depth
    pub fn index(&self) -> usize {
        match self {
            Level::L1 => 0,
            Level::L2 => 1,
            Level::L3 => 2,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Level::L1 => "l1",
            Level::L2 => "l2",
            Level::L3 => "l3",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key().to_uppercase())
    }
}

impl FromStr for Level {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "l1" => Ok(Level::L1),
            "2" | "l2" => Ok(Level::L2),
            "3" | "l3" => Ok(Level::L3),
            _ => Err(SelectorError::UnknownLevel(s.to_string())),
        }
    }
}

/// Level state of the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Unselected,
    L1Selected,
    L2Selected,
    L3Selected,
}

/// Independent filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Brand,
    Package,
    Parameter,
}

impl FilterDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Brand => "brand",
            FilterDimension::Package => "package",
            FilterDimension::Parameter => "parameter",
        }
    }
}

impl std::fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brand" | "manufacturer" => Ok(FilterDimension::Brand),
            "package" => Ok(FilterDimension::Package),
            "parameter" | "param" => Ok(FilterDimension::Parameter),
            _ => Err(ValueParseError::UnknownDimension(s.to_string())),
        }
    }
}

/// Errors from selector transitions and decoding
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SelectorError {
    #[error("cannot select {level} before {parent}")]
    #[diagnostic(code(chipdex::selector::parent_unset))]
    ParentNotSelected { level: Level, parent: Level },

    #[error("'{name}' is not a category at {level} under the current selection")]
    #[diagnostic(code(chipdex::selector::unknown_node))]
    UnknownNode { level: Level, name: String },

    #[error("category name is empty")]
    #[diagnostic(code(chipdex::selector::empty_name))]
    EmptyName,

    #[error("parameter filters need a parameter key")]
    #[diagnostic(code(chipdex::selector::missing_key))]
    MissingParameterKey,

    #[error("category path '{path}' has {depth} levels")]
    #[diagnostic(
        code(chipdex::selector::path_too_deep),
        help("category browsing stops at three levels")
    )]
    PathTooDeep { path: String, depth: usize },

    #[error("unknown category level '{0}'")]
    #[diagnostic(code(chipdex::selector::unknown_level), help("use 1, 2 or 3"))]
    UnknownLevel(String),

    #[error("unknown selection key '{0}'")]
    #[diagnostic(
        code(chipdex::selector::unknown_key),
        help("valid keys: l1, l2, l3, brand, package, param.<name>")
    )]
    UnknownKey(String),
}

/// Drill-down selection state for one browsing session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySelector {
    tree: Option<Vec<CategoryNode>>,
    levels: [Option<String>; 3],
    brands: BTreeSet<String>,
    packages: BTreeSet<String>,
    parameters: BTreeMap<String, BTreeSet<String>>,
    details: Vec<FilterDimension>,
}

impl CategorySelector {
    /// Selector that accepts any category names
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector that validates names against a category tree
    pub fn with_tree(tree: Vec<CategoryNode>) -> Self {
        Self {
            tree: Some(tree),
            ..Self::default()
        }
    }

    // =====================================================================
    // Transitions
    // =====================================================================

    /// Select `name` at `level`, clearing every deeper level
    pub fn select_level(&mut self, level: Level, name: &str) -> Result<(), SelectorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SelectorError::EmptyName);
        }
        let idx = level.index();
        if idx > 0 && self.levels[idx - 1].is_none() {
            return Err(SelectorError::ParentNotSelected {
                level,
                parent: Level::all()[idx - 1],
            });
        }
        if self.tree.is_some() && !self.options_at(idx).contains(&name) {
            return Err(SelectorError::UnknownNode {
                level,
                name: name.to_string(),
            });
        }

        self.levels[idx] = Some(name.to_string());
        for deeper in &mut self.levels[idx + 1..] {
            *deeper = None;
        }
        Ok(())
    }

    /// Select every segment of a "L1/L2/L3" path from the top
    ///
    /// The previous level selection is replaced; filters are kept.
    pub fn select_path(&mut self, path: &str) -> Result<(), SelectorError> {
        let segments = category::split_path(path);
        if segments.len() > Level::all().len() {
            return Err(SelectorError::PathTooDeep {
                path: path.to_string(),
                depth: segments.len(),
            });
        }
        self.levels = Default::default();
        for (level, name) in Level::all().iter().zip(segments) {
            self.select_level(*level, name)?;
        }
        Ok(())
    }

    /// Toggle a filter value on or off; returns whether it is now active
    ///
    /// `key` names the parameter for [`FilterDimension::Parameter`] and is
    /// ignored for the other dimensions.
    pub fn toggle_filter(
        &mut self,
        dimension: FilterDimension,
        key: &str,
        value: &str,
    ) -> Result<bool, SelectorError> {
        let set = match dimension {
            FilterDimension::Brand => &mut self.brands,
            FilterDimension::Package => &mut self.packages,
            FilterDimension::Parameter => {
                let key = key.trim();
                if key.is_empty() {
                    return Err(SelectorError::MissingParameterKey);
                }
                self.parameters.entry(key.to_string()).or_default()
            }
        };

        let active = if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        };
        self.parameters.retain(|_, values| !values.is_empty());
        Ok(active)
    }

    /// Clear every toggle of one dimension
    pub fn clear_filter(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Brand => self.brands.clear(),
            FilterDimension::Package => self.packages.clear(),
            FilterDimension::Parameter => self.parameters.clear(),
        }
    }

    /// Open the detail view of a filter dimension
    pub fn open_detail(&mut self, dimension: FilterDimension) {
        if self.details.last() != Some(&dimension) {
            self.details.push(dimension);
        }
    }

    /// Pop one step: the innermost detail view, else the deepest level
    ///
    /// Returns false when there was nothing to pop.
    pub fn go_back(&mut self) -> bool {
        if self.details.pop().is_some() {
            return true;
        }
        match self.levels.iter_mut().rev().find(|l| l.is_some()) {
            Some(level) => {
                *level = None;
                true
            }
            None => false,
        }
    }

    /// Clear all levels, toggles and detail views
    pub fn reset(&mut self) {
        self.levels = Default::default();
        self.brands.clear();
        self.packages.clear();
        self.parameters.clear();
        self.details.clear();
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn state(&self) -> SelectionState {
        match self.depth() {
            0 => SelectionState::Unselected,
            1 => SelectionState::L1Selected,
            2 => SelectionState::L2Selected,
            _ => SelectionState::L3Selected,
        }
    }

    fn depth(&self) -> usize {
        self.levels.iter().take_while(|l| l.is_some()).count()
    }

    pub fn selected(&self, level: Level) -> Option<&str> {
        self.levels[level.index()].as_deref()
    }

    /// Selected names from L1 downward
    pub fn path(&self) -> Vec<&str> {
        self.levels.iter().map_while(|l| l.as_deref()).collect()
    }

    /// Selected path joined with `/`, `None` when unselected
    pub fn category_path(&self) -> Option<String> {
        let path = self.path();
        let separator = PATH_SEPARATOR.to_string();
        (!path.is_empty()).then(|| path.join(separator.as_str()))
    }

    /// Innermost open detail view
    pub fn open_detail_view(&self) -> Option<FilterDimension> {
        self.details.last().copied()
    }

    /// Active values of a dimension (all parameter values for `Parameter`)
    pub fn active_filters(&self, dimension: FilterDimension) -> Vec<&str> {
        match dimension {
            FilterDimension::Brand => self.brands.iter().map(String::as_str).collect(),
            FilterDimension::Package => self.packages.iter().map(String::as_str).collect(),
            FilterDimension::Parameter => self
                .parameters
                .values()
                .flat_map(|values| values.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Active parameter toggles keyed by parameter name
    pub fn parameter_filters(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.parameters
    }

    /// Total number of active toggles across all dimensions
    pub fn filter_count(&self) -> usize {
        self.brands.len()
            + self.packages.len()
            + self.parameters.values().map(BTreeSet::len).sum::<usize>()
    }

    /// Options at the next level (empty without a tree or at L3)
    pub fn children(&self) -> Vec<&str> {
        self.options_at(self.depth())
    }

    fn options_at(&self, idx: usize) -> Vec<&str> {
        let Some(tree) = self.tree.as_deref() else {
            return Vec::new();
        };
        if idx == 0 {
            return tree.iter().map(|n| n.name.as_str()).collect();
        }
        if idx >= Level::all().len() {
            return Vec::new();
        }
        let parents: Vec<&str> = self.levels[..idx]
            .iter()
            .map_while(|l| l.as_deref())
            .collect();
        if parents.len() < idx {
            return Vec::new();
        }
        category::find(tree, &parents)
            .map(|node| node.children.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    // =====================================================================
    // Output
    // =====================================================================

    /// Filter specification for the current selection
    pub fn to_filter_spec(&self) -> FilterSpec {
        FilterSpec {
            category: self.category_path(),
            manufacturers: self.brands.clone(),
            packages: self.packages.clone(),
            parameters: self.parameters.clone(),
            ..FilterSpec::default()
        }
    }

    /// Flat key-value encoding; multi-select values repeat their key
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (level, name) in Level::all().iter().zip(&self.levels) {
            if let Some(name) = name {
                pairs.push((level.key().to_string(), name.clone()));
            }
        }
        for brand in &self.brands {
            pairs.push(("brand".to_string(), brand.clone()));
        }
        for package in &self.packages {
            pairs.push(("package".to_string(), package.clone()));
        }
        for (key, values) in &self.parameters {
            for value in values {
                pairs.push((format!("{}{}", PARAM_PREFIX, key), value.clone()));
            }
        }
        pairs
    }

    /// Decode the flat encoding produced by [`Self::to_pairs`]
    ///
    /// Pair order does not matter. Detail views are not encoded.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut levels: [Option<String>; 3] = Default::default();
        let mut selector = Self::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref().trim(), value.as_ref());
            if let Some(param) = key.strip_prefix(PARAM_PREFIX) {
                let param = param.trim();
                if param.is_empty() {
                    return Err(SelectorError::MissingParameterKey);
                }
                selector
                    .parameters
                    .entry(param.to_string())
                    .or_default()
                    .insert(value.to_string());
                continue;
            }
            match key {
                "brand" => {
                    selector.brands.insert(value.to_string());
                }
                "package" => {
                    selector.packages.insert(value.to_string());
                }
                _ => {
                    let level: Level = key
                        .parse()
                        .map_err(|_| SelectorError::UnknownKey(key.to_string()))?;
                    levels[level.index()] = Some(value.to_string());
                }
            }
        }

        for (level, name) in Level::all().iter().zip(levels) {
            if let Some(name) = name {
                selector.select_level(*level, &name)?;
            }
        }
        Ok(selector)
    }

    /// Attach (or replace) the validation tree, keeping the current state
    pub fn attach_tree(&mut self, tree: Vec<CategoryNode>) {
        self.tree = Some(tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<CategoryNode> {
        category::build_tree([
            "Power/DC-DC/Buck",
            "Power/DC-DC/Boost",
            "Power/LDO",
            "MCU/ARM/Cortex-M4",
        ])
    }

    fn at_l3() -> CategorySelector {
        let mut sel = CategorySelector::with_tree(tree());
        sel.select_level(Level::L1, "Power").unwrap();
        sel.select_level(Level::L2, "DC-DC").unwrap();
        sel.select_level(Level::L3, "Buck").unwrap();
        sel
    }

    #[test]
    fn test_selecting_a_level_clears_deeper_levels() {
        let mut sel = at_l3();
        assert_eq!(sel.state(), SelectionState::L3Selected);
        sel.select_level(Level::L1, "MCU").unwrap();
        assert_eq!(sel.state(), SelectionState::L1Selected);
        assert_eq!(sel.selected(Level::L2), None);
        assert_eq!(sel.selected(Level::L3), None);
    }

    #[test]
    fn test_go_back_from_l3_then_noop() {
        let mut sel = at_l3();
        assert!(sel.go_back());
        assert_eq!(sel.state(), SelectionState::L2Selected);
        assert!(sel.go_back());
        assert_eq!(sel.state(), SelectionState::L1Selected);
        assert!(sel.go_back());
        assert_eq!(sel.state(), SelectionState::Unselected);
        assert!(!sel.go_back());
        assert_eq!(sel.state(), SelectionState::Unselected);
    }

    #[test]
    fn test_go_back_closes_detail_view_first() {
        let mut sel = at_l3();
        sel.open_detail(FilterDimension::Brand);
        sel.open_detail(FilterDimension::Package);
        assert!(sel.go_back());
        assert_eq!(sel.open_detail_view(), Some(FilterDimension::Brand));
        assert_eq!(sel.state(), SelectionState::L3Selected);
        assert!(sel.go_back());
        assert_eq!(sel.open_detail_view(), None);
        assert_eq!(sel.state(), SelectionState::L3Selected);
    }

    #[test]
    fn test_filters_do_not_change_level_state() {
        let mut sel = CategorySelector::with_tree(tree());
        sel.select_level(Level::L1, "Power").unwrap();
        assert!(sel.toggle_filter(FilterDimension::Brand, "", "TI").unwrap());
        assert!(sel.toggle_filter(FilterDimension::Brand, "", "ST").unwrap());
        assert!(sel
            .toggle_filter(FilterDimension::Parameter, "Output Current", "3A")
            .unwrap());
        assert_eq!(sel.state(), SelectionState::L1Selected);
        assert_eq!(sel.filter_count(), 3);

        // toggling again removes
        assert!(!sel.toggle_filter(FilterDimension::Brand, "", "TI").unwrap());
        assert_eq!(sel.active_filters(FilterDimension::Brand), vec!["ST"]);
    }

    #[test]
    fn test_parameter_toggle_needs_key() {
        let mut sel = CategorySelector::new();
        assert_eq!(
            sel.toggle_filter(FilterDimension::Parameter, " ", "3A"),
            Err(SelectorError::MissingParameterKey)
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut sel = at_l3();
        sel.toggle_filter(FilterDimension::Package, "", "SOT-23-6").unwrap();
        sel.open_detail(FilterDimension::Package);
        sel.reset();
        assert_eq!(sel.state(), SelectionState::Unselected);
        assert_eq!(sel.filter_count(), 0);
        assert_eq!(sel.open_detail_view(), None);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut sel = CategorySelector::with_tree(tree());
        assert!(matches!(
            sel.select_level(Level::L2, "DC-DC"),
            Err(SelectorError::ParentNotSelected { .. })
        ));
        sel.select_level(Level::L1, "Power").unwrap();
        assert!(matches!(
            sel.select_level(Level::L2, "ARM"),
            Err(SelectorError::UnknownNode { .. })
        ));
        assert_eq!(sel.select_level(Level::L1, "  "), Err(SelectorError::EmptyName));
    }

    #[test]
    fn test_children_follow_selection() {
        let mut sel = CategorySelector::with_tree(tree());
        assert_eq!(sel.children(), vec!["Power", "MCU"]);
        sel.select_level(Level::L1, "Power").unwrap();
        assert_eq!(sel.children(), vec!["DC-DC", "LDO"]);
        assert!(at_l3().children().is_empty());
        assert!(CategorySelector::new().children().is_empty());
    }

    #[test]
    fn test_filter_spec_output() {
        let mut sel = at_l3();
        sel.toggle_filter(FilterDimension::Brand, "", "TI").unwrap();
        let spec = sel.to_filter_spec();
        assert_eq!(spec.category.as_deref(), Some("Power/DC-DC/Buck"));
        assert!(spec.manufacturers.contains("TI"));
        assert!(CategorySelector::new().to_filter_spec().is_empty());
    }

    #[test]
    fn test_pairs_round_trip() {
        let mut sel = at_l3();
        sel.toggle_filter(FilterDimension::Brand, "", "TI").unwrap();
        sel.toggle_filter(FilterDimension::Package, "", "SOT-23-6").unwrap();
        sel.toggle_filter(FilterDimension::Parameter, "Topology", "Sync")
            .unwrap();

        let pairs = sel.to_pairs();
        assert!(pairs.contains(&("param.Topology".to_string(), "Sync".to_string())));

        // Order independent
        let mut reversed = pairs.clone();
        reversed.reverse();
        let mut decoded = CategorySelector::from_pairs(reversed).unwrap();
        decoded.attach_tree(tree());
        assert_eq!(decoded, sel);
    }

    #[test]
    fn test_select_path() {
        let mut sel = CategorySelector::with_tree(tree());
        sel.select_path(" Power / DC-DC ").unwrap();
        assert_eq!(sel.path(), vec!["Power", "DC-DC"]);

        let err = sel.select_path("Power/DC-DC/Buck/Sync").unwrap_err();
        assert!(matches!(err, SelectorError::PathTooDeep { depth: 4, .. }));
        assert_eq!(sel.path(), vec!["Power", "DC-DC"]);

        assert!(sel.select_path("Power/Nope").is_err());
    }

    #[test]
    fn test_from_pairs_repeated_keys_are_idempotent() {
        let sel = CategorySelector::from_pairs([
            ("brand", "TI"),
            ("brand", "TI"),
            ("param.Core", "M4"),
            ("param.Core", "M4"),
            ("param.Core", "M7"),
        ])
        .unwrap();
        assert_eq!(sel.active_filters(FilterDimension::Brand), vec!["TI"]);
        assert_eq!(
            sel.active_filters(FilterDimension::Parameter),
            vec!["M4", "M7"]
        );
        assert_eq!(sel.filter_count(), 3);

        let err = CategorySelector::from_pairs([("param. ", "M4")]).unwrap_err();
        assert_eq!(err, SelectorError::MissingParameterKey);
    }

    #[test]
    fn test_from_pairs_rejects_unknown_key() {
        let err = CategorySelector::from_pairs([("colour", "red")]).unwrap_err();
        assert_eq!(err, SelectorError::UnknownKey("colour".to_string()));

        let err = CategorySelector::from_pairs([("l2", "DC-DC")]).unwrap_err();
        assert!(matches!(err, SelectorError::ParentNotSelected { .. }));
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!(
            "Brand".parse::<FilterDimension>().unwrap(),
            FilterDimension::Brand
        );
        assert!("colour".parse::<FilterDimension>().is_err());
        assert_eq!("2".parse::<Level>().unwrap(), Level::L2);
    }
}
