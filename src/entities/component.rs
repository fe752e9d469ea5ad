//! Component record - a chip family as listed in the catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::entity::{Entity, Lifecycle};
use crate::core::identity::ValueParseError;

/// A single parameter value
///
/// Catalog sources mix numbers and strings freely ("3.3", 3.3, "I2C/SPI"),
/// so the value keeps whichever form it was written in. An absent key is
/// represented by the parameter simply not being in the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Numeric(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value; text that parses as a plain number counts
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Numeric(v) => Some(*v),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Text view of the value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Numeric(_) => None,
            ParamValue::Text(s) => Some(s),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Numeric(v) => write!(f, "{}", v),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Canonical attributes with an ordered list of source key synonyms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    VoltageMin,
    VoltageMax,
    CurrentMin,
    CurrentMax,
    Interface,
}

impl Attribute {
    /// Parameter keys that carry this attribute, in lookup order
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Attribute::VoltageMin => &["Voltage Min", "Supply Voltage Min", "Input Voltage Min"],
            Attribute::VoltageMax => &["Voltage Max", "Supply Voltage Max", "Input Voltage Max"],
            Attribute::CurrentMin => &["Current Min", "Output Current Min"],
            Attribute::CurrentMax => &["Current Max", "Output Current Max", "Output Current"],
            Attribute::Interface => &["Interface", "Interfaces", "Communication Interface"],
        }
    }
}

/// Boolean capability flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityFlags {
    /// AEC-Q qualified
    pub automotive: bool,
    pub rohs: bool,
    pub low_power: bool,
    pub internal_oscillator: bool,
}

/// A capability that can be required by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    Automotive,
    Rohs,
    LowPower,
    InternalOscillator,
}

impl Flag {
    pub fn all() -> &'static [Flag] {
        &[
            Flag::Automotive,
            Flag::Rohs,
            Flag::LowPower,
            Flag::InternalOscillator,
        ]
    }

    /// The tag that expresses the same capability in a component's tag set
    pub fn tag_alias(&self) -> &'static str {
        match self {
            Flag::Automotive => "automotive",
            Flag::Rohs => "rohs",
            Flag::LowPower => "low-power",
            Flag::InternalOscillator => "internal-oscillator",
        }
    }

    /// Read this flag from a flag set
    pub fn is_set(&self, flags: &CapabilityFlags) -> bool {
        match self {
            Flag::Automotive => flags.automotive,
            Flag::Rohs => flags.rohs,
            Flag::LowPower => flags.low_power,
            Flag::InternalOscillator => flags.internal_oscillator,
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag_alias())
    }
}

impl std::str::FromStr for Flag {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "automotive" => Ok(Flag::Automotive),
            "rohs" => Ok(Flag::Rohs),
            "low-power" => Ok(Flag::LowPower),
            "internal-oscillator" => Ok(Flag::InternalOscillator),
            _ => Err(ValueParseError::UnknownFlag(s.to_string())),
        }
    }
}

/// A component record - one chip as listed in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Unique identifier
    pub id: String,

    /// Display model code (not unique across records)
    pub model: String,

    /// Manufacturer name
    pub manufacturer: String,

    /// Slash-delimited category path, outermost first
    #[serde(default)]
    pub category: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Parameter map
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParamValue>,

    /// Capability flags
    #[serde(default)]
    pub flags: CapabilityFlags,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Lifecycle status
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Entity for ComponentRecord {
    const KIND: &'static str = "component";

    fn key(&self) -> &str {
        &self.id
    }
}

impl ComponentRecord {
    /// Create a new component with the given identity; everything else empty
    pub fn new(id: &str, model: &str, manufacturer: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            model: model.to_string(),
            manufacturer: manufacturer.to_string(),
            category: category.to_string(),
            description: String::new(),
            parameters: BTreeMap::new(),
            flags: CapabilityFlags::default(),
            tags: Vec::new(),
            lifecycle: Lifecycle::default(),
        }
    }

    /// Look up a canonical attribute; the first synonym present wins
    pub fn attribute(&self, attr: Attribute) -> Option<&ParamValue> {
        attr.synonyms()
            .iter()
            .find_map(|key| self.parameters.get(*key))
    }

    /// Numeric view of a canonical attribute
    pub fn numeric_attribute(&self, attr: Attribute) -> Option<f64> {
        self.attribute(attr).and_then(ParamValue::as_number)
    }

    /// Interfaces listed under the canonical interface attribute
    ///
    /// Multi-valued entries are written like "I2C/SPI" or "I2C, SPI".
    pub fn interfaces(&self) -> Vec<&str> {
        match self.attribute(Attribute::Interface) {
            Some(ParamValue::Text(s)) => s
                .split(|c| c == ',' || c == '/' || c == ';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// True if the tag set contains `tag` (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
