//! Silkscreen mapping - marking text printed on a part body

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;

/// Maps a printed marking to the order variant that carries it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilkscreenMapping {
    /// Primary marking text
    pub marking: String,

    /// Order variant id the marking identifies
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pins: Option<u32>,

    /// Other markings that identify the same part (date-code variants etc.)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_markings: Vec<String>,
}

impl Entity for SilkscreenMapping {
    const KIND: &'static str = "silkscreen";

    fn key(&self) -> &str {
        &self.marking
    }
}

impl SilkscreenMapping {
    pub fn new(marking: &str, target: &str) -> Self {
        Self {
            marking: marking.to_string(),
            target: target.to_string(),
            category: None,
            manufacturer: None,
            pins: None,
            alternate_markings: Vec::new(),
        }
    }
}
