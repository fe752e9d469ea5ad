//! Entity type definitions
//!
//! The catalog holds the following record types:
//!
//! - [`ComponentRecord`] - A chip with its parameters, flags and category
//! - [`OrderVariant`] - An orderable part number of a component
//! - [`AlternativeCandidate`] - A classified replacement for an order variant
//! - [`SilkscreenMapping`] - A printed marking pointing at an order variant
//!
//! [`CategoryNode`] trees are derived from component category paths rather
//! than stored.

pub mod alternative;
pub mod category;
pub mod component;
pub mod silkscreen;
pub mod variant;

pub use alternative::{AlternativeCandidate, BrandCategory, CompatibilityScore, Tier};
pub use category::CategoryNode;
pub use component::{Attribute, CapabilityFlags, ComponentRecord, Flag, ParamValue};
pub use silkscreen::SilkscreenMapping;
pub use variant::{OrderVariant, SupplierOffer};
