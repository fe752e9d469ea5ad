//! Order variant - an orderable SKU of a component, with supplier offers

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Lifecycle};

/// A supplier's offer for an order variant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierOffer {
    /// Supplier name
    pub name: String,

    /// Unit price
    pub price: f64,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Lead time in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    /// Minimum order quantity
    #[serde(default = "default_moq")]
    pub moq: u32,

    /// Supplier rating (higher is better)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

fn default_moq() -> u32 {
    1
}

impl SupplierOffer {
    /// True if this offer can fill an order of `qty` units right now
    pub fn can_fill(&self, qty: u32) -> bool {
        self.stock >= qty && self.moq <= qty
    }
}

/// An orderable variant of a component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderVariant {
    /// Orderable part number
    pub id: String,

    /// Owning component, referenced by model (or id)
    pub component: String,

    /// Package descriptor (e.g., "SOT-23-6")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Pin count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pins: Option<u32>,

    /// Marking text printed on the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marking: Option<String>,

    /// Units per reel/tube/tray
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_qty: Option<u32>,

    /// Carrier type (e.g., "Tape & Reel")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    /// Operating temperature descriptor (e.g., "-40~125°C")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub lifecycle: Lifecycle,

    /// Supplier offers, in catalog order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<SupplierOffer>,
}

impl Entity for OrderVariant {
    const KIND: &'static str = "variant";

    fn key(&self) -> &str {
        &self.id
    }
}

impl OrderVariant {
    /// Create a new variant owned by `component`
    pub fn new(id: &str, component: &str) -> Self {
        Self {
            id: id.to_string(),
            component: component.to_string(),
            package: None,
            pins: None,
            marking: None,
            packaging_qty: None,
            carrier: None,
            temperature: None,
            lifecycle: Lifecycle::default(),
            offers: Vec::new(),
        }
    }

    /// Builder-style package setter
    pub fn with_package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    /// Builder-style marking setter
    pub fn with_marking(mut self, marking: &str) -> Self {
        self.marking = Some(marking.to_string());
        self
    }

    /// Total stock across all offers
    pub fn total_stock(&self) -> u64 {
        self.offers.iter().map(|o| o.stock as u64).sum()
    }

    /// Cheapest offer able to fill `qty` units
    ///
    /// Ties on price go to the higher-rated supplier, then to catalog order.
    pub fn best_offer(&self, qty: u32) -> Option<&SupplierOffer> {
        let mut best: Option<&SupplierOffer> = None;
        for offer in self.offers.iter().filter(|o| o.can_fill(qty)) {
            best = match best {
                None => Some(offer),
                Some(current) => {
                    let cheaper = offer.price < current.price;
                    let same_price_better_rated = offer.price == current.price
                        && offer.rating.unwrap_or(0.0) > current.rating.unwrap_or(0.0);
                    if cheaper || same_price_better_rated {
                        Some(offer)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        best
    }
}
