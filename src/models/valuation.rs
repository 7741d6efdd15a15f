//! Valuation output models
//!
//! Derived columns appended to each item row, plus the invalid-weight report.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ItemRecord;

/// Derived columns, in output order
pub const DERIVED_COLUMNS: [&str; 5] = [
    "jewelry_price",
    "material_price",
    "total_weight",
    "gemstone_weight",
    "material_weight",
];

/// Weight and value breakdown for one item
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Valuation {
    /// Material value (material_weight * material_price)
    pub jewelry_price: f64,
    /// Resolved unit price of the material
    pub material_price: f64,
    /// Parsed total weight in grams
    pub total_weight: f64,
    /// Estimated gemstone weight in grams
    pub gemstone_weight: f64,
    /// Weight attributable to the material
    pub material_weight: f64,
}

impl Valuation {
    /// Values in `DERIVED_COLUMNS` order
    pub fn columns(&self) -> [f64; 5] {
        [
            self.jewelry_price,
            self.material_price,
            self.total_weight,
            self.gemstone_weight,
            self.material_weight,
        ]
    }
}

/// An item row augmented with its valuation
///
/// Written out through `table::write_valued`, which places the derived
/// columns after the item's own and replaces any stale copies of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedItem {
    pub item: ItemRecord,
    pub valuation: Valuation,
    /// Whether the material was found in the price table
    pub material_known: bool,
}

/// A row whose weight field cannot be read as a number
#[derive(Debug, Clone, Serialize)]
pub struct InvalidWeight {
    /// Zero-based row position in the submitted table
    pub index: usize,
    pub weight: String,
    pub box_id: String,
    pub box_no: String,
    /// The full row with missing values replaced by ""
    pub row_data: BTreeMap<String, String>,
}
