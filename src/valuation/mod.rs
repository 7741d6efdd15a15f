//! Valuation module
//!
//! Weight parsing, material price resolution and the per-row engine.

pub mod engine;
pub mod price;
pub mod weight;

pub use engine::{
    compute, find_invalid_weights, normalize_box_keys, sort_by_box, UnknownMaterialPolicy,
    ValuationEngine,
};
pub use price::{normalize_material, resolve, resolve_material, AliasMap, PriceTable};
pub use weight::{
    is_valid_weight, parse_gemstone_weight, parse_total_weight, try_parse_total_weight,
    InvalidWeightError,
};
