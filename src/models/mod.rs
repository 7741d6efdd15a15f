//! Data models
//!
//! Rust structs representing the item, price and result tables.

mod item;
mod price_entry;
mod valuation;

pub use item::{
    coerce_box_key, value_to_cell, ItemRecord, BOX_ID, BOX_NO, MATERIAL, MISC,
    REQUIRED_ITEM_COLUMNS, WEIGHT,
};
pub use price_entry::{coerce_price, PriceEntry};
pub use valuation::{InvalidWeight, Valuation, ValuedItem, DERIVED_COLUMNS};
