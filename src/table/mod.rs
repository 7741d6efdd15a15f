//! Table module
//!
//! Handles the delimited-text and JSON boundary around the engine.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{TableError, TableResult};
pub use reader::{
    prices_from_json_rows, read_aliases_file, read_items, read_items_file, read_prices,
    read_prices_file, ItemTable, REQUIRED_PRICE_COLUMNS,
};
pub use writer::{write_valued, write_valued_file, ORIGINAL_INDEX_COLUMN};
