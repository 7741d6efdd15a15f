//! Table readers
//!
//! Loads item and price tables from delimited text or JSON records and
//! checks that the columns the engine needs are present.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::models::{ItemRecord, PriceEntry, REQUIRED_ITEM_COLUMNS};
use crate::valuation::AliasMap;

use super::{TableError, TableResult};

/// Columns a price table must carry
pub const REQUIRED_PRICE_COLUMNS: [&str; 2] = ["material", "price"];

/// An item table with its column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTable {
    /// Column names in the order they were supplied
    pub columns: Vec<String>,
    pub rows: Vec<ItemRecord>,
}

impl ItemTable {
    /// Build from JSON records (e.g. corrected rows sent back by a client)
    ///
    /// Records may omit columns; missing values are treated as null.
    pub fn from_json_rows(records: &[Value]) -> TableResult<Self> {
        let mut columns: Vec<String> = REQUIRED_ITEM_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or(TableError::NotARecord { table: "item", index })?;
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            rows.push(serde_json::from_value(record.clone())?);
        }

        Ok(Self { columns, rows })
    }
}

/// Strip a UTF-8 byte-order mark and surrounding whitespace from a header
fn clean_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_string()
}

fn read_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    table: &'static str,
    required: &[&'static str],
) -> TableResult<Vec<String>> {
    let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(TableError::MissingColumn { table, column });
        }
    }
    Ok(headers)
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(input)
}

/// Read an item table from CSV
///
/// Short rows leave the trailing columns missing; rows with more fields
/// than the header are rejected.
pub fn read_items<R: Read>(input: R) -> TableResult<ItemTable> {
    let mut reader = csv_reader(input);
    let columns = read_headers(&mut reader, "item", &REQUIRED_ITEM_COLUMNS)?;

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(TableError::RowTooLong {
                table: "item",
                row,
                fields: record.len(),
                expected: columns.len(),
            });
        }
        let mut item = ItemRecord::default();
        for (column, field) in columns.iter().zip(record.iter()) {
            item.set_cell(column, field);
        }
        rows.push(item);
    }

    tracing::debug!(rows = rows.len(), columns = columns.len(), "Read item table");
    Ok(ItemTable { columns, rows })
}

/// Read a price table from CSV; extra columns are ignored
pub fn read_prices<R: Read>(input: R) -> TableResult<Vec<PriceEntry>> {
    let mut reader = csv_reader(input);
    let headers = read_headers(&mut reader, "price", &REQUIRED_PRICE_COLUMNS)?;
    let position = |name: &str| headers.iter().position(|h| h == name);
    let (material_idx, price_idx) = match (position("material"), position("price")) {
        (Some(m), Some(p)) => (m, p),
        (None, _) => return Err(TableError::MissingColumn { table: "price", column: "material" }),
        (_, None) => return Err(TableError::MissingColumn { table: "price", column: "price" }),
    };

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let material = record.get(material_idx).unwrap_or_default();
        let price = record.get(price_idx).unwrap_or_default();
        entries.push(PriceEntry::from_cells(material, price));
    }

    tracing::debug!(entries = entries.len(), "Read price table");
    Ok(entries)
}

/// Read price rows from JSON records
pub fn prices_from_json_rows(records: &[Value]) -> TableResult<Vec<PriceEntry>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            if !record.is_object() {
                return Err(TableError::NotARecord { table: "price", index });
            }
            Ok(serde_json::from_value(record.clone())?)
        })
        .collect()
}

pub fn read_items_file<P: AsRef<Path>>(path: P) -> TableResult<ItemTable> {
    read_items(File::open(path)?)
}

pub fn read_prices_file<P: AsRef<Path>>(path: P) -> TableResult<Vec<PriceEntry>> {
    read_prices(File::open(path)?)
}

/// Load an alias file of the form `{"canonical": ["alias", ...]}`
pub fn read_aliases_file<P: AsRef<Path>>(path: P) -> TableResult<AliasMap> {
    let content = std::fs::read_to_string(path)?;
    let groups: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
    Ok(AliasMap::from_groups(&groups))
}
