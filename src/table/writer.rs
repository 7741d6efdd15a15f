//! Table writer
//!
//! Serializes valued rows as CSV: the caller's columns first, then the
//! derived valuation columns.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::{ValuedItem, DERIVED_COLUMNS};

use super::TableResult;

/// UTF-8 byte-order mark so spreadsheet apps detect the encoding
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column dropped from output (row bookkeeping added by correction clients)
pub const ORIGINAL_INDEX_COLUMN: &str = "original_index";

/// Render a derived value the way a float column is written: whole numbers
/// keep a trailing ".0"
fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// Write valued rows as CSV, prefixed with a UTF-8 BOM
pub fn write_valued<W: Write>(mut output: W, columns: &[String], rows: &[ValuedItem]) -> TableResult<()> {
    output.write_all(UTF8_BOM)?;

    let columns: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| !DERIVED_COLUMNS.contains(c))
        .collect();

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(columns.iter().copied().chain(DERIVED_COLUMNS))?;

    for row in rows {
        let mut record: Vec<String> = columns.iter().map(|c| row.item.cell(c)).collect();
        record.extend(row.valuation.columns().into_iter().map(format_value));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_valued_file<P: AsRef<Path>>(path: P, columns: &[String], rows: &[ValuedItem]) -> TableResult<()> {
    write_valued(File::create(path)?, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemRecord, Valuation};

    fn row(box_id: &str, weight: &str, value: f64) -> ValuedItem {
        let mut item = ItemRecord::default();
        item.set_cell("box_id", box_id);
        item.set_cell("weight", weight);
        item.set_cell("note", "a,b");
        ValuedItem {
            item,
            valuation: Valuation {
                jewelry_price: value,
                material_price: 10.0,
                total_weight: 2.5,
                gemstone_weight: 0.0,
                material_weight: 2.5,
            },
            material_known: true,
        }
    }

    #[test]
    fn test_write_valued() {
        let columns: Vec<String> = ["box_id", "note", "weight"].iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        write_valued(&mut out, &columns, &[row("1", "2.5g", 25.0)]).unwrap();

        assert!(out.starts_with(UTF8_BOM));
        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "box_id,note,weight,jewelry_price,material_price,total_weight,gemstone_weight,material_weight"
        );
        assert_eq!(lines[1], "1,\"a,b\",2.5g,25.0,10.0,2.5,0.0,2.5");
    }

    #[test]
    fn test_format_value_keeps_float_form() {
        assert_eq!(format_value(25.0), "25.0");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(125.0 / 700.0), "0.17857142857142858");
    }

    #[test]
    fn test_write_valued_replaces_stale_derived_columns() {
        let columns: Vec<String> = ["box_id", "jewelry_price"].iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        write_valued(&mut out, &columns, &[row("1", "", 0.0)]).unwrap();

        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header.matches("jewelry_price").count(), 1);
    }
}
