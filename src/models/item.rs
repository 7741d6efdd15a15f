//! Item model
//!
//! Represents one inventory row as supplied by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Column names the engine reads from an item table
pub const BOX_ID: &str = "box_id";
pub const BOX_NO: &str = "box_no";
pub const MATERIAL: &str = "material";
pub const MISC: &str = "misc";
pub const WEIGHT: &str = "weight";

/// Columns an item table must carry
pub const REQUIRED_ITEM_COLUMNS: [&str; 5] = [BOX_ID, BOX_NO, MATERIAL, MISC, WEIGHT];

/// One inventory row
///
/// Known columns are kept as raw text; anything else the caller supplied is
/// carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemRecord {
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub box_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub box_no: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub misc: Option<String>,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub weight: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ItemRecord {
    /// Numeric box id (non-numeric or missing coerces to 0)
    pub fn box_id_number(&self) -> i64 {
        coerce_box_key(self.box_id.as_deref())
    }

    /// Numeric box number (non-numeric or missing coerces to 0)
    pub fn box_no_number(&self) -> i64 {
        coerce_box_key(self.box_no.as_deref())
    }

    /// Get a column value as text, empty string for missing values
    pub fn cell(&self, column: &str) -> String {
        let known = match column {
            BOX_ID => Some(&self.box_id),
            BOX_NO => Some(&self.box_no),
            MATERIAL => Some(&self.material),
            MISC => Some(&self.misc),
            WEIGHT => Some(&self.weight),
            _ => None,
        };

        match known {
            Some(value) => value.clone().unwrap_or_default(),
            None => self.extra.get(column).map(value_to_cell).unwrap_or_default(),
        }
    }

    /// Set a column value from text; empty text is stored as missing
    pub fn set_cell(&mut self, column: &str, raw: &str) {
        let value = if raw.is_empty() { None } else { Some(raw.to_string()) };
        match column {
            BOX_ID => self.box_id = value,
            BOX_NO => self.box_no = value,
            MATERIAL => self.material = value,
            MISC => self.misc = value,
            WEIGHT => self.weight = value,
            _ => {
                let cell = value.map(Value::String).unwrap_or(Value::Null);
                self.extra.insert(column.to_string(), cell);
            }
        }
    }

    /// All columns as a flat map with missing values replaced by ""
    pub fn to_row_data(&self) -> BTreeMap<String, String> {
        let mut data: BTreeMap<String, String> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), value_to_cell(v)))
            .collect();
        for column in REQUIRED_ITEM_COLUMNS {
            data.insert(column.to_string(), self.cell(column));
        }
        data
    }
}

/// Coerce an identifier to an integer the way a spreadsheet would:
/// parse as a number, truncate any fraction, fall back to 0.
pub fn coerce_box_key(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
        .unwrap_or(0)
}

/// Render a JSON cell as delimited-text content
pub fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accept strings, numbers, booleans or null for a text column
fn deserialize_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(value_to_cell(&v)),
    })
}
