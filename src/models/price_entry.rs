//! Price entry model
//!
//! One row of the per-material unit price table.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Unit price for a material (per gram)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    #[serde(default, deserialize_with = "deserialize_material")]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl PriceEntry {
    pub fn new(material: &str, price: f64) -> Self {
        Self {
            material: Some(material.to_string()),
            price,
        }
    }

    /// Build an entry from raw text cells, coercing the price
    pub fn from_cells(material: &str, price: &str) -> Self {
        let material = if material.is_empty() { None } else { Some(material.to_string()) };
        Self {
            material,
            price: coerce_price(price),
        }
    }
}

/// Parse a price cell; non-numeric, missing or non-finite values become 0
pub fn coerce_price(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

fn deserialize_material<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|p| p.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => coerce_price(&s),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_price() {
        assert_eq!(coerce_price("9500"), 9500.0);
        assert_eq!(coerce_price(" 12.5 "), 12.5);
        assert_eq!(coerce_price("n/a"), 0.0);
        assert_eq!(coerce_price(""), 0.0);
        assert_eq!(coerce_price("NaN"), 0.0);
    }

    #[test]
    fn test_deserialize_price_variants() {
        let rows: Vec<PriceEntry> = serde_json::from_value(serde_json::json!([
            {"material": "Gold", "price": 100},
            {"material": "silver", "price": "10.5"},
            {"material": "pt", "price": "ask"},
            {"material": "pd"}
        ]))
        .unwrap();

        assert_eq!(rows[0].price, 100.0);
        assert_eq!(rows[1].price, 10.5);
        assert_eq!(rows[2].price, 0.0);
        assert_eq!(rows[3].price, 0.0);
    }
}
