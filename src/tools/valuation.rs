//! Valuation MCP Tools
//!
//! Tools for valuing item tables, checking weights and resolving prices.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::config::PricingConfig;
use crate::models::{InvalidWeight, PriceEntry, ValuedItem};
use crate::table::{self, ItemTable, ORIGINAL_INDEX_COLUMN};
use crate::valuation::{
    find_invalid_weights, normalize_box_keys, normalize_material, parse_gemstone_weight,
    parse_total_weight, resolve_material, sort_by_box, try_parse_total_weight, PriceTable,
    ValuationEngine,
};

/// Response for calculate_items and calculate_fixed
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub output_path: String,
    pub rows: usize,
    pub valued_rows: usize,
    pub total_value: f64,
    /// Distinct material names with no price entry
    pub unknown_materials: Vec<String>,
    pub sorted: bool,
}

/// Response for check_weights
#[derive(Debug, Serialize)]
pub struct CheckWeightsResponse {
    pub invalid_weights: Vec<InvalidWeight>,
    pub total_rows: usize,
}

/// Response for resolve_material_price
#[derive(Debug, Serialize)]
pub struct ResolvePriceResponse {
    pub material: String,
    pub normalized: String,
    pub price: f64,
    pub known: bool,
}

/// Response for estimate_weights
#[derive(Debug, Serialize)]
pub struct EstimateWeightsResponse {
    pub total_weight: f64,
    pub gemstone_weight: f64,
    pub material_weight: f64,
    pub valid_weight: bool,
    pub error: Option<String>,
}

fn build_engine(config: &PricingConfig, entries: &[PriceEntry]) -> ValuationEngine {
    ValuationEngine::new(PriceTable::from_entries(entries))
        .with_aliases(config.aliases.clone())
        .with_policy(config.unknown_material_policy)
}

fn summarize(rows: &[ValuedItem], output_path: &Path, sorted: bool) -> CalculateResponse {
    let unknown_materials: BTreeSet<String> = rows
        .iter()
        .filter(|r| !r.material_known)
        .filter_map(|r| r.item.material.clone())
        .collect();

    CalculateResponse {
        success: true,
        output_path: output_path.display().to_string(),
        rows: rows.len(),
        valued_rows: rows.iter().filter(|r| r.material_known).count(),
        total_value: rows.iter().map(|r| r.valuation.jewelry_price).sum(),
        unknown_materials: unknown_materials.into_iter().collect(),
        sorted,
    }
}

/// Value an items CSV against a prices CSV and write the augmented table
pub fn calculate_items(
    config: &PricingConfig,
    item_file: &str,
    price_file: &str,
    output_file: Option<&str>,
    sort: bool,
) -> Result<CalculateResponse, String> {
    let items = table::read_items_file(item_file)
        .map_err(|e| format!("Failed to read item file '{}': {}", item_file, e))?;
    let prices = table::read_prices_file(price_file)
        .map_err(|e| format!("Failed to read price file '{}': {}", price_file, e))?;

    let mut rows = build_engine(config, &prices).compute(&items.rows);
    if sort {
        sort_by_box(&mut rows);
    }

    let output_path = config.output_path(output_file);
    table::write_valued_file(&output_path, &items.columns, &rows)
        .map_err(|e| format!("Failed to write '{}': {}", output_path.display(), e))?;

    tracing::info!(rows = rows.len(), output = %output_path.display(), "Wrote valuation result");
    Ok(summarize(&rows, &output_path, sort))
}

/// Report rows of an items CSV whose weight cannot be parsed
pub fn check_weights(item_file: &str) -> Result<CheckWeightsResponse, String> {
    let items = table::read_items_file(item_file)
        .map_err(|e| format!("Failed to read item file '{}': {}", item_file, e))?;
    Ok(check_item_weights(&items))
}

pub fn check_item_weights(items: &ItemTable) -> CheckWeightsResponse {
    CheckWeightsResponse {
        invalid_weights: find_invalid_weights(&items.rows),
        total_rows: items.rows.len(),
    }
}

/// Value corrected rows submitted as JSON records
///
/// Blank weights count as missing. Box keys are rewritten as integers and
/// rows sorted by (box_no, box_id) before writing.
pub fn calculate_fixed(
    config: &PricingConfig,
    item_data: &[Value],
    price_data: &[Value],
    output_file: Option<&str>,
) -> Result<CalculateResponse, String> {
    let mut items = ItemTable::from_json_rows(item_data)
        .map_err(|e| format!("Invalid item data: {}", e))?;
    let prices = table::prices_from_json_rows(price_data)
        .map_err(|e| format!("Invalid price data: {}", e))?;

    for item in &mut items.rows {
        if item.weight.as_deref().is_some_and(|w| w.trim().is_empty()) {
            item.weight = None;
        }
    }

    let mut rows = build_engine(config, &prices).compute(&items.rows);
    for row in &mut rows {
        normalize_box_keys(&mut row.item);
        row.item.extra.remove(ORIGINAL_INDEX_COLUMN);
    }
    sort_by_box(&mut rows);

    let columns: Vec<String> = items
        .columns
        .into_iter()
        .filter(|c| c != ORIGINAL_INDEX_COLUMN)
        .collect();

    let output_path = config.output_path(output_file);
    table::write_valued_file(&output_path, &columns, &rows)
        .map_err(|e| format!("Failed to write '{}': {}", output_path.display(), e))?;

    tracing::info!(rows = rows.len(), output = %output_path.display(), "Wrote corrected valuation result");
    Ok(summarize(&rows, &output_path, true))
}

/// Resolve one material name against a prices CSV
pub fn resolve_material_price(
    config: &PricingConfig,
    material: &str,
    price_file: &str,
) -> Result<ResolvePriceResponse, String> {
    let entries = table::read_prices_file(price_file)
        .map_err(|e| format!("Failed to read price file '{}': {}", price_file, e))?;
    let prices = PriceTable::from_entries(&entries);

    let resolved = resolve_material(Some(material), &prices, config.aliases.as_ref());
    Ok(ResolvePriceResponse {
        material: material.to_string(),
        normalized: normalize_material(material),
        price: resolved.unwrap_or(0.0),
        known: resolved.is_some(),
    })
}

/// Parse a single weight / misc pair
pub fn estimate_weights(weight: Option<&str>, misc: Option<&str>) -> EstimateWeightsResponse {
    let strict = try_parse_total_weight(weight);
    let total_weight = parse_total_weight(weight);
    let gemstone_weight = parse_gemstone_weight(misc);

    EstimateWeightsResponse {
        total_weight,
        gemstone_weight,
        material_weight: total_weight - gemstone_weight,
        valid_weight: strict.is_ok(),
        error: strict.err().map(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn read_result(path: &str) -> String {
        let bytes = fs::read(path).unwrap();
        String::from_utf8(bytes[3..].to_vec()).unwrap()
    }

    #[test]
    fn test_calculate_items_writes_result() {
        let dir = tempfile::tempdir().unwrap();
        let items = write(
            dir.path(),
            "items.csv",
            "box_id,box_no,material,misc,weight\n2,1,Gold,5mm,10g\n1,1,unobtainium,,3g\n",
        );
        let prices = write(dir.path(), "prices.csv", "material,price\ngold,50\n");
        let output = dir.path().join("out.csv").display().to_string();

        let config = PricingConfig::default();
        let resp = calculate_items(&config, &items, &prices, Some(&output), false).unwrap();

        assert_eq!(resp.rows, 2);
        assert_eq!(resp.valued_rows, 1);
        assert_eq!(resp.unknown_materials, vec!["unobtainium".to_string()]);
        assert!((resp.total_value - (10.0 - 125.0 / 700.0) * 50.0).abs() < 1e-9);

        let text = read_result(&output);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2,1,Gold,5mm,10g,"));
        assert_eq!(lines[2], "1,1,unobtainium,,3g,0.0,0.0,3.0,0.0,0.0");
    }

    #[test]
    fn test_calculate_items_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let items = write(
            dir.path(),
            "items.csv",
            "box_id,box_no,material,misc,weight\n2,1,gold,,1g\n1,1,gold,,2g\n",
        );
        let prices = write(dir.path(), "prices.csv", "material,price\ngold,1\n");
        let output = dir.path().join("out.csv").display().to_string();

        calculate_items(&PricingConfig::default(), &items, &prices, Some(&output), true).unwrap();
        let text = read_result(&output);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("1,1,gold,,2g"));
    }

    #[test]
    fn test_calculate_items_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let items = write(dir.path(), "items.csv", "box_id,material,weight\n1,gold,1g\n");
        let prices = write(dir.path(), "prices.csv", "material,price\ngold,1\n");

        let err = calculate_items(&PricingConfig::default(), &items, &prices, None, false).unwrap_err();
        assert!(err.contains("box_no"));
    }

    #[test]
    fn test_check_weights() {
        let dir = tempfile::tempdir().unwrap();
        let items = write(
            dir.path(),
            "items.csv",
            "box_id,box_no,material,misc,weight\n1,1,gold,,10g\n2,1,gold,,abc\n3,1,gold,,\n",
        );

        let resp = check_weights(&items).unwrap();
        assert_eq!(resp.total_rows, 3);
        assert_eq!(resp.invalid_weights.len(), 1);
        assert_eq!(resp.invalid_weights[0].index, 1);
        assert_eq!(resp.invalid_weights[0].box_id, "2");
    }

    #[test]
    fn test_calculate_fixed_sorts_and_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("fixed.csv").display().to_string();

        let item_data = vec![
            serde_json::json!({"box_id": "5", "box_no": "2", "material": "gold", "misc": "", "weight": "4g", "original_index": 0}),
            serde_json::json!({"box_id": 1.0, "box_no": "x", "material": "gold", "misc": "", "weight": " ", "original_index": 1}),
        ];
        let price_data = vec![serde_json::json!({"material": "Gold", "price": "10"})];

        let resp = calculate_fixed(&PricingConfig::default(), &item_data, &price_data, Some(&output)).unwrap();
        assert!(resp.sorted);
        assert_eq!(resp.total_value, 40.0);

        let text = read_result(&output);
        let lines: Vec<&str> = text.lines().collect();
        assert!(!lines[0].contains(ORIGINAL_INDEX_COLUMN));
        assert_eq!(lines[1], "1,0,gold,,,0.0,10.0,0.0,0.0,0.0");
        assert_eq!(lines[2], "5,2,gold,,4g,40.0,10.0,4.0,0.0,4.0");
    }

    #[test]
    fn test_resolve_material_price() {
        let dir = tempfile::tempdir().unwrap();
        let prices = write(dir.path(), "prices.csv", "material,price\ngold,100\nsilver,10\n");

        let resp = resolve_material_price(&PricingConfig::default(), " Gold/Silver ", &prices).unwrap();
        assert_eq!(resp.normalized, "gold/silver");
        assert_eq!(resp.price, 55.0);
        assert!(resp.known);

        let resp = resolve_material_price(&PricingConfig::default(), "gold/platinum", &prices).unwrap();
        assert_eq!(resp.price, 0.0);
        assert!(!resp.known);
    }

    #[test]
    fn test_estimate_weights() {
        let resp = estimate_weights(Some("10g"), Some("#7 0.5"));
        assert_eq!(resp.total_weight, 10.0);
        assert!((resp.gemstone_weight - 0.1).abs() < 1e-12);
        assert!(resp.valid_weight);
        assert!(resp.error.is_none());

        let resp = estimate_weights(Some("heavy"), None);
        assert_eq!(resp.total_weight, 0.0);
        assert!(!resp.valid_weight);
        assert!(resp.error.is_some());
    }
}
