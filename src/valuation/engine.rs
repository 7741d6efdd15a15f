//! Valuation engine
//!
//! Applies weight parsing and price resolution to every item row and
//! assembles the augmented table. Row order is preserved.

use serde::{Deserialize, Serialize};

use crate::models::{ItemRecord, InvalidWeight, Valuation, ValuedItem};

use super::price::{resolve_material, AliasMap, PriceTable};
use super::weight::{is_valid_weight, parse_gemstone_weight, parse_total_weight};

/// What to do with items whose material has no price entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownMaterialPolicy {
    /// Force material weight and value to 0
    #[default]
    Zero,
    /// Subtract gemstone weight as usual and value at price 0
    Subtract,
}

impl UnknownMaterialPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownMaterialPolicy::Zero => "zero",
            UnknownMaterialPolicy::Subtract => "subtract",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "zero" => Some(UnknownMaterialPolicy::Zero),
            "subtract" => Some(UnknownMaterialPolicy::Subtract),
            _ => None,
        }
    }
}

/// Prices, aliases and policy for one computation
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    prices: PriceTable,
    aliases: Option<AliasMap>,
    policy: UnknownMaterialPolicy,
}

impl ValuationEngine {
    pub fn new(prices: PriceTable) -> Self {
        Self {
            prices,
            aliases: None,
            policy: UnknownMaterialPolicy::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: Option<AliasMap>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_policy(mut self, policy: UnknownMaterialPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Value a single item
    pub fn value_item(&self, item: &ItemRecord) -> ValuedItem {
        let total_weight = parse_total_weight(item.weight.as_deref());
        let gemstone_weight = parse_gemstone_weight(item.misc.as_deref());
        let resolved = resolve_material(item.material.as_deref(), &self.prices, self.aliases.as_ref());
        let material_price = resolved.unwrap_or(0.0);

        let (material_weight, jewelry_price) = match (resolved, self.policy) {
            (None, UnknownMaterialPolicy::Zero) => {
                tracing::debug!(material = ?item.material, "No price for material, valuing at 0");
                (0.0, 0.0)
            }
            _ => {
                let material_weight = total_weight - gemstone_weight;
                (material_weight, material_weight * material_price)
            }
        };

        ValuedItem {
            item: item.clone(),
            valuation: Valuation {
                jewelry_price,
                material_price,
                total_weight,
                gemstone_weight,
                material_weight,
            },
            material_known: resolved.is_some(),
        }
    }

    /// Value every item, one output row per input row in input order
    pub fn compute(&self, items: &[ItemRecord]) -> Vec<ValuedItem> {
        let valued: Vec<ValuedItem> = items.iter().map(|item| self.value_item(item)).collect();
        let unknown = valued.iter().filter(|v| !v.material_known).count();
        tracing::info!(rows = valued.len(), unknown_materials = unknown, "Valued items");
        valued
    }
}

/// Value items against a price table with the default unknown-material policy
pub fn compute(items: &[ItemRecord], prices: &PriceTable, aliases: Option<&AliasMap>) -> Vec<ValuedItem> {
    ValuationEngine::new(prices.clone())
        .with_aliases(aliases.cloned())
        .compute(items)
}

/// Stable sort by (box_no, box_id), both coerced to integers
pub fn sort_by_box(rows: &mut [ValuedItem]) {
    rows.sort_by_key(|row| (row.item.box_no_number(), row.item.box_id_number()));
}

/// Rewrite box_no and box_id as their integer form
pub fn normalize_box_keys(item: &mut ItemRecord) {
    item.box_id = Some(item.box_id_number().to_string());
    item.box_no = Some(item.box_no_number().to_string());
}

/// Rows whose weight field cannot be read as a number
pub fn find_invalid_weights(items: &[ItemRecord]) -> Vec<InvalidWeight> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !is_valid_weight(item.weight.as_deref()))
        .map(|(index, item)| {
            let weight = item.weight.clone().unwrap_or_default();
            tracing::warn!(index, weight = weight.as_str(), "Invalid weight");
            InvalidWeight {
                index,
                weight,
                box_id: item.box_id.clone().unwrap_or_default(),
                box_no: item.box_no.clone().unwrap_or_default(),
                row_data: item.to_row_data(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceEntry;

    fn item(material: &str, misc: &str, weight: &str) -> ItemRecord {
        let mut item = ItemRecord::default();
        item.set_cell("material", material);
        item.set_cell("misc", misc);
        item.set_cell("weight", weight);
        item
    }

    fn prices() -> PriceTable {
        PriceTable::from_entries(&[
            PriceEntry::new("gold", 50.0),
            PriceEntry::new("silver", 10.0),
            PriceEntry::new("resin", 0.0),
        ])
    }

    #[test]
    fn test_end_to_end_single_row() {
        let rows = compute(&[item("gold", "5mm", "10g")], &prices(), None);
        let v = rows[0].valuation;

        let gem = 125.0 / 700.0;
        assert_eq!(v.total_weight, 10.0);
        assert!((v.gemstone_weight - gem).abs() < 1e-12);
        assert!((v.material_weight - (10.0 - gem)).abs() < 1e-12);
        assert_eq!(v.material_price, 50.0);
        assert!((v.jewelry_price - (10.0 - gem) * 50.0).abs() < 1e-9);
        assert!((v.jewelry_price - 491.07).abs() < 0.01);
    }

    #[test]
    fn test_invariants_hold_for_known_materials() {
        let items = vec![
            item("gold", "0.3 5mm #12", "12.5g"),
            item("Silver", "", "3g"),
            item("resin", "2mm", "1g"),
            item("gold/silver", "1.0", "abc"),
        ];
        for row in compute(&items, &prices(), None) {
            let v = row.valuation;
            assert_eq!(v.material_weight, v.total_weight - v.gemstone_weight);
            assert_eq!(v.jewelry_price, v.material_weight * v.material_price);
        }
    }

    #[test]
    fn test_unknown_material_forced_to_zero() {
        let rows = compute(&[item("unknown", "", "10g")], &prices(), None);
        let v = rows[0].valuation;
        assert_eq!(v.total_weight, 10.0);
        assert_eq!(v.material_price, 0.0);
        assert_eq!(v.material_weight, 0.0);
        assert_eq!(v.jewelry_price, 0.0);
        assert!(!rows[0].material_known);
    }

    #[test]
    fn test_known_zero_price_keeps_weight() {
        let rows = compute(&[item("resin", "", "10g")], &prices(), None);
        let v = rows[0].valuation;
        assert_eq!(v.material_weight, 10.0);
        assert_eq!(v.jewelry_price, 0.0);
        assert!(rows[0].material_known);
    }

    #[test]
    fn test_subtract_policy_for_unknown_material() {
        let engine = ValuationEngine::new(prices()).with_policy(UnknownMaterialPolicy::Subtract);
        let rows = engine.compute(&[item("unknown", "0.5", "10g")]);
        let v = rows[0].valuation;
        assert!((v.material_weight - 9.9).abs() < 1e-12);
        assert_eq!(v.jewelry_price, 0.0);
    }

    #[test]
    fn test_unresolved_blend_is_unknown() {
        let rows = compute(&[item("gold/platinum", "", "10g")], &prices(), None);
        assert_eq!(rows[0].valuation.material_price, 0.0);
        assert_eq!(rows[0].valuation.material_weight, 0.0);

        let rows = compute(&[item("gold/silver", "", "10g")], &prices(), None);
        assert_eq!(rows[0].valuation.material_price, 30.0);
        assert_eq!(rows[0].valuation.jewelry_price, 300.0);
    }

    #[test]
    fn test_negative_material_weight_not_clamped() {
        let rows = compute(&[item("gold", "10mm", "1g")], &prices(), None);
        let v = rows[0].valuation;
        assert!(v.material_weight < 0.0);
        assert!(v.jewelry_price < 0.0);
    }

    #[test]
    fn test_row_order_preserved_and_idempotent() {
        let items: Vec<ItemRecord> = (0..20)
            .map(|i| {
                let mut it = item("gold", "", &format!("{}g", i));
                it.set_cell("box_id", &(20 - i).to_string());
                it
            })
            .collect();

        let first = compute(&items, &prices(), None);
        let second = compute(&items, &prices(), None);
        assert_eq!(first, second);
        for (i, row) in first.iter().enumerate() {
            assert_eq!(row.valuation.total_weight, i as f64);
        }
    }

    #[test]
    fn test_sort_by_box() {
        let mut a = item("gold", "", "1g");
        a.set_cell("box_no", "2");
        a.set_cell("box_id", "1");
        let mut b = item("gold", "", "2g");
        b.set_cell("box_no", "1");
        b.set_cell("box_id", "5");
        let mut c = item("gold", "", "3g");
        c.set_cell("box_no", "1");
        c.set_cell("box_id", "x");
        let mut d = item("gold", "", "4g");
        d.set_cell("box_no", "10");
        d.set_cell("box_id", "1");

        let mut rows = compute(&[a, b, c, d], &prices(), None);
        sort_by_box(&mut rows);
        let order: Vec<f64> = rows.iter().map(|r| r.valuation.total_weight).collect();
        assert_eq!(order, vec![3.0, 2.0, 1.0, 4.0]);
    }

    #[test]
    fn test_normalize_box_keys() {
        let mut it = item("gold", "", "1g");
        it.set_cell("box_id", "7.0");
        it.set_cell("box_no", "n/a");
        normalize_box_keys(&mut it);
        assert_eq!(it.box_id.as_deref(), Some("7"));
        assert_eq!(it.box_no.as_deref(), Some("0"));
    }

    #[test]
    fn test_find_invalid_weights() {
        let mut bad = item("gold", "", "abc");
        bad.set_cell("box_id", "4");
        let items = vec![item("gold", "", "10g"), bad, item("gold", "", ""), item("gold", "", "1.2.3")];

        let invalid = find_invalid_weights(&items);
        assert_eq!(invalid.len(), 2);
        assert_eq!(invalid[0].index, 1);
        assert_eq!(invalid[0].weight, "abc");
        assert_eq!(invalid[0].box_id, "4");
        assert_eq!(invalid[0].box_no, "");
        assert_eq!(invalid[0].row_data.get("material").map(String::as_str), Some("gold"));
        assert_eq!(invalid[1].index, 3);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(UnknownMaterialPolicy::from_str("Zero"), Some(UnknownMaterialPolicy::Zero));
        assert_eq!(UnknownMaterialPolicy::from_str("subtract"), Some(UnknownMaterialPolicy::Subtract));
        assert_eq!(UnknownMaterialPolicy::from_str("clamp"), None);
        assert_eq!(UnknownMaterialPolicy::default().as_str(), "zero");
    }
}
