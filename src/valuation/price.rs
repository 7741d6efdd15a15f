//! Material price resolution
//!
//! Maps a material field (possibly an alias or a "a/b" blend) to a unit
//! price using a caller-supplied price table and optional alias map.

use std::collections::{BTreeMap, HashMap};

use crate::models::PriceEntry;

/// Separator between sub-materials of a blend
pub const BLEND_SEPARATOR: char = '/';

/// Case-insensitive material -> unit price lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    /// Build from price rows; keys are lowercased and the last duplicate wins
    pub fn from_entries(entries: &[PriceEntry]) -> Self {
        let prices = entries
            .iter()
            .filter_map(|e| {
                e.material
                    .as_deref()
                    .map(|m| (normalize_material(m), e.price))
            })
            .collect();
        Self { prices }
    }

    /// Price for an already-normalized material name
    pub fn get(&self, material: &str) -> Option<f64> {
        self.prices.get(material).copied()
    }
}

/// Alias -> canonical material name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasMap {
    aliases: HashMap<String, String>,
}

impl AliasMap {
    /// Build from the canonical -> aliases form used in alias files
    pub fn from_groups(groups: &BTreeMap<String, Vec<String>>) -> Self {
        let mut aliases = HashMap::new();
        for (canonical, names) in groups {
            let canonical = normalize_material(canonical);
            for name in names {
                aliases.insert(normalize_material(name), canonical.clone());
            }
        }
        Self { aliases }
    }

    /// Canonical form of a normalized name (unchanged when no alias exists)
    pub fn canonical<'a>(&'a self, material: &'a str) -> &'a str {
        self.aliases.get(material).map(String::as_str).unwrap_or(material)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Trim and lowercase a material name
pub fn normalize_material(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Look up a material field, distinguishing unknown from priced-at-zero
///
/// Returns `None` when the field is missing/blank, when a single material is
/// not in the table, or when any part of a blend is not in the table.
pub fn resolve_material(
    material: Option<&str>,
    prices: &PriceTable,
    aliases: Option<&AliasMap>,
) -> Option<f64> {
    let normalized = normalize_material(material?);
    if normalized.is_empty() {
        return None;
    }

    if normalized.contains(BLEND_SEPARATOR) {
        return resolve_blend(&normalized, prices, aliases);
    }

    lookup(&normalized, prices, aliases)
}

/// Unit price for a material field; unknown materials price at 0
pub fn resolve(material: Option<&str>, prices: &PriceTable, aliases: Option<&AliasMap>) -> f64 {
    resolve_material(material, prices, aliases).unwrap_or(0.0)
}

/// Direct price key first; the alias map only widens names with no entry
fn lookup(name: &str, prices: &PriceTable, aliases: Option<&AliasMap>) -> Option<f64> {
    prices
        .get(name)
        .or_else(|| aliases.and_then(|map| prices.get(map.canonical(name))))
}

/// Mean of the part prices, only if every part is known
fn resolve_blend(field: &str, prices: &PriceTable, aliases: Option<&AliasMap>) -> Option<f64> {
    let parts: Vec<String> = field.split(BLEND_SEPARATOR).map(normalize_material).collect();

    let mut total = 0.0;
    for part in &parts {
        match lookup(part, prices, aliases) {
            Some(price) => total += price,
            None => {
                tracing::debug!(blend = field, part = part.as_str(), "Blend part has no price");
                return None;
            }
        }
    }

    Some(total / parts.len() as f64)
}
