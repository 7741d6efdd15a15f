//! Pricing configuration
//!
//! Reads alias file location, unknown-material policy and output directory
//! from the environment. The alias file is loaded once and handed to the
//! engine explicitly.

use std::path::PathBuf;

use crate::table::{read_aliases_file, TableResult};
use crate::valuation::{AliasMap, UnknownMaterialPolicy};

pub const ALIASES_PATH_VAR: &str = "JEWELCALC_ALIASES_PATH";
pub const UNKNOWN_MATERIAL_VAR: &str = "JEWELCALC_UNKNOWN_MATERIAL";
pub const OUTPUT_DIR_VAR: &str = "JEWELCALC_OUTPUT_DIR";

/// Default file name for calculation results
pub const DEFAULT_OUTPUT_FILE: &str = "calculated_result.csv";

/// Settings shared by every valuation request
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub aliases_path: Option<PathBuf>,
    pub aliases: Option<AliasMap>,
    pub unknown_material_policy: UnknownMaterialPolicy,
    pub output_dir: PathBuf,
}

impl PricingConfig {
    /// Build from environment variables, loading the alias file if one is set
    pub fn from_env() -> TableResult<Self> {
        let aliases_path = std::env::var(ALIASES_PATH_VAR).ok().map(PathBuf::from);
        let policy = std::env::var(UNKNOWN_MATERIAL_VAR).ok();
        let output_dir = std::env::var(OUTPUT_DIR_VAR).ok().map(PathBuf::from);
        Self::load(aliases_path, policy.as_deref(), output_dir)
    }

    /// Build from explicit settings
    pub fn load(
        aliases_path: Option<PathBuf>,
        policy: Option<&str>,
        output_dir: Option<PathBuf>,
    ) -> TableResult<Self> {
        let aliases = match &aliases_path {
            Some(path) => {
                let map = read_aliases_file(path)?;
                if map.is_empty() {
                    tracing::warn!(path = %path.display(), "Alias file has no entries");
                }
                tracing::info!(path = %path.display(), aliases = map.len(), "Loaded alias map");
                Some(map)
            }
            None => None,
        };

        let unknown_material_policy = match policy {
            Some(raw) => UnknownMaterialPolicy::from_str(raw).unwrap_or_else(|| {
                tracing::warn!(value = raw, "Unrecognized unknown-material policy, using 'zero'");
                UnknownMaterialPolicy::Zero
            }),
            None => UnknownMaterialPolicy::Zero,
        };

        Ok(Self {
            aliases_path,
            aliases,
            unknown_material_policy,
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Resolve where a result file goes
    pub fn output_path(&self, requested: Option<&str>) -> PathBuf {
        match requested {
            Some(path) => PathBuf::from(path),
            None => self.output_dir.join(DEFAULT_OUTPUT_FILE),
        }
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.as_ref().map(AliasMap::len).unwrap_or(0)
    }
}
