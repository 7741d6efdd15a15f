//! Jewelcalc Status Tool
//!
//! Provides runtime status information about the valuation service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::PricingConfig;

/// Valuation workflow instructions for AI assistants
pub const VALUATION_INSTRUCTIONS: &str = r#"
# Jewelcalc Valuation Instructions

This guide explains how to estimate the material value of jewelry items.

## Input Files

**Items CSV** - one row per piece, required columns:
`box_id, box_no, material, misc, weight` (other columns are kept as-is)

**Prices CSV** - required columns: `material, price` (price per gram)

## Workflow

1. Call `check_weights` with the items file.
   - Every reported row has a weight that cannot be read as a number.
   - Show the user `index`, `box_id`, `box_no` and `weight`, and ask for corrections.
2. If nothing was reported, call `calculate_items`.
3. If rows were corrected, send the full corrected table as JSON records to
   `calculate_fixed` together with the price rows. Results are sorted by
   box_no, then box_id.

## How Values Are Computed

| Column | Meaning |
|--------|---------|
| total_weight | number before the first "g" of `weight` |
| gemstone_weight | estimate from `misc` tokens |
| material_weight | total_weight - gemstone_weight |
| material_price | unit price of `material` |
| jewelry_price | material_weight * material_price |

### Misc tokens
- `5mm` -> stone diameter, adds 5^3 / 700 g
- `0.3` -> carat value, adds 0.3 * 0.2 g
- tokens with `#`, `cm` or `%` are ignored (ring size, length, purity)

### Materials
- Matching is case-insensitive.
- `k18/pt900` is a blend: the mean of both prices, or 0 if either is unknown.
- Materials with no price entry get material_weight 0 and jewelry_price 0
  (unless the server runs with JEWELCALC_UNKNOWN_MATERIAL=subtract).
"#;

/// Status information
#[derive(Debug, Serialize)]
pub struct JewelcalcStatus {
    pub version: &'static str,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub aliases_path: Option<String>,
    pub alias_count: usize,
    pub unknown_material_policy: &'static str,
    pub output_dir: String,
}

/// Status tracker for the service
pub struct StatusTracker {
    start_time: Instant,
    started_at: String,
    config: PricingConfig,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(config: PricingConfig) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            config,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> JewelcalcStatus {
        let build_info = BuildInfo::current();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        JewelcalcStatus {
            version: build_info.version,
            started_at: self.started_at.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            aliases_path: self.config.aliases_path.as_ref().map(|p| p.display().to_string()),
            alias_count: self.config.alias_count(),
            unknown_material_policy: self.config.unknown_material_policy.as_str(),
            output_dir: self.config.output_dir.display().to_string(),
        }
    }
}
