//! Build information and startup banner
//!
//! Package name and version come from Cargo; the banner also reports how
//! the server will price materials.

use serde::Serialize;

use crate::config::PricingConfig;

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
        }
    }
}

/// Banner text: version, alias source and unknown-material policy
pub fn startup_banner(config: &PricingConfig) -> Vec<String> {
    let info = BuildInfo::current();
    let aliases = match &config.aliases_path {
        Some(path) => format!("{} ({} aliases)", path.display(), config.alias_count()),
        None => "none".to_string(),
    };
    vec![
        "===============================================".to_string(),
        "  Jewelcalc - Jewelry Material Valuation".to_string(),
        format!("  {} v{}", info.name, info.version),
        format!("  Alias map: {}", aliases),
        format!("  Unknown materials: {}", config.unknown_material_policy.as_str()),
        format!("  Output dir: {}", config.output_dir.display()),
        "===============================================".to_string(),
    ]
}

/// Print the startup banner to stderr
pub fn print_startup_banner(config: &PricingConfig) {
    for line in startup_banner(config) {
        eprintln!("{}", line);
    }
}
