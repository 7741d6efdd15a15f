//! Weight parsing
//!
//! Reads total weight from a raw weight field ("12.5g") and estimates
//! gemstone weight from the free-text misc descriptor ("0.3 5mm #12").

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Carat to gram conversion
pub const GRAMS_PER_CARAT: f64 = 0.2;

/// Divisor turning a cubed stone diameter (mm) into an approximate weight
pub const MM_CUBED_PER_GRAM: f64 = 700.0;

/// Substrings marking a misc token as a non-gemstone annotation
/// (ring size "#12", length "45cm", purity "5%")
const SKIP_MARKERS: [&str; 3] = ["#", "cm", "%"];

/// A weight field that cannot be read as a number
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid weight '{raw}': no numeric value after cleaning (got '{cleaned}')")]
pub struct InvalidWeightError {
    pub raw: String,
    pub cleaned: String,
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid"))
}

/// Read a matched numeric run, folding full-width digits (U+FF10..U+FF19)
/// to ASCII so inventory text typed with an IME still counts
fn parse_number(run: &str) -> Option<f64> {
    let ascii: String = run
        .chars()
        .map(|c| match c {
            '\u{ff10}'..='\u{ff19}' => char::from(b'0' + (c as u32 - 0xff10) as u8),
            _ => c,
        })
        .collect();
    ascii.parse().ok()
}

/// Keep only digits and decimal points from the part before the first 'g'
fn clean_weight(raw: &str) -> String {
    let head = raw.split('g').next().unwrap_or_default();
    head.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Parse a weight field strictly
///
/// Missing or blank fields are a legitimate zero. Anything else must clean
/// down to a parseable number.
pub fn try_parse_total_weight(raw: Option<&str>) -> Result<f64, InvalidWeightError> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Ok(0.0),
    };

    let cleaned = clean_weight(raw);
    cleaned.parse::<f64>().map_err(|_| InvalidWeightError {
        raw: raw.to_string(),
        cleaned,
    })
}

/// Parse a weight field, degrading to 0 on malformed input
///
/// Examples:
/// - "12.5g" -> 12.5
/// - "12.5g extra" -> 12.5
/// - "1,234 g" -> 1234.0
/// - "abc" -> 0.0
pub fn parse_total_weight(raw: Option<&str>) -> f64 {
    try_parse_total_weight(raw).unwrap_or(0.0)
}

/// Whether a weight field can be read as a number
///
/// Agrees exactly with `parse_total_weight`: a field is invalid only when
/// the strict parse fails.
pub fn is_valid_weight(raw: Option<&str>) -> bool {
    try_parse_total_weight(raw).is_ok()
}

/// Estimate gemstone weight (grams) from a misc descriptor
///
/// Each whitespace-separated token contributes independently:
/// - tokens containing "#", "cm" or "%" are skipped
/// - "<n>mm" is a stone diameter: n^3 / 700
/// - a number with a decimal point is a carat value: n * 0.2
/// - anything else is ignored
pub fn parse_gemstone_weight(misc: Option<&str>) -> f64 {
    let Some(misc) = misc else {
        return 0.0;
    };

    misc.split_whitespace().map(token_gemstone_weight).sum()
}

fn token_gemstone_weight(token: &str) -> f64 {
    if SKIP_MARKERS.iter().any(|marker| token.contains(marker)) {
        return 0.0;
    }

    let Some(num) = number_pattern()
        .find(token)
        .and_then(|m| parse_number(m.as_str()))
    else {
        return 0.0;
    };

    if token.contains("mm") {
        num.powi(3) / MM_CUBED_PER_GRAM
    } else if token.contains('.') {
        num * GRAMS_PER_CARAT
    } else {
        0.0
    }
}
