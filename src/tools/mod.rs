//! Jewelcalc Tools module
//!
//! MCP tool implementations for the valuation service.

pub mod status;
pub mod valuation;
