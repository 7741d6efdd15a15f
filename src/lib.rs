//! Jewelcalc Library
//!
//! Material valuation of jewelry inventory from free-text weight, material
//! and gemstone fields.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod table;
pub mod tools;
pub mod valuation;
