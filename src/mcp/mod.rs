//! MCP module
//!
//! Model Context Protocol server exposing the valuation tools.

pub mod server;

pub use server::JewelcalcService;
