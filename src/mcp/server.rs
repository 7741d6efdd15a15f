//! Jewelcalc MCP Server Implementation
//!
//! Implements the MCP server with all valuation tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::PricingConfig;
use crate::tools::status::StatusTracker;
use crate::tools::valuation;

/// Jewelcalc MCP Service
#[derive(Clone)]
pub struct JewelcalcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    config: Arc<PricingConfig>,
    tool_router: ToolRouter<JewelcalcService>,
}

impl JewelcalcService {
    pub fn new(config: PricingConfig) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.clone()))),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Valuation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateItemsParams {
    /// Full path to the items CSV (box_id, box_no, material, misc, weight)
    pub item_file: String,
    /// Full path to the prices CSV (material, price)
    pub price_file: String,
    /// Where to write the result (defaults to calculated_result.csv in the output directory)
    pub output_file: Option<String>,
    /// Sort rows by box_no, then box_id
    #[serde(default)]
    pub sort: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckWeightsParams {
    /// Full path to the items CSV
    pub item_file: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateFixedParams {
    /// Corrected item rows as JSON objects
    pub item_data: Vec<serde_json::Value>,
    /// Price rows as JSON objects with material and price
    pub price_data: Vec<serde_json::Value>,
    /// Where to write the result (defaults to calculated_result.csv in the output directory)
    pub output_file: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveMaterialPriceParams {
    /// Material name, alias or blend (e.g., "k18/pt900")
    pub material: String,
    /// Full path to the prices CSV
    pub price_file: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateWeightsParams {
    /// Raw weight field (e.g., "12.5g")
    pub weight: Option<String>,
    /// Misc descriptor with gemstone sizes (e.g., "0.3 5mm #12")
    pub misc: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl JewelcalcService {
    // --- Status ---

    #[tool(description = "Get the current status of the jewelcalc service including version, alias configuration, and process information")]
    async fn jewelcalc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for valuing jewelry inventory. Call this before the first calculation or when unsure how the columns are computed.")]
    fn valuation_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::VALUATION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(VALUATION_INSTRUCTIONS)]))
    }

    // --- Valuation ---

    #[tool(description = "Value every row of an items CSV against a prices CSV and write the result CSV with jewelry_price, material_price, total_weight, gemstone_weight and material_weight columns")]
    fn calculate_items(&self, Parameters(p): Parameters<CalculateItemsParams>) -> Result<CallToolResult, McpError> {
        let result = valuation::calculate_items(&self.config, &p.item_file, &p.price_file, p.output_file.as_deref(), p.sort)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List rows of an items CSV whose weight field cannot be read as a number. Blank weights are not reported.")]
    fn check_weights(&self, Parameters(p): Parameters<CheckWeightsParams>) -> Result<CallToolResult, McpError> {
        let result = valuation::check_weights(&p.item_file)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Value corrected item rows sent as JSON records. Box ids are normalized to integers and rows sorted by box_no, then box_id.")]
    fn calculate_fixed(&self, Parameters(p): Parameters<CalculateFixedParams>) -> Result<CallToolResult, McpError> {
        let result = valuation::calculate_fixed(&self.config, &p.item_data, &p.price_data, p.output_file.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Resolve the unit price of one material name, alias, or slash-separated blend against a prices CSV")]
    fn resolve_material_price(&self, Parameters(p): Parameters<ResolveMaterialPriceParams>) -> Result<CallToolResult, McpError> {
        let result = valuation::resolve_material_price(&self.config, &p.material, &p.price_file)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Parse a single weight field and misc descriptor into total, gemstone and material weight")]
    fn estimate_weights(&self, Parameters(p): Parameters<EstimateWeightsParams>) -> Result<CallToolResult, McpError> {
        let result = valuation::estimate_weights(p.weight.as_deref(), p.misc.as_deref());
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for JewelcalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "jewelcalc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Jewelry Material Valuation".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Jewelcalc - material value estimates for jewelry inventory. \
                 Call valuation_instructions first. \
                 Files: check_weights, then calculate_items. \
                 Corrections: calculate_fixed with JSON rows. \
                 Single values: resolve_material_price, estimate_weights. \
                 Status: jewelcalc_status."
                    .into(),
            ),
        }
    }
}
