//! Jewelcalc
//!
//! An MCP server for jewelry material valuation.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use jewelcalc::build_info;
use jewelcalc::config::PricingConfig;
use jewelcalc::mcp::JewelcalcService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jewelcalc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load pricing configuration (alias map, unknown-material policy)
    let config = PricingConfig::from_env()?;

    // Print startup banner to stderr
    build_info::print_startup_banner(&config);
    eprintln!("Starting MCP server on stdio...");

    // Ensure output directory exists
    std::fs::create_dir_all(&config.output_dir)?;

    // Create the service
    let service = JewelcalcService::new(config);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
