//! Value an items CSV against a prices CSV from the command line
//! Usage: cargo run --bin calculate_csv -- <items.csv> <prices.csv> [output.csv] [--sort]

use jewelcalc::config::PricingConfig;
use jewelcalc::tools::valuation;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let sort = args.iter().any(|a| a == "--sort");
    let positional: Vec<&str> = args.iter().filter(|a| !a.starts_with("--")).map(|s| s.as_str()).collect();

    let (item_file, price_file) = match positional.as_slice() {
        [items, prices, ..] => (*items, *prices),
        _ => {
            eprintln!("Usage: calculate_csv <items.csv> <prices.csv> [output.csv] [--sort]");
            std::process::exit(2);
        }
    };
    let output_file = positional.get(2).copied();

    let config = PricingConfig::from_env()?;
    let result = valuation::calculate_items(&config, item_file, price_file, output_file, sort)?;

    println!("Output: {}", result.output_path);
    println!("Rows: {} ({} valued)", result.rows, result.valued_rows);
    println!("Total material value: {:.2}", result.total_value);
    if !result.unknown_materials.is_empty() {
        println!("Materials without a price:");
        for material in &result.unknown_materials {
            println!("  {}", material);
        }
    }

    Ok(())
}
