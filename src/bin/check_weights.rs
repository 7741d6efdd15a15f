//! Report item rows whose weight field cannot be parsed
//! Usage: cargo run --bin check_weights -- <items.csv>

use jewelcalc::tools::valuation;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("jewelcalc=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(item_file) = args.get(1) else {
        eprintln!("Usage: check_weights <items.csv>");
        std::process::exit(2);
    };

    let result = valuation::check_weights(item_file)?;
    println!("Checked {} rows", result.total_rows);

    if result.invalid_weights.is_empty() {
        println!("All weights are valid");
        return Ok(());
    }

    println!("{} invalid weights:", result.invalid_weights.len());
    for invalid in &result.invalid_weights {
        println!(
            "  Row {}: box_id={} box_no={} weight={:?}",
            invalid.index, invalid.box_id, invalid.box_no, invalid.weight
        );
    }
    std::process::exit(1);
}
