use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::debug;
use sleep_fit::scrape;
use std::path::PathBuf;

/// Fetch daily humidity/temperature figures from the JMA observation page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Year to fetch (e.g. 2025)
    year: i32,

    /// Month to fetch (1-12)
    month: u32,

    /// JMA prefecture number (44 = Tokyo)
    #[arg(long, default_value = "44")]
    prec_no: u32,

    /// JMA station block number (47662 = Tokyo)
    #[arg(long, default_value = "47662")]
    block_no: u32,

    /// Output CSV path, defaults to tokyo_humidity_<year>_<month>.csv
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    ensure!((1..=12).contains(&args.month), "Month must be 1-12");

    let url = scrape::daily_observations_url(args.prec_no, args.block_no, args.year, args.month);
    println!("Fetching {}", url);

    // One-shot fetch; no retries, the page is static per month.
    let html = reqwest::blocking::get(&url)
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()?
        .text()?;
    debug!("Fetched {} bytes", html.len());

    let rows = scrape::extract_table_rows(&html);
    debug!("Extracted {} table rows", rows.len());
    let daily = scrape::parse_daily_rows(&rows);
    ensure!(
        !daily.is_empty(),
        "No daily observations found at {} (page layout may have changed)",
        url
    );

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!("tokyo_humidity_{}_{}.csv", args.year, args.month))
    });
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record(["Day", "Avg_Humidity", "Avg_Temperature"])?;
    for d in &daily {
        writer.write_record(&[
            d.day.to_string(),
            d.avg_humidity.to_string(),
            d.avg_temperature.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {} days to {}", daily.len(), output.display());
    Ok(())
}
