use crate::scoring::MalformedTimeError;
use crate::stats::{self, HistogramBin};
use crate::DayScore;
use anyhow::Result;
use std::path::Path;

/// Writes scored records as CSV, one row per day, score rounded to one
/// decimal the way the source data always carried it.
pub fn write_scores_csv(path: &Path, days: &[DayScore]) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    println!("Writing scored records to {}", path.display());
    let file = std::fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        "Day",
        "bedtime_hhmm",
        "wake_time_hhmm",
        "actual_sleep_min",
        "target_overlap_min",
        "sleep_fit_score",
    ])?;

    for d in days {
        writer.write_record(&[
            d.day.to_string(),
            d.bedtime.to_string(),
            d.wake_time.to_string(),
            d.scored.actual_minutes.to_string(),
            d.scored.overlap_minutes.to_string(),
            format!("{:.1}", d.scored.fit_score),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes scored records as pretty JSON for downstream dashboards.
pub fn write_scores_json(path: &Path, days: &[DayScore]) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    println!("Writing scored records to {}", path.display());
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, days)?;
    Ok(())
}

/// Prints the per-run report: counts, duration stats, fit score, the
/// half-hour histogram, the weather correlation when one was computed,
/// and every skipped record so bad rows never vanish silently.
pub fn print_summary(
    days: &[DayScore],
    skipped: &[MalformedTimeError],
    bins: &[HistogramBin],
    correlation: Option<(&str, f64, usize)>,
) {
    println!(
        "\nSleep summary: {} records scored, {} skipped",
        days.len(),
        skipped.len()
    );
    println!("----------------------------------------");

    let hours: Vec<f64> = days
        .iter()
        .map(|d| d.scored.actual_minutes as f64 / 60.0)
        .collect();
    if let Some(m) = stats::mean(&hours) {
        println!("Mean sleep:     {:.2} h", m);
    }
    if let Some(s) = stats::sample_std(&hours) {
        println!("Std deviation:  {:.2} h", s);
    }

    let scores: Vec<f64> = days.iter().map(|d| d.scored.fit_score).collect();
    if let Some(m) = stats::mean(&scores) {
        println!("Mean fit score: {:.1}", m);
    }

    if !bins.is_empty() {
        println!("\nSleep duration distribution (30-minute bins):");
        for bin in bins {
            println!(
                "  {:4.1}-{:4.1} h  {:2}  {}",
                bin.lower,
                bin.upper,
                bin.count,
                "#".repeat(bin.count)
            );
        }
    }

    if let Some((metric, r, n)) = correlation {
        println!(
            "\nCorrelation between sleep duration and {}: r = {:.2} ({} days)",
            metric, r, n
        );
    }

    if !skipped.is_empty() {
        println!("\nSkipped records:");
        for err in skipped {
            println!("  {}", err);
        }
    }
}
