use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, warn};
use sleep_fit::config::{Args, CompareMetric};
use sleep_fit::data_loading;
use sleep_fit::output;
use sleep_fit::scoring::{SleepFitScorer, TargetWindow, TimeOfDay};
use sleep_fit::stats;
use sleep_fit::DayScore;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let target_start: TimeOfDay = args
        .target_start
        .parse()
        .with_context(|| format!("Invalid --target-start value {:?}", args.target_start))?;
    let target_end: TimeOfDay = args
        .target_end
        .parse()
        .with_context(|| format!("Invalid --target-end value {:?}", args.target_end))?;
    let window = TargetWindow::new(target_start, target_end);

    let rows = data_loading::load_sleep_csv(&args.input_path)?;
    println!(
        "Loaded {} sleep records from {}",
        rows.len(),
        args.input_path.display()
    );
    println!("Target window: {} - {}", window.start, window.end);

    // Score row by row; a malformed time skips that row with a warning
    // instead of aborting the batch or silently zeroing it.
    let scorer = SleepFitScorer::new(&window);
    let mut day_scores = Vec::new();
    let mut skipped = Vec::new();
    for (row, parsed) in rows.iter().zip(data_loading::parse_records(&rows)) {
        match parsed {
            Ok(record) => {
                let scored = scorer.score(&record);
                debug!(
                    "day {}: actual {} min, overlap {} min, score {:.1}",
                    row.day, scored.actual_minutes, scored.overlap_minutes, scored.fit_score
                );
                day_scores.push(DayScore {
                    day: row.day,
                    bedtime: record.bedtime,
                    wake_time: record.wake_time,
                    scored,
                });
            }
            Err(err) => {
                warn!("Skipping {}", err);
                skipped.push(err);
            }
        }
    }

    if day_scores.is_empty() {
        bail!(
            "No scorable records in {} ({} rows malformed)",
            args.input_path.display(),
            skipped.len()
        );
    }

    let correlation = match &args.weather {
        Some(path) => {
            let weather = data_loading::load_weather_csv(path)?;
            println!(
                "Loaded {} weather observations from {}",
                weather.len(),
                path.display()
            );
            correlate(&day_scores, &weather, args.compare)
        }
        None => None,
    };

    if let Some(path) = &args.csv_output {
        output::write_scores_csv(path, &day_scores)?;
    }
    if let Some(path) = &args.json_output {
        output::write_scores_json(path, &day_scores)?;
    }

    let hours: Vec<f64> = day_scores
        .iter()
        .map(|d| d.scored.actual_minutes as f64 / 60.0)
        .collect();
    let bins = stats::histogram(&hours, 0.5);

    let correlation = correlation
        .as_ref()
        .map(|(metric, r, n)| (metric.label(), *r, *n));
    output::print_summary(&day_scores, &skipped, &bins, correlation);

    Ok(())
}

/// Pearson correlation between sleep duration and the chosen weather
/// metric over the days that have both a score and an observation.
fn correlate(
    day_scores: &[DayScore],
    weather: &[data_loading::WeatherRow],
    metric: CompareMetric,
) -> Option<(CompareMetric, f64, usize)> {
    let mut hours = Vec::new();
    let mut values = Vec::new();
    for (day, observation) in data_loading::merge_weather(day_scores, weather) {
        let Some(observation) = observation else {
            debug!("day {}: no weather observation", day.day);
            continue;
        };
        hours.push(day.scored.actual_minutes as f64 / 60.0);
        values.push(match metric {
            CompareMetric::Humidity => observation.avg_humidity,
            CompareMetric::Temperature => observation.avg_temperature,
        });
    }

    match stats::pearson_correlation(&hours, &values) {
        Some(r) => Some((metric, r, hours.len())),
        None => {
            warn!(
                "Not enough overlapping days to correlate sleep with {} ({} days)",
                metric.label(),
                hours.len()
            );
            None
        }
    }
}
