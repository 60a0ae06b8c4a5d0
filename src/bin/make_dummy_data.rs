use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use sleep_fit::data_loading;
use sleep_fit::stats;
use statrs::distribution::Normal;
use std::path::PathBuf;

/// Generate synthetic sleep records loosely correlated with humidity
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Weather CSV (Day,Avg_Humidity,Avg_Temperature) to generate against
    weather: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = "dummy_sleep_data.csv")]
    output: PathBuf,

    /// Target mean sleep duration in hours
    #[arg(long, default_value = "7.0")]
    mean_hours: f64,

    /// Hours of sleep per percentage point of humidity deviation
    #[arg(long, default_value = "-0.05", allow_hyphen_values = true)]
    humidity_slope: f64,

    /// Standard deviation of the gaussian noise in hours
    #[arg(long, default_value = "1.0")]
    noise_std: f64,

    /// PRNG seed for reproducible output
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    ensure!(args.noise_std > 0.0, "Noise std must be positive");

    let weather = data_loading::load_weather_csv(&args.weather)?;
    ensure!(
        !weather.is_empty(),
        "Weather CSV {} has no rows",
        args.weather.display()
    );

    let humidities: Vec<f64> = weather.iter().map(|w| w.avg_humidity).collect();
    let humidity_mean = humidities.iter().sum::<f64>() / humidities.len() as f64;

    let mut rng = Pcg64::seed_from_u64(args.seed);
    let noise = Normal::new(0.0, args.noise_std)
        .with_context(|| format!("Invalid noise std {}", args.noise_std))?;

    // Duration = base + humidity-driven drift + noise, then re-centered so
    // the sample mean lands on the target despite the noise.
    let mut raw_hours: Vec<f64> = humidities
        .iter()
        .map(|h| args.mean_hours + (h - humidity_mean) * args.humidity_slope + noise.sample(&mut rng))
        .collect();
    let current_mean = raw_hours.iter().sum::<f64>() / raw_hours.len() as f64;
    for hours in raw_hours.iter_mut() {
        *hours += args.mean_hours - current_mean;
        // Sleep trackers report quarter hours.
        *hours = (*hours * 4.0).round() / 4.0;
        *hours = hours.clamp(0.0, 24.0);
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    writer.write_record(["Day", "bedtime_hhmm", "wake_time_hhmm", "cross_day_wake"])?;

    for (w, hours) in weather.iter().zip(raw_hours.iter()) {
        // Bedtime wobbles around 23:30 in 15-minute steps.
        let jitter = rng.gen_range(-3i64..=3) * 15;
        let bed_minutes = (23 * 60 + 30 + jitter).rem_euclid(1440);
        let duration_minutes = (hours * 60.0).round() as i64;
        let wake_total = bed_minutes + duration_minutes;
        let wake_minutes = wake_total % 1440;
        let cross_day_wake = u8::from(wake_total >= 1440 && duration_minutes > 0);

        writer.write_record(&[
            w.day.to_string(),
            format!("{:02}:{:02}", bed_minutes / 60, bed_minutes % 60),
            format!("{:02}:{:02}", wake_minutes / 60, wake_minutes % 60),
            cross_day_wake.to_string(),
        ])?;
    }
    writer.flush()?;

    let generated_mean = raw_hours.iter().sum::<f64>() / raw_hours.len() as f64;
    println!("Mean sleep duration: {:.2} h", generated_mean);
    if let Some(r) = stats::pearson_correlation(&humidities, &raw_hours) {
        println!("Correlation with humidity: {:.2}", r);
    }
    println!(
        "Wrote {} records to {}",
        raw_hours.len(),
        args.output.display()
    );
    Ok(())
}
