use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMetric {
    Humidity,
    Temperature,
}

impl CompareMetric {
    pub fn label(&self) -> &'static str {
        match self {
            CompareMetric::Humidity => "average humidity",
            CompareMetric::Temperature => "average temperature",
        }
    }
}

impl FromStr for CompareMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "humidity" => Ok(CompareMetric::Humidity),
            "temperature" => Ok(CompareMetric::Temperature),
            _ => Err(format!(
                "Invalid compare metric: {}. Use humidity or temperature",
                s
            )),
        }
    }
}

/// Score recorded sleep intervals against a recommended sleep window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Sleep CSV with columns Day,bedtime_hhmm,wake_time_hhmm[,cross_day_wake]
    #[arg(help = "Path to the sleep CSV")]
    pub input_path: PathBuf,

    /// Recommended sleep-onset time (HH:MM, 24-hour)
    #[arg(long, default_value = "23:30")]
    pub target_start: String,

    /// Recommended wake time (HH:MM, 24-hour)
    #[arg(long, default_value = "07:30")]
    pub target_end: String,

    /// Weather CSV (Day,Avg_Humidity,Avg_Temperature) to merge by day
    #[arg(long)]
    pub weather: Option<PathBuf>,

    /// Weather metric to correlate with sleep duration (humidity or temperature)
    #[arg(long, default_value = "humidity")]
    pub compare: CompareMetric,

    /// CSV output path for scored records
    #[arg(long)]
    pub csv_output: Option<PathBuf>,

    /// JSON output path for scored records
    #[arg(long)]
    pub json_output: Option<PathBuf>,
}
