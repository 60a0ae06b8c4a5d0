use crate::scoring::{MalformedTimeError, SleepRecord};
use crate::DayScore;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// One row of the sleep CSV, as recorded:
/// `Day,bedtime_hhmm,wake_time_hhmm[,cross_day_wake]`.
/// Time fields stay raw strings here; parsing them is part of scoring so
/// that a malformed value is attributed to its record instead of failing
/// the whole file load.
#[derive(Debug, Clone, Deserialize)]
pub struct SleepRow {
    #[serde(rename = "Day")]
    pub day: u32,
    pub bedtime_hhmm: String,
    pub wake_time_hhmm: String,
    /// 1 when the wake time is on the calendar day after bedtime.
    #[serde(default)]
    pub cross_day_wake: Option<u8>,
}

impl SleepRow {
    pub fn crosses_midnight(&self) -> bool {
        self.cross_day_wake == Some(1)
    }
}

/// One row of the weather CSV the humidity scraper produces:
/// `Day,Avg_Humidity,Avg_Temperature`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeatherRow {
    #[serde(rename = "Day")]
    pub day: u32,
    #[serde(rename = "Avg_Humidity")]
    pub avg_humidity: f64,
    #[serde(rename = "Avg_Temperature")]
    pub avg_temperature: f64,
}

pub fn load_sleep_csv(path: &Path) -> Result<Vec<SleepRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open sleep CSV {}", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: SleepRow =
            row.with_context(|| format!("Failed to read sleep row from {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_weather_csv(path: &Path) -> Result<Vec<WeatherRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open weather CSV {}", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: WeatherRow =
            row.with_context(|| format!("Failed to read weather row from {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Turns raw rows into sleep records, one result per row in input order.
/// A row whose time fields fail to parse yields its own error rather than
/// aborting or silently skipping; the caller decides what to do with it.
pub fn parse_records(rows: &[SleepRow]) -> Vec<Result<SleepRecord, MalformedTimeError>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            SleepRecord::from_hhmm(
                index,
                &row.bedtime_hhmm,
                &row.wake_time_hhmm,
                row.crosses_midnight(),
            )
        })
        .collect()
}

/// Left-merge by day: every scored day is kept, paired with its weather
/// observation when one exists.
pub fn merge_weather(
    days: &[DayScore],
    weather: &[WeatherRow],
) -> Vec<(DayScore, Option<WeatherRow>)> {
    days.iter()
        .map(|d| (*d, weather.iter().find(|w| w.day == d.day).copied()))
        .collect()
}
