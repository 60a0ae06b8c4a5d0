pub mod config;
pub mod data_loading;
pub mod output;
pub mod scoring;
pub mod scrape;
pub mod stats;

use scoring::{ScoredRecord, TimeOfDay};
use serde::Serialize;

/// One scored day, ready for the presentation layer (CSV, JSON, or the
/// printed summary). The scorer itself knows nothing about days; this
/// pairs its output back with the row it came from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DayScore {
    pub day: u32,
    pub bedtime: TimeOfDay,
    pub wake_time: TimeOfDay,
    #[serde(flatten)]
    pub scored: ScoredRecord,
}
