use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Day boundary for the shared timeline. Sleep sessions typically start late
/// at night and end the next morning, so anchoring the cut at noon keeps a
/// realistic session inside a single day instead of splitting it at midnight.
const NOON_MINUTES: u32 = 720;

/// Clock reading without date context, stored as minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    pub fn minute(&self) -> u32 {
        self.0 % 60
    }

    /// Project onto the noon-anchored timeline: times before noon belong to
    /// the morning after the anchor day, so they shift forward one full day.
    fn noon_anchored(&self) -> u32 {
        if self.0 < NOON_MINUTES {
            self.0 + MINUTES_PER_DAY
        } else {
            self.0
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = chrono::ParseError;

    /// Parses `HH:MM` (24-hour). Rejects anything chrono cannot read as a
    /// valid clock time, including out-of-range components and trailing text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = NaiveTime::parse_from_str(s.trim(), "%H:%M")?;
        Ok(TimeOfDay(t.hour() * 60 + t.minute()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A time-of-day field that failed to parse: the record's position in the
/// batch, which column, and the raw text. Parse failures surface as this
/// error, never as a coerced zero or skipped row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("record {index}: {column} value {value:?} is not a valid HH:MM time")]
pub struct MalformedTimeError {
    pub index: usize,
    pub column: &'static str,
    pub value: String,
}

/// One recorded sleep interval, as times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRecord {
    pub bedtime: TimeOfDay,
    pub wake_time: TimeOfDay,
    /// Caller-supplied disambiguation: the wake time is on the calendar day
    /// after bedtime even when the clock values alone cannot show it.
    pub crosses_midnight: bool,
}

impl SleepRecord {
    pub fn new(bedtime: TimeOfDay, wake_time: TimeOfDay) -> Self {
        SleepRecord {
            bedtime,
            wake_time,
            crosses_midnight: false,
        }
    }

    /// Builds a record from raw `HH:MM` strings, attributing any parse
    /// failure to the record's position in the batch.
    pub fn from_hhmm(
        index: usize,
        bedtime: &str,
        wake_time: &str,
        crosses_midnight: bool,
    ) -> Result<Self, MalformedTimeError> {
        let bedtime_tod: TimeOfDay = bedtime.parse().map_err(|_| MalformedTimeError {
            index,
            column: "bedtime",
            value: bedtime.to_string(),
        })?;
        let wake_tod: TimeOfDay = wake_time.parse().map_err(|_| MalformedTimeError {
            index,
            column: "wake_time",
            value: wake_time.to_string(),
        })?;
        Ok(SleepRecord {
            bedtime: bedtime_tod,
            wake_time: wake_tod,
            crosses_midnight,
        })
    }

    /// Noon-anchored `(start, end)` in minutes. The end shifts one day
    /// forward when it would otherwise land before the start; the
    /// `crosses_midnight` flag extends that shift to the ambiguous
    /// equal-clock-time case. Equal times without the flag stay a
    /// zero-length interval.
    fn normalized(&self) -> (u32, u32) {
        let start = self.bedtime.noon_anchored();
        let mut end = self.wake_time.noon_anchored();
        if end < start || (self.crosses_midnight && end == start) {
            end += MINUTES_PER_DAY;
        }
        (start, end)
    }
}

/// The recommended sleep window the fit score is measured against.
/// May itself span midnight (e.g. 23:30 -> 07:30); normalization turns it
/// into one continuous interval on the noon-anchored timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TargetWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        TargetWindow { start, end }
    }

    fn normalized(&self) -> (u32, u32) {
        let start = self.start.noon_anchored();
        let mut end = self.end.noon_anchored();
        if end < start {
            end += MINUTES_PER_DAY;
        }
        (start, end)
    }
}

impl Default for TargetWindow {
    /// The 23:30-07:30 recommended window.
    fn default() -> Self {
        TargetWindow {
            start: TimeOfDay(23 * 60 + 30),
            end: TimeOfDay(7 * 60 + 30),
        }
    }
}

/// Overlap length of two numeric ranges. Commutative, never negative,
/// zero for disjoint or merely touching intervals.
pub fn interval_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> u32 {
    a_end.min(b_end).saturating_sub(a_start.max(b_start))
}

/// Scoring result for one sleep record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub actual_minutes: u32,
    pub overlap_minutes: u32,
    /// `100 * overlap / actual`, or 0.0 for a zero-length interval.
    pub fit_score: f64,
}

/// Scores sleep records against one target window. The window is normalized
/// once at construction; scoring is a pure per-record transformation.
#[derive(Debug, Clone)]
pub struct SleepFitScorer {
    window_start: u32,
    window_end: u32,
}

impl SleepFitScorer {
    pub fn new(window: &TargetWindow) -> Self {
        let (window_start, window_end) = window.normalized();
        SleepFitScorer {
            window_start,
            window_end,
        }
    }

    pub fn score(&self, record: &SleepRecord) -> ScoredRecord {
        let (start, end) = record.normalized();
        let actual_minutes = end - start;
        let overlap_minutes = interval_overlap(start, end, self.window_start, self.window_end);
        let fit_score = if actual_minutes == 0 {
            0.0
        } else {
            100.0 * overlap_minutes as f64 / actual_minutes as f64
        };
        ScoredRecord {
            actual_minutes,
            overlap_minutes,
            fit_score,
        }
    }

    /// Scores a batch in input order, one output per record.
    pub fn score_all(&self, records: &[SleepRecord]) -> Vec<ScoredRecord> {
        records.iter().map(|r| self.score(r)).collect()
    }
}

impl Default for SleepFitScorer {
    fn default() -> Self {
        SleepFitScorer::new(&TargetWindow::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tod(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[test]
    fn parses_hhmm() {
        let t: TimeOfDay = "23:30".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 30));
        assert_eq!(t.to_string(), "23:30");

        let t: TimeOfDay = "7:05".parse().unwrap();
        assert_eq!(t.minutes(), 7 * 60 + 5);
    }

    #[test]
    fn rejects_invalid_times() {
        assert!("abc".parse::<TimeOfDay>().is_err());
        assert!("25:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("".parse::<TimeOfDay>().is_err());
        assert!("12:30:15".parse::<TimeOfDay>().is_err());
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(12, 60).is_none());
    }

    #[test]
    fn malformed_time_points_at_the_record() {
        let err = SleepRecord::from_hhmm(17, "abc", "07:30", false).unwrap_err();
        assert_eq!(err.index, 17);
        assert_eq!(err.column, "bedtime");
        assert_eq!(err.value, "abc");
        assert!(err.to_string().contains("record 17"));
        assert!(err.to_string().contains("\"abc\""));

        let err = SleepRecord::from_hhmm(3, "22:00", "7x30", false).unwrap_err();
        assert_eq!(err.column, "wake_time");
        assert_eq!(err.value, "7x30");
    }

    #[test]
    fn full_window_sleep_scores_100() {
        // Scenario A: sleep exactly covers the 23:30-07:30 window.
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(23, 30), tod(7, 30)));
        assert_eq!(scored.actual_minutes, 480);
        assert_eq!(scored.overlap_minutes, 480);
        assert_eq!(scored.fit_score, 100.0);
    }

    #[test]
    fn early_morning_sleep_inside_window_scores_100() {
        // Scenario B: 01:00-06:00 sits fully inside the next-day half of
        // the window (record 1500-1800, window 1410-1890).
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(1, 0), tod(6, 0)));
        assert_eq!(scored.actual_minutes, 300);
        assert_eq!(scored.overlap_minutes, 300);
        assert_eq!(scored.fit_score, 100.0);
    }

    #[test]
    fn evening_sleep_outside_window_scores_0() {
        // Scenario C: 20:00-23:00 ends before the window opens.
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(20, 0), tod(23, 0)));
        assert_eq!(scored.actual_minutes, 180);
        assert_eq!(scored.overlap_minutes, 0);
        assert_eq!(scored.fit_score, 0.0);
    }

    #[test]
    fn partial_overlap() {
        // 22:00-06:00 against 23:30-07:30: 390 of 480 minutes inside.
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(22, 0), tod(6, 0)));
        assert_eq!(scored.actual_minutes, 480);
        assert_eq!(scored.overlap_minutes, 390);
        assert!((scored.fit_score - 100.0 * 390.0 / 480.0).abs() < 1e-9);
    }

    #[test]
    fn same_day_interval_needs_no_shift() {
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(13, 0), tod(14, 30)));
        assert_eq!(scored.actual_minutes, 90);
        assert_eq!(scored.overlap_minutes, 0);
    }

    #[test]
    fn morning_interval_shifts_both_endpoints() {
        // 08:00-11:00 is entirely before noon; both endpoints shift one day.
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(8, 0), tod(11, 0)));
        assert_eq!(scored.actual_minutes, 180);
        assert_eq!(scored.overlap_minutes, 0);
    }

    #[test]
    fn zero_length_interval_scores_zero_without_panicking() {
        let scorer = SleepFitScorer::default();
        let scored = scorer.score(&SleepRecord::new(tod(23, 30), tod(23, 30)));
        assert_eq!(scored.actual_minutes, 0);
        assert_eq!(scored.overlap_minutes, 0);
        assert_eq!(scored.fit_score, 0.0);
    }

    #[test]
    fn crosses_midnight_flag_resolves_equal_clock_times() {
        let scorer = SleepFitScorer::default();
        let mut record = SleepRecord::new(tod(23, 30), tod(23, 30));
        record.crosses_midnight = true;
        let scored = scorer.score(&record);
        assert_eq!(scored.actual_minutes, MINUTES_PER_DAY);
    }

    #[test]
    fn crosses_midnight_flag_is_redundant_for_ordered_intervals() {
        let scorer = SleepFitScorer::default();
        let mut record = SleepRecord::new(tod(23, 30), tod(7, 30));
        record.crosses_midnight = true;
        assert_eq!(scorer.score(&record).actual_minutes, 480);
    }

    #[test]
    fn window_spanning_midnight_is_one_interval() {
        // 22:00-02:00 window; 23:00-01:00 sleep is fully inside.
        let window = TargetWindow::new(tod(22, 0), tod(2, 0));
        let scorer = SleepFitScorer::new(&window);
        let scored = scorer.score(&SleepRecord::new(tod(23, 0), tod(1, 0)));
        assert_eq!(scored.actual_minutes, 120);
        assert_eq!(scored.overlap_minutes, 120);
        assert_eq!(scored.fit_score, 100.0);
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert_eq!(interval_overlap(0, 100, 100, 200), 0);
        assert_eq!(interval_overlap(100, 200, 0, 100), 0);
    }

    #[test]
    fn score_all_preserves_order_and_length() {
        let scorer = SleepFitScorer::default();
        let records = vec![
            SleepRecord::new(tod(23, 30), tod(7, 30)),
            SleepRecord::new(tod(20, 0), tod(23, 0)),
            SleepRecord::new(tod(1, 0), tod(6, 0)),
        ];
        let scored = scorer.score_all(&records);
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].fit_score, 100.0);
        assert_eq!(scored[1].fit_score, 0.0);
        assert_eq!(scored[2].fit_score, 100.0);
    }

    proptest! {
        #[test]
        fn overlap_is_commutative(
            a in 0u32..2880, b in 0u32..2880,
            c in 0u32..2880, d in 0u32..2880,
        ) {
            prop_assert_eq!(interval_overlap(a, b, c, d), interval_overlap(c, d, a, b));
        }

        #[test]
        fn fit_score_stays_in_bounds(
            bh in 0u32..24, bm in 0u32..60,
            wh in 0u32..24, wm in 0u32..60,
            crosses in any::<bool>(),
            sh in 0u32..24, sm in 0u32..60,
            eh in 0u32..24, em in 0u32..60,
        ) {
            let record = SleepRecord {
                bedtime: TimeOfDay::new(bh, bm).unwrap(),
                wake_time: TimeOfDay::new(wh, wm).unwrap(),
                crosses_midnight: crosses,
            };
            let window = TargetWindow::new(
                TimeOfDay::new(sh, sm).unwrap(),
                TimeOfDay::new(eh, em).unwrap(),
            );
            let scored = SleepFitScorer::new(&window).score(&record);
            prop_assert!(scored.overlap_minutes <= scored.actual_minutes);
            prop_assert!(scored.fit_score >= 0.0);
            prop_assert!(scored.fit_score <= 100.0);
            prop_assert!(scored.fit_score.is_finite());
        }

        #[test]
        fn same_day_duration_is_plain_difference(
            bh in 0u32..24, bm in 0u32..60,
            extra in 1u32..600,
        ) {
            let bed = bh * 60 + bm;
            let wake = bed + extra;
            prop_assume!(wake < MINUTES_PER_DAY);
            // Both endpoints on the same side of noon, so no shift applies.
            prop_assume!((bed < 720) == (wake < 720));
            let record = SleepRecord::new(
                TimeOfDay::new(bh, bm).unwrap(),
                TimeOfDay::new(wake / 60, wake % 60).unwrap(),
            );
            let scored = SleepFitScorer::default().score(&record);
            prop_assert_eq!(scored.actual_minutes, extra);
        }

        #[test]
        fn wake_before_bed_wraps_to_next_day(
            bh in 12u32..24, bm in 0u32..60,
            wh in 0u32..12, wm in 0u32..60,
        ) {
            let record = SleepRecord::new(
                TimeOfDay::new(bh, bm).unwrap(),
                TimeOfDay::new(wh, wm).unwrap(),
            );
            let scored = SleepFitScorer::default().score(&record);
            let expected = (wh * 60 + wm + MINUTES_PER_DAY) - (bh * 60 + bm);
            prop_assert_eq!(scored.actual_minutes, expected);
            prop_assert!(scored.actual_minutes > 0);
        }
    }
}
