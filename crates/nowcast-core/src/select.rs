//! Picking the sample that represents "now"
//!
//! The provider returns a short rolling window at fixed granularity, so both
//! policies compare only the time-of-day component of each sample with the
//! current wall clock. Hourly windows longer than a day are ambiguous and
//! resolve to the first matching hour.

use crate::types::{CurrentSample, NormalizedSeries};
use chrono::{NaiveDateTime, Timelike};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoMatchError {
    #[error("no hourly sample for hour {hour:02}")]
    NoSampleForHour { hour: u32 },

    #[error("series has no samples")]
    EmptySeries,
}

/// First sample whose hour-of-day equals the hour of `now`
pub fn select_hourly(
    series: &NormalizedSeries,
    now: NaiveDateTime,
) -> Result<CurrentSample, NoMatchError> {
    series
        .samples
        .iter()
        .find(|sample| sample.timestamp.hour() == now.hour())
        .cloned()
        .ok_or(NoMatchError::NoSampleForHour { hour: now.hour() })
}

/// Sample whose minute-of-hour is closest to the minute of `now`
///
/// Ties go to the earliest sample: a later candidate replaces the current
/// best only when strictly closer.
pub fn select_sub_hourly(
    series: &NormalizedSeries,
    now: NaiveDateTime,
) -> Result<CurrentSample, NoMatchError> {
    let minute = now.minute();
    let mut best: Option<(usize, u32)> = None;

    for (index, sample) in series.samples.iter().enumerate() {
        let distance = sample.timestamp.minute().abs_diff(minute);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }

    best.map(|(index, _)| series.samples[index].clone())
        .ok_or(NoMatchError::EmptySeries)
}
