//! Opening-hour samples extracted from weekly schedules.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::stats::{five_number_summary, FiveNumberSummary};
use crate::data::model::{Record, Weekday};

// ---------------------------------------------------------------------------
// Rating buckets
// ---------------------------------------------------------------------------

/// Rating range used to group opening-hour samples.
///
/// Edges are `[0, 2, 3, 4, 4.5, 5]`: the first bucket is closed on both
/// sides, every other bucket is `(lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RatingBucket {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl RatingBucket {
    pub const ALL: [RatingBucket; 5] = [
        RatingBucket::One,
        RatingBucket::Two,
        RatingBucket::Three,
        RatingBucket::Four,
        RatingBucket::Five,
    ];

    pub const EDGES: [f64; 6] = [0.0, 2.0, 3.0, 4.0, 4.5, 5.0];

    /// Bucket of a rating, `None` outside `[0, 5]`.
    pub fn from_rating(rating: f64) -> Option<RatingBucket> {
        if !(Self::EDGES[0]..=Self::EDGES[5]).contains(&rating) {
            return None;
        }
        Self::ALL
            .into_iter()
            .zip(&Self::EDGES[1..])
            .find(|(_, &upper)| rating <= upper)
            .map(|(bucket, _)| bucket)
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingBucket::One => "1",
            RatingBucket::Two => "2",
            RatingBucket::Three => "3",
            RatingBucket::Four => "4",
            RatingBucket::Five => "5",
        }
    }
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Samples and skip accounting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningTimeSample {
    pub weekday: Weekday,
    /// Hour of the opening time, 0–23.
    pub opening_hour: u8,
    pub rating: f64,
    /// `None` when the rating lies outside `[0, 5]`.
    pub bucket: Option<RatingBucket>,
}

/// Why a schedule entry produced no sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no '-' between opening and closing time in '{0}'")]
    MissingSeparator(String),
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),
    #[error("malformed opening time '{0}'")]
    MalformedTime(String),
    #[error("opening hour {0} is not a clock hour")]
    HourOutOfRange(u32),
}

/// Counts of parsed and skipped schedule entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleDiagnostics {
    pub parsed: usize,
    pub missing_separator: usize,
    pub unknown_weekday: usize,
    pub malformed_time: usize,
    pub hour_out_of_range: usize,
    /// Listings with no schedule at all.
    pub without_schedule: usize,
}

impl ScheduleDiagnostics {
    fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::MissingSeparator(_) => self.missing_separator += 1,
            SkipReason::UnknownWeekday(_) => self.unknown_weekday += 1,
            SkipReason::MalformedTime(_) => self.malformed_time += 1,
            SkipReason::HourOutOfRange(_) => self.hour_out_of_range += 1,
        }
    }

    /// Total entries that were skipped.
    pub fn skipped(&self) -> usize {
        self.missing_separator + self.unknown_weekday + self.malformed_time + self.hour_out_of_range
    }
}

/// Sample table plus the skip counts that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpeningHours {
    pub samples: Vec<OpeningTimeSample>,
    pub diagnostics: ScheduleDiagnostics,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Parse one schedule entry such as `("Monday", "8:0-20:0")`.
///
/// Only the hour of the opening time is used; whatever follows the first
/// `:` is ignored.
pub fn parse_entry(day: &str, range: &str, rating: f64) -> Result<OpeningTimeSample, SkipReason> {
    let Some((open, _close)) = range.split_once('-') else {
        return Err(SkipReason::MissingSeparator(range.to_string()));
    };
    let weekday =
        Weekday::from_name(day).ok_or_else(|| SkipReason::UnknownWeekday(day.to_string()))?;

    let hour_text = open.split(':').next().unwrap_or(open).trim();
    let hour: u32 = hour_text
        .parse()
        .map_err(|_| SkipReason::MalformedTime(open.to_string()))?;
    let opening_hour = u8::try_from(hour)
        .ok()
        .filter(|h| *h < 24)
        .ok_or(SkipReason::HourOutOfRange(hour))?;

    Ok(OpeningTimeSample {
        weekday,
        opening_hour,
        rating,
        bucket: RatingBucket::from_rating(rating),
    })
}

/// Collect opening-hour samples from every schedule entry of `records`.
pub fn extract_opening_times<'a, I>(records: I) -> OpeningHours
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = OpeningHours::default();

    for record in records {
        let Some(schedule) = &record.hours else {
            out.diagnostics.without_schedule += 1;
            continue;
        };
        for (day, range) in schedule {
            match parse_entry(day, range, record.rating) {
                Ok(sample) => {
                    out.diagnostics.parsed += 1;
                    out.samples.push(sample);
                }
                Err(reason) => {
                    log::trace!("skipping schedule entry of {}: {reason}", record.id);
                    out.diagnostics.record_skip(&reason);
                }
            }
        }
    }

    out
}

/// Five-number summary of opening hours per (weekday, bucket), for box plots.
/// Samples without a bucket are left out.
pub fn opening_hour_spread(
    samples: &[OpeningTimeSample],
) -> BTreeMap<(Weekday, RatingBucket), FiveNumberSummary> {
    let mut groups: BTreeMap<(Weekday, RatingBucket), Vec<f64>> = BTreeMap::new();
    for sample in samples {
        if let Some(bucket) = sample.bucket {
            groups
                .entry((sample.weekday, bucket))
                .or_default()
                .push(sample.opening_hour as f64);
        }
    }
    groups
        .into_iter()
        .filter_map(|(key, hours)| five_number_summary(&hours).map(|s| (key, s)))
        .collect()
}
