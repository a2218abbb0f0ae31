use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::config::Locale;

// ---------------------------------------------------------------------------
// Weekday – normalized schedule key
// ---------------------------------------------------------------------------

/// Day of the week with a fixed Monday-first display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Parse an English weekday name as it appears in schedule keys.
    /// Matching ignores ASCII case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Weekday> {
        let name = name.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.english().eq_ignore_ascii_case(name))
    }

    /// Zero-based position in display order (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    fn english(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Display label in the requested locale.
    pub fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => self.english(),
            Locale::German => match self {
                Weekday::Monday => "Montag",
                Weekday::Tuesday => "Dienstag",
                Weekday::Wednesday => "Mittwoch",
                Weekday::Thursday => "Donnerstag",
                Weekday::Friday => "Freitag",
                Weekday::Saturday => "Samstag",
                Weekday::Sunday => "Sonntag",
            },
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english())
    }
}

// ---------------------------------------------------------------------------
// Record – one business listing
// ---------------------------------------------------------------------------

/// Weekly schedule as found in the source: weekday name → `"open-close"`.
pub type Schedule = BTreeMap<String, String>;

/// A single business listing (one line of the source file).
///
/// Field names follow the Yelp business dump so a line can be deserialized
/// directly; unknown fields (address, attributes, …) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "business_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Star rating, 0.0–5.0 in half steps.
    #[serde(rename = "stars")]
    pub rating: f64,
    pub review_count: u64,
    /// Comma-delimited category list, e.g. `"Pizza, Restaurants"`.
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "deserialize_schedule")]
    pub hours: Option<Schedule>,
}

impl Record {
    /// Coordinates as `[latitude, longitude]` when both are present and finite.
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some([lat, lon]),
            _ => None,
        }
    }
}

/// Accept any JSON value for `hours`; only objects become a schedule.
fn deserialize_schedule<'de, D>(deserializer: D) -> Result<Option<Schedule>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(schedule_from_json))
}

/// Convert a JSON value into a [`Schedule`].
///
/// Non-object values yield `None`. Non-string entry values are kept in
/// their JSON text form so the hours extractor can count them as malformed.
pub fn schedule_from_json(value: &JsonValue) -> Option<Schedule> {
    let obj = value.as_object()?;
    Some(
        obj.iter()
            .map(|(day, range)| {
                let text = match range {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (day.clone(), text)
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All listings in file order.
    pub records: Vec<Record>,
    max_review_count: u64,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let max_review_count = records.iter().map(|r| r.review_count).max().unwrap_or(0);
        Dataset {
            records,
            max_review_count,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest review count in the dataset (0 when empty).
    pub fn max_review_count(&self) -> u64 {
        self.max_review_count
    }
}
