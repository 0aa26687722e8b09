//! Core data types for weather series and records

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical field names shared by the normalizer, merger and store
pub mod fields {
    pub const TEMPERATURE: &str = "temperature";
    pub const WIND_SPEED: &str = "wind_speed";
    pub const WIND_DIRECTION: &str = "wind_direction";
    pub const PRECIPITATION: &str = "precipitation";
    pub const PRESSURE: &str = "pressure";
    pub const WEATHER: &str = "weather";
}

/// One series block exactly as the provider returns it
///
/// Open-Meteo encodes a series column-wise: `{"time": [...], "field": [...]}`.
/// Values are untyped and may contain nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawSeries {
    pub columns: serde_json::Map<String, serde_json::Value>,
}

impl RawSeries {
    pub fn column(&self, name: &str) -> Option<&serde_json::Value> {
        self.columns.get(name)
    }
}

/// Both series fetched in a single provider round-trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBundle {
    pub hourly: RawSeries,
    pub sub_hourly: RawSeries,
}

/// A typed, unit-converted field value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            FieldValue::Float(_) => None,
        }
    }
}

/// One normalized sample of a series
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Provider-local wall-clock time of the sample
    pub timestamp: NaiveDateTime,

    /// Output field name -> converted value
    pub fields: BTreeMap<&'static str, FieldValue>,
}

/// The sample picked as representing "now"
pub type CurrentSample = Sample;

/// Samples ordered by strictly increasing timestamp
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    pub samples: Vec<Sample>,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Everything needed to create a weather record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecordInput {
    /// Air temperature at 2m, °C
    pub temperature: f64,

    /// Wind speed at 10m
    pub wind_speed: f64,

    /// Cardinal label of the wind bearing
    pub wind_direction: String,

    /// Precipitation, mm
    pub precipitation: f64,

    /// Surface pressure, mmHg (truncated)
    pub pressure: f64,

    /// Human-readable weather label
    pub weather: String,
}

/// A persisted weather record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    /// Identity assigned by the store
    pub id: i64,

    #[serde(flatten)]
    pub data: WeatherRecordInput,

    /// Insertion time taken from the store's clock
    pub created_at: DateTime<Utc>,
}
