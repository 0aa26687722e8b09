//! Validation and conversion of raw provider series
//!
//! A [`FieldSchema`] lists the raw columns a series must carry and how each
//! one is converted. [`normalize`] applies it column by column, failing on
//! the first field that is absent or malformed.

use crate::types::{fields, FieldValue, NormalizedSeries, RawSeries, Sample};
use crate::units::{hpa_to_mmhg, weather_label, WindDirection};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeMap;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field `{0}` is missing")]
    MissingField(String),

    #[error("field `{field}` has the wrong shape: {detail}")]
    WrongShape { field: String, detail: String },

    #[error("field `{field}` has {found} values, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("field `{field}` holds an unparseable timestamp: {value}")]
    BadTimestamp { field: String, value: String },

    #[error("field `{field}` is not strictly increasing at index {index}")]
    NotIncreasing { field: String, index: usize },

    #[error("field `{field}` value {value} at index {index} is out of range")]
    OutOfRange {
        field: String,
        index: usize,
        value: f64,
    },
}

impl ValidationError {
    /// Name of the raw field that failed validation
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::WrongShape { field, .. }
            | ValidationError::LengthMismatch { field, .. }
            | ValidationError::BadTimestamp { field, .. }
            | ValidationError::NotIncreasing { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

/// Conversion applied to every value of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Plain number, kept as is
    Float,
    /// hPa in, truncated mmHg out
    PressureMmHg,
    /// Bearing in degrees, cardinal label out
    WindLabel,
    /// WMO code in, weather label out
    WeatherLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name in the provider payload
    pub raw: &'static str,
    /// Name of the converted field
    pub name: &'static str,
    pub transform: Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub time_field: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Hourly block: only surface pressure is taken from it
pub const HOURLY_SCHEMA: FieldSchema = FieldSchema {
    time_field: "time",
    fields: &[FieldSpec {
        raw: "surface_pressure",
        name: fields::PRESSURE,
        transform: Transform::PressureMmHg,
    }],
};

/// 15-minute block: everything except pressure
pub const SUB_HOURLY_SCHEMA: FieldSchema = FieldSchema {
    time_field: "time",
    fields: &[
        FieldSpec {
            raw: "temperature_2m",
            name: fields::TEMPERATURE,
            transform: Transform::Float,
        },
        FieldSpec {
            raw: "precipitation",
            name: fields::PRECIPITATION,
            transform: Transform::Float,
        },
        FieldSpec {
            raw: "wind_speed_10m",
            name: fields::WIND_SPEED,
            transform: Transform::Float,
        },
        FieldSpec {
            raw: "wind_direction_10m",
            name: fields::WIND_DIRECTION,
            transform: Transform::WindLabel,
        },
        FieldSpec {
            raw: "weather_code",
            name: fields::WEATHER,
            transform: Transform::WeatherLabel,
        },
    ],
};

impl FieldSchema {
    /// Raw column names requested from the provider, excluding time
    pub fn raw_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.raw)
    }
}

/// Validate a raw series against `schema` and convert it into typed samples
pub fn normalize(raw: &RawSeries, schema: &FieldSchema) -> Result<NormalizedSeries, ValidationError> {
    let timestamps = parse_timestamps(raw, schema.time_field)?;

    let mut samples: Vec<Sample> = timestamps
        .into_iter()
        .map(|timestamp| Sample {
            timestamp,
            fields: BTreeMap::new(),
        })
        .collect();

    for spec in schema.fields {
        let values = column_array(raw, spec.raw)?;
        if values.len() != samples.len() {
            return Err(ValidationError::LengthMismatch {
                field: spec.raw.to_string(),
                expected: samples.len(),
                found: values.len(),
            });
        }

        for (index, (value, sample)) in values.iter().zip(samples.iter_mut()).enumerate() {
            let converted = convert_value(spec, index, value)?;
            sample.fields.insert(spec.name, converted);
        }
    }

    Ok(NormalizedSeries { samples })
}

fn column_array<'a>(raw: &'a RawSeries, field: &str) -> Result<&'a Vec<Value>, ValidationError> {
    raw.column(field)
        .ok_or_else(|| ValidationError::MissingField(field.to_string()))?
        .as_array()
        .ok_or_else(|| ValidationError::WrongShape {
            field: field.to_string(),
            detail: "expected an array".to_string(),
        })
}

fn parse_timestamps(raw: &RawSeries, field: &str) -> Result<Vec<NaiveDateTime>, ValidationError> {
    let values = column_array(raw, field)?;
    let mut timestamps: Vec<NaiveDateTime> = Vec::with_capacity(values.len());

    for (index, value) in values.iter().enumerate() {
        let text = value.as_str().ok_or_else(|| ValidationError::WrongShape {
            field: field.to_string(),
            detail: format!("element {index} is not a string"),
        })?;

        let timestamp = parse_timestamp(text).ok_or_else(|| ValidationError::BadTimestamp {
            field: field.to_string(),
            value: text.to_string(),
        })?;

        if timestamps.last().is_some_and(|last| *last >= timestamp) {
            return Err(ValidationError::NotIncreasing {
                field: field.to_string(),
                index,
            });
        }
        timestamps.push(timestamp);
    }

    Ok(timestamps)
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn convert_value(spec: &FieldSpec, index: usize, value: &Value) -> Result<FieldValue, ValidationError> {
    let number = value.as_f64().ok_or_else(|| ValidationError::WrongShape {
        field: spec.raw.to_string(),
        detail: format!("element {index} is not a number"),
    })?;

    match spec.transform {
        Transform::Float => Ok(FieldValue::Float(number)),
        Transform::PressureMmHg => Ok(FieldValue::Float(hpa_to_mmhg(number))),
        Transform::WindLabel => WindDirection::from_bearing(number)
            .map(|direction| FieldValue::Text(direction.label().to_string()))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: spec.raw.to_string(),
                index,
                value: number,
            }),
        Transform::WeatherLabel => {
            if number.fract() != 0.0 {
                return Err(ValidationError::WrongShape {
                    field: spec.raw.to_string(),
                    detail: format!("element {index} is not an integer code"),
                });
            }
            Ok(FieldValue::Text(weather_label(number as i64).to_string()))
        }
    }
}
