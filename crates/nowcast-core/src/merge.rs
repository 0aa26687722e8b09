//! Combining the hourly and 15-minute samples into one record

use crate::types::{fields, CurrentSample, FieldValue, WeatherRecordInput};
use std::collections::BTreeMap;

/// Merge failures point at a schema configuration problem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("field `{0}` is supplied by both series")]
    FieldCollision(&'static str),

    #[error("field `{0}` is not supplied by either series")]
    MissingField(&'static str),

    #[error("field `{0}` has the wrong value kind")]
    WrongKind(&'static str),

    #[error("field `{0}` is not part of a weather record")]
    UnexpectedField(&'static str),
}

/// Union the fields of both samples into a record input
pub fn merge(
    hourly: CurrentSample,
    sub_hourly: CurrentSample,
) -> Result<WeatherRecordInput, MergeError> {
    let mut merged = hourly.fields;
    for (name, value) in sub_hourly.fields {
        if merged.insert(name, value).is_some() {
            return Err(MergeError::FieldCollision(name));
        }
    }

    let record = WeatherRecordInput {
        temperature: take_float(&mut merged, fields::TEMPERATURE)?,
        wind_speed: take_float(&mut merged, fields::WIND_SPEED)?,
        wind_direction: take_text(&mut merged, fields::WIND_DIRECTION)?,
        precipitation: take_float(&mut merged, fields::PRECIPITATION)?,
        pressure: take_float(&mut merged, fields::PRESSURE)?,
        weather: take_text(&mut merged, fields::WEATHER)?,
    };

    if let Some(&name) = merged.keys().next() {
        return Err(MergeError::UnexpectedField(name));
    }

    Ok(record)
}

fn take_float(
    merged: &mut BTreeMap<&'static str, FieldValue>,
    name: &'static str,
) -> Result<f64, MergeError> {
    match merged.remove(name) {
        Some(FieldValue::Float(value)) => Ok(value),
        Some(FieldValue::Text(_)) => Err(MergeError::WrongKind(name)),
        None => Err(MergeError::MissingField(name)),
    }
}

fn take_text(
    merged: &mut BTreeMap<&'static str, FieldValue>,
    name: &'static str,
) -> Result<String, MergeError> {
    match merged.remove(name) {
        Some(FieldValue::Text(value)) => Ok(value),
        Some(FieldValue::Float(_)) => Err(MergeError::WrongKind(name)),
        None => Err(MergeError::MissingField(name)),
    }
}
