//! Display projection of stored records

use chrono::{Duration, NaiveDateTime};
use nowcast_core::{weather_label_ru, WeatherRecord, WindDirection};
use serde::Serialize;

/// Hours added to `created_at` so the sheet shows Moscow time
pub const DISPLAY_UTC_OFFSET_HOURS: i64 = 3;

/// Column headers, in column order
pub const HEADERS: [&str; 7] = [
    "Температура, °С",
    "Скорость ветра, м/с",
    "Напрваление ветра",
    "Осадки, мм",
    "Давление, мм. рт. ст.",
    "Погода",
    "Дата и время",
];

/// One spreadsheet row
///
/// The workbook has no notion of time zones, so `created_at` is shifted to
/// display time and stored naive. Labels are shown in the same language as
/// the headers; text we do not recognise is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub precipitation: f64,
    pub pressure: f64,
    pub weather: String,
    pub created_at: NaiveDateTime,
}

impl From<&WeatherRecord> for ExportRow {
    fn from(record: &WeatherRecord) -> Self {
        ExportRow {
            temperature: record.data.temperature,
            wind_speed: record.data.wind_speed,
            wind_direction: WindDirection::from_label(&record.data.wind_direction)
                .map(|direction| direction.label_ru().to_string())
                .unwrap_or_else(|| record.data.wind_direction.clone()),
            precipitation: record.data.precipitation,
            pressure: record.data.pressure,
            weather: weather_label_ru(&record.data.weather)
                .map(str::to_string)
                .unwrap_or_else(|| record.data.weather.clone()),
            created_at: record.created_at.naive_utc() + Duration::hours(DISPLAY_UTC_OFFSET_HOURS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nowcast_core::WeatherRecordInput;

    fn record(wind_direction: &str, weather: &str) -> WeatherRecord {
        WeatherRecord {
            id: 1,
            data: WeatherRecordInput {
                temperature: 5.0,
                wind_speed: 3.0,
                wind_direction: wind_direction.into(),
                precipitation: 0.0,
                pressure: 759.0,
                weather: weather.into(),
            },
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_created_at_shifted_and_naive() {
        let row = ExportRow::from(&record("North", "Clear sky"));
        assert_eq!(row.created_at.to_string(), "2024-01-02 01:30:00");
        assert_eq!(row.pressure, 759.0);
    }

    #[test]
    fn test_labels_match_header_language() {
        let row = ExportRow::from(&record("North", "Clear sky"));
        assert_eq!(row.wind_direction, "Север");
        assert_eq!(row.weather, "Ясно");

        let row = ExportRow::from(&record("West", "unknown"));
        assert_eq!(row.wind_direction, "Запад");
        assert_eq!(row.weather, "неизвестно");
    }

    #[test]
    fn test_unrecognised_labels_pass_through() {
        let row = ExportRow::from(&record("Северо-запад", "Sandstorm"));
        assert_eq!(row.wind_direction, "Северо-запад");
        assert_eq!(row.weather, "Sandstorm");
    }

    #[test]
    fn test_headers() {
        insta::assert_snapshot!(
            HEADERS.join(" | "),
            @"Температура, °С | Скорость ветра, м/с | Напрваление ветра | Осадки, мм | Давление, мм. рт. ст. | Погода | Дата и время"
        );
    }
}
