//! Database schema for the weather record table

use chrono::{DateTime, Utc};
use nowcast_core::{WeatherRecord, WeatherRecordInput};
use sqlx::FromRow;

/// Row of the `weather_record` table
#[derive(Debug, Clone, FromRow)]
pub struct WeatherRecordRow {
    /// Auto-assigned identity
    pub id: i64,

    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub precipitation: f64,
    pub pressure: f64,
    pub weather: String,

    /// Filled by `CURRENT_TIMESTAMP` at insert, UTC
    pub created_at: DateTime<Utc>,
}

impl From<WeatherRecordRow> for WeatherRecord {
    fn from(row: WeatherRecordRow) -> Self {
        WeatherRecord {
            id: row.id,
            data: WeatherRecordInput {
                temperature: row.temperature,
                wind_speed: row.wind_speed,
                wind_direction: row.wind_direction,
                precipitation: row.precipitation,
                pressure: row.pressure,
                weather: row.weather,
            },
            created_at: row.created_at,
        }
    }
}

/// Table names
pub mod tables {
    pub const WEATHER_RECORD: &str = "weather_record";
}

pub(crate) const DROP_WEATHER_RECORD: &str = "DROP TABLE IF EXISTS weather_record";

pub(crate) const CREATE_WEATHER_RECORD: &str = r#"
    CREATE TABLE weather_record (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        temperature REAL NOT NULL,
        wind_speed REAL NOT NULL,
        wind_direction TEXT NOT NULL,
        precipitation REAL NOT NULL,
        pressure REAL NOT NULL,
        weather TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(tables::WEATHER_RECORD, "weather_record");
        assert!(CREATE_WEATHER_RECORD.contains(tables::WEATHER_RECORD));
        assert!(DROP_WEATHER_RECORD.ends_with(tables::WEATHER_RECORD));
    }

    #[test]
    fn test_row_into_record() {
        let created_at = DateTime::from_timestamp(1_704_096_000, 0).unwrap();
        let record: WeatherRecord = WeatherRecordRow {
            id: 3,
            temperature: -2.5,
            wind_speed: 4.0,
            wind_direction: "West".into(),
            precipitation: 0.1,
            pressure: 748.0,
            weather: "Slight snow fall".into(),
            created_at,
        }
        .into();

        assert_eq!(record.id, 3);
        assert_eq!(record.data.wind_direction, "West");
        assert_eq!(record.created_at, created_at);
    }
}
