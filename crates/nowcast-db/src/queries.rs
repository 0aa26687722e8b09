//! Database query operations for the weather record table

use crate::schema::WeatherRecordRow;
use crate::{DbClient, DbResult};
use nowcast_core::{RecordOrder, RecordStore, StorageError, WeatherRecord, WeatherRecordInput};
use sqlx::Row;
use tracing::{debug, instrument};

const SELECT_ASC: &str = r#"
    SELECT id, temperature, wind_speed, wind_direction,
           precipitation, pressure, weather, created_at
    FROM weather_record
    ORDER BY id ASC
    LIMIT ?
"#;

const SELECT_DESC: &str = r#"
    SELECT id, temperature, wind_speed, wind_direction,
           precipitation, pressure, weather, created_at
    FROM weather_record
    ORDER BY id DESC
    LIMIT ?
"#;

impl DbClient {
    /// Insert a single weather record and return it as stored
    #[instrument(skip(self, record))]
    pub async fn insert_record(&self, record: &WeatherRecordInput) -> DbResult<WeatherRecordRow> {
        let row = sqlx::query_as::<_, WeatherRecordRow>(
            r#"
            INSERT INTO weather_record (
                temperature, wind_speed, wind_direction,
                precipitation, pressure, weather
            ) VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, temperature, wind_speed, wind_direction,
                      precipitation, pressure, weather, created_at
            "#,
        )
        .bind(record.temperature)
        .bind(record.wind_speed)
        .bind(&record.wind_direction)
        .bind(record.precipitation)
        .bind(record.pressure)
        .bind(&record.weather)
        .fetch_one(self.pool())
        .await?;

        debug!("Inserted weather record {}", row.id);
        Ok(row)
    }

    /// Get up to `limit` records in the requested identity order
    #[instrument(skip(self))]
    pub async fn get_records(&self, limit: u32, order: RecordOrder) -> DbResult<Vec<WeatherRecordRow>> {
        let sql = match order {
            RecordOrder::IdAsc => SELECT_ASC,
            RecordOrder::IdDesc => SELECT_DESC,
        };

        let records = sqlx::query_as::<_, WeatherRecordRow>(sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        debug!("Retrieved {} weather records", records.len());
        Ok(records)
    }

    /// Get count of weather records
    #[instrument(skip(self))]
    pub async fn count_records(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM weather_record")
            .fetch_one(self.pool())
            .await?;

        Ok(row.get("count"))
    }
}

#[async_trait::async_trait]
impl RecordStore for DbClient {
    async fn create(&self, record: &WeatherRecordInput) -> Result<WeatherRecord, StorageError> {
        self.insert_record(record)
            .await
            .map(WeatherRecord::from)
            .map_err(|e| e.into_write())
    }

    async fn get_recent(
        &self,
        limit: u32,
        order: RecordOrder,
    ) -> Result<Vec<WeatherRecord>, StorageError> {
        self.get_records(limit, order)
            .await
            .map(|rows| rows.into_iter().map(WeatherRecord::from).collect())
            .map_err(|e| e.into_read())
    }
}
