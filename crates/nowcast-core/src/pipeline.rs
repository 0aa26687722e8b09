use chrono::NaiveDateTime;

use crate::{WeatherRecord, WeatherRecordInput};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write record: {0}")]
    Write(#[source] BoxError),

    #[error("failed to read records: {0}")]
    Read(#[source] BoxError),

    #[error("failed to prepare schema: {0}")]
    Schema(#[source] BoxError),
}

/// Row ordering by record identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
    #[default]
    IdAsc,
    IdDesc,
}

/// Durable, append-only storage of weather records
///
/// Every call is an independent unit of work; implementations must not keep
/// a cursor between calls.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Append one record; the store assigns `id` and `created_at`
    async fn create(&self, record: &WeatherRecordInput) -> Result<WeatherRecord, StorageError>;

    /// Up to `limit` records sorted by `order`
    async fn get_recent(
        &self,
        limit: u32,
        order: RecordOrder,
    ) -> Result<Vec<WeatherRecord>, StorageError>;
}

/// Wall clock in the provider's local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// A clock stopped at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
