//! Persistence of weather records in SQLite
//!
//! The table is dropped and recreated on every start; there are no
//! migrations. Records are append-only.

pub mod client;
pub mod queries;
pub mod schema;

pub use client::*;
pub use schema::*;

use nowcast_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub(crate) fn into_write(self) -> StorageError {
        StorageError::Write(Box::new(self))
    }

    pub(crate) fn into_read(self) -> StorageError {
        StorageError::Read(Box::new(self))
    }
}

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        StorageError::Schema(Box::new(err))
    }
}
