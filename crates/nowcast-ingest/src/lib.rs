//! Time-series sources
//!
//! A source performs one round-trip per call and returns both raw series.
//! Sources never retry; the polling loop owns the retry cadence.

pub mod open_meteo;
pub mod replay;

pub use open_meteo::*;
pub use replay::*;

use nowcast_core::{RawBundle, RawSeries};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid provider url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed response envelope: {0}")]
    Envelope(String),

    #[error("Replay file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Trait for all time-series sources
#[async_trait::async_trait]
pub trait SeriesSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Fetch the current hourly and 15-minute series
    async fn fetch(&self) -> FetchResult<RawBundle>;
}

/// Top-level shape of a forecast response
#[derive(Debug, Deserialize)]
struct Envelope {
    hourly: RawSeries,
    minutely_15: RawSeries,
}

/// Parse a forecast response body into a raw bundle
pub fn parse_envelope(body: &[u8]) -> FetchResult<RawBundle> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| FetchError::Envelope(e.to_string()))?;

    Ok(RawBundle {
        hourly: envelope.hourly,
        sub_hourly: envelope.minutely_15,
    })
}
