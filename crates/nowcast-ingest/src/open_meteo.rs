//! Open-Meteo forecast client
//!
//! The location and requested fields are fixed; only the base URL can be
//! swapped, which tests use to point the client at a local server.

use crate::{parse_envelope, FetchError, FetchResult, SeriesSource};
use nowcast_core::{RawBundle, HOURLY_SCHEMA, SUB_HOURLY_SCHEMA};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
pub const FORECAST_PATH: &str = "/v1/forecast";

pub const LATITUDE: &str = "55.6878";
pub const LONGITUDE: &str = "37.3684";
pub const TIMEZONE: &str = "Europe/Moscow";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenMeteoSource {
    client: Client,
    url: Url,
}

impl OpenMeteoSource {
    /// Client for the public Open-Meteo endpoint
    pub fn new() -> FetchResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for a different host serving the same API
    pub fn with_base_url(base_url: &str) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("nowcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url: forecast_url(base_url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Build the forecast query: 15-minute fields around now, hourly pressure
pub fn forecast_url(base_url: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?.join(FORECAST_PATH)?;

    let minutely: Vec<&str> = SUB_HOURLY_SCHEMA.raw_fields().collect();
    let hourly: Vec<&str> = HOURLY_SCHEMA.raw_fields().collect();

    url.query_pairs_mut()
        .append_pair("latitude", LATITUDE)
        .append_pair("longitude", LONGITUDE)
        .append_pair("minutely_15", &minutely.join(","))
        .append_pair("hourly", &hourly.join(","))
        .append_pair("timezone", TIMEZONE)
        .append_pair("past_minutely_15", "1")
        .append_pair("forecast_days", "1")
        .append_pair("forecast_minutely_15", "4");

    Ok(url)
}

#[async_trait::async_trait]
impl SeriesSource for OpenMeteoSource {
    fn name(&self) -> &str {
        "open-meteo"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> FetchResult<RawBundle> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from provider", body.len());

        parse_envelope(&body)
    }
}
