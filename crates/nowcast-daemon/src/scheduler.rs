//! Fixed-interval polling loop
//!
//! One iteration walks Fetching → Normalizing → Selecting → Merging →
//! Persisting. Any failure ends the iteration early; the loop logs it and
//! sleeps the full interval before the next fetch.

use nowcast_core::{
    merge, normalize, select_hourly, select_sub_hourly, Clock, MergeError, NoMatchError,
    RecordStore, StorageError, ValidationError, WeatherRecord, HOURLY_SCHEMA, SUB_HOURLY_SCHEMA,
};
use nowcast_ingest::{FetchError, SeriesSource};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Normalizing,
    Selecting,
    Merging,
    Persisting,
    Sleeping,
}

/// Everything that can end a single iteration
#[derive(Debug, Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("selection failed: {0}")]
    NoMatch(#[from] NoMatchError),

    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub iterations: u64,
    pub persisted: u64,
    pub failed: u64,
}

/// Scheduler drives the source → store pipeline on a timer
pub struct Scheduler {
    source: Box<dyn SeriesSource>,
    store: Arc<dyn RecordStore>,
    clock: Box<dyn Clock>,
    interval: Duration,
    state: PollState,
}

impl Scheduler {
    pub fn new(
        source: Box<dyn SeriesSource>,
        store: Arc<dyn RecordStore>,
        clock: Box<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            interval,
            state: PollState::Idle,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn enter(&mut self, state: PollState) {
        debug!(from = ?self.state, to = ?state, "Poll state change");
        self.state = state;
    }

    /// Run one iteration and return the stored record
    pub async fn run_once(&mut self) -> Result<WeatherRecord, PollError> {
        self.enter(PollState::Fetching);
        let bundle = self.source.fetch().await?;

        self.enter(PollState::Normalizing);
        let hourly = normalize(&bundle.hourly, &HOURLY_SCHEMA)?;
        let sub_hourly = normalize(&bundle.sub_hourly, &SUB_HOURLY_SCHEMA)?;

        self.enter(PollState::Selecting);
        let now = self.clock.now();
        let hourly_sample = select_hourly(&hourly, now)?;
        let sub_hourly_sample = select_sub_hourly(&sub_hourly, now)?;
        debug!(
            %now,
            hourly = %hourly_sample.timestamp,
            sub_hourly = %sub_hourly_sample.timestamp,
            "Selected current samples"
        );

        self.enter(PollState::Merging);
        let input = merge(hourly_sample, sub_hourly_sample)?;

        self.enter(PollState::Persisting);
        let record = self.store.create(&input).await?;

        Ok(record)
    }

    /// Poll until `shutdown` flips to true or its sender is dropped
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> PollStats {
        let mut stats = PollStats::default();

        info!("Scheduler started");
        info!("Source: {}", self.source.name());
        info!("Poll interval: {}s", self.interval.as_secs_f64());

        while !*shutdown.borrow() {
            let outcome = tokio::select! {
                outcome = self.run_once() => outcome,
                _ = shutdown.changed() => break,
            };
            stats.iterations += 1;

            match outcome {
                Ok(record) => {
                    stats.persisted += 1;
                    info!(
                        id = record.id,
                        temperature = record.data.temperature,
                        pressure = record.data.pressure,
                        weather = %record.data.weather,
                        "Weather record stored"
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    error!(state = ?self.state, "Poll iteration failed: {}", e);
                }
            }

            self.enter(PollState::Sleeping);
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        self.state = PollState::Idle;
        info!(?stats, "Scheduler stopped");
        stats
    }
}
