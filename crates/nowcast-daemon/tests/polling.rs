//! End-to-end polling against an in-memory SQLite store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde_json::json;
use tokio::sync::watch;

use nowcast_core::{FixedClock, RawBundle, RawSeries, RecordOrder, RecordStore};
use nowcast_daemon::{run_operator, OperatorStats, Scheduler};
use nowcast_db::DbClient;
use nowcast_export::{ExportSettings, Exporter};
use nowcast_ingest::{FetchError, FetchResult, ReplaySource, SeriesSource};

fn forecast() -> RawBundle {
    RawBundle {
        hourly: serde_json::from_value::<RawSeries>(json!({
            "time": ["2024-01-01T07:00", "2024-01-01T08:00", "2024-01-01T09:00"],
            "surface_pressure": [1010.0, 1013.0, 1015.0]
        }))
        .unwrap(),
        sub_hourly: serde_json::from_value::<RawSeries>(json!({
            "time": ["2024-01-01T08:00", "2024-01-01T08:15", "2024-01-01T08:30"],
            "temperature_2m": [4.5, 5.0, 5.5],
            "precipitation": [0.0, 0.0, 0.2],
            "wind_speed_10m": [2.5, 3.2, 3.0],
            "wind_direction_10m": [90, 10, 200],
            "weather_code": [2, 0, 61]
        }))
        .unwrap(),
    }
}

fn quarter_past_eight() -> Box<FixedClock> {
    Box::new(FixedClock(
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap(),
    ))
}

async fn store() -> DbClient {
    let client = DbClient::in_memory().await.unwrap();
    client.reset_schema().await.unwrap();
    client
}

/// Fails the first `failures` fetches, then replays the forecast
struct FlakySource {
    failures: usize,
    calls: AtomicUsize,
    instants: Arc<Mutex<Vec<Instant>>>,
}

impl FlakySource {
    fn new(failures: usize, instants: Arc<Mutex<Vec<Instant>>>) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            instants,
        }
    }
}

#[async_trait::async_trait]
impl SeriesSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn fetch(&self) -> FetchResult<RawBundle> {
        self.instants.lock().unwrap().push(Instant::now());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(FetchError::Envelope("connection reset".to_string()));
        }
        Ok(forecast())
    }
}

#[tokio::test]
async fn test_single_sample_series_at_quarter_past() {
    let db = store().await;
    let bundle = RawBundle {
        hourly: serde_json::from_value::<RawSeries>(json!({
            "time": ["2024-01-01T08:00"],
            "surface_pressure": [1013.0]
        }))
        .unwrap(),
        sub_hourly: serde_json::from_value::<RawSeries>(json!({
            "time": ["2024-01-01T08:15"],
            "temperature_2m": [5.0],
            "precipitation": [0],
            "wind_speed_10m": [3.0],
            "wind_direction_10m": [10],
            "weather_code": [0]
        }))
        .unwrap(),
    };
    let mut scheduler = Scheduler::new(
        Box::new(ReplaySource::new(bundle)),
        Arc::new(db.clone()),
        quarter_past_eight(),
        Duration::from_secs(60),
    );

    let record = scheduler.run_once().await.unwrap();

    assert_eq!(record.data.temperature, 5.0);
    assert_eq!(record.data.wind_speed, 3.0);
    assert_eq!(record.data.precipitation, 0.0);
    assert_eq!(record.data.pressure, 759.0);
    assert_eq!(record.data.wind_direction, "North");
    assert_eq!(record.data.weather, "Clear sky");

    let stored = db.get_recent(10, RecordOrder::IdAsc).await.unwrap();
    assert_eq!(stored, vec![record]);
}

#[tokio::test]
async fn test_poll_once_persists_merged_record() {
    let db = store().await;
    let mut scheduler = Scheduler::new(
        Box::new(ReplaySource::new(forecast())),
        Arc::new(db.clone()),
        quarter_past_eight(),
        Duration::from_secs(60),
    );

    let record = scheduler.run_once().await.unwrap();

    assert_eq!(record.id, 1);
    assert_eq!(record.data.temperature, 5.0);
    assert_eq!(record.data.wind_speed, 3.2);
    assert_eq!(record.data.wind_direction, "North");
    assert_eq!(record.data.precipitation, 0.0);
    assert_eq!(record.data.pressure, 759.0);
    assert_eq!(record.data.weather, "Clear sky");

    let stored = db.get_recent(1, RecordOrder::IdAsc).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, record.id);
    assert_eq!(stored[0].data, record.data);
    assert_eq!(stored[0].created_at, record.created_at);
}

#[tokio::test]
async fn test_failed_iterations_do_not_stop_polling() {
    let db = store().await;
    let instants = Arc::new(Mutex::new(Vec::new()));
    let interval = Duration::from_millis(100);
    let mut scheduler = Scheduler::new(
        Box::new(FlakySource::new(2, instants.clone())),
        Arc::new(db.clone()),
        quarter_past_eight(),
        interval,
    );

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move { scheduler.run(rx).await });

    let deadline = Instant::now() + Duration::from_secs(5);
    while db.count_records().await.unwrap() < 2 {
        assert!(Instant::now() < deadline, "no records persisted after failures");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tx.send(true).unwrap();

    let stats = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stats.failed, 2);
    assert!(stats.persisted >= 2);
    assert_eq!(stats.iterations, stats.failed + stats.persisted);

    // Every gap includes a full sleep, failures included
    let instants = instants.lock().unwrap();
    for pair in instants.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
}

#[tokio::test]
async fn test_operator_exports_newest_records() {
    let db = store().await;
    let mut scheduler = Scheduler::new(
        Box::new(ReplaySource::new(forecast())),
        Arc::new(db.clone()),
        quarter_past_eight(),
        Duration::from_secs(60),
    );
    for _ in 0..3 {
        scheduler.run_once().await.unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let settings = ExportSettings {
        path: dir.path().join("weather.xlsx"),
        limit: 2,
    };

    let input: &[u8] = b"nope\n  YES \ny\n";
    let mut output = Vec::new();
    let stats = run_operator(
        input,
        &mut output,
        Arc::new(db.clone()),
        Exporter::spawn(settings.clone()),
    )
    .await
    .unwrap();

    assert_eq!(
        stats,
        OperatorStats {
            requested: 2,
            written: 2,
            failed: 0
        }
    );

    let written = std::fs::metadata(&settings.path).unwrap();
    assert!(written.len() > 0);

    let newest = db.get_recent(2, RecordOrder::IdDesc).await.unwrap();
    assert_eq!(newest.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2]);
}
