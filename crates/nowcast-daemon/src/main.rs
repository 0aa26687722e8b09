use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::watch;
use tracing::{info, warn};

use nowcast_core::RecordStore;
use nowcast_daemon::{run_operator, DaemonConfig, Scheduler, SystemClock};
use nowcast_db::DbClient;
use nowcast_export::Exporter;
use nowcast_ingest::{OpenMeteoSource, ReplaySource, SeriesSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = DaemonConfig::from_env()?;

    nowcast_obs::init("nowcastd", config.log_format);
    info!("Starting nowcast daemon");
    info!("Loaded configuration: {:?}", config);

    // Initialize database connection
    let db_client = DbClient::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db_client.ping().await.context("Database ping failed")?;

    // Fresh table on every start
    db_client
        .reset_schema()
        .await
        .context("Failed to recreate weather record table")?;
    info!("Database ready");

    let source: Box<dyn SeriesSource> = match &config.replay_file {
        Some(path) => Box::new(
            ReplaySource::from_file(path)
                .with_context(|| format!("Failed to load replay file {}", path.display()))?,
        ),
        None => Box::new(OpenMeteoSource::new().context("Failed to create HTTP client")?),
    };
    info!("Series source ready: {}", source.name());

    let store: Arc<dyn RecordStore> = Arc::new(db_client.clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut scheduler = Scheduler::new(
        source,
        Arc::clone(&store),
        Box::new(SystemClock::provider()),
        config.poll_interval,
    );
    let poller = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    let operator = tokio::spawn(run_operator(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        store,
        Exporter::spawn(config.export.clone()),
    ));

    info!("Daemon running - press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    let stats = poller.await.context("Polling task failed")?;
    info!(?stats, "Polling stopped");

    // The operator task is usually parked on stdin
    operator.abort();
    match operator.await {
        Ok(Ok(stats)) => info!(?stats, "Operator prompt finished"),
        Ok(Err(e)) => warn!("Operator prompt ended with error: {}", e),
        Err(_) => {}
    }

    db_client.close().await;
    info!("Nowcast daemon stopped");
    Ok(())
}
