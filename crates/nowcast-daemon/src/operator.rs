//! Operator prompt that triggers spreadsheet exports

use nowcast_core::RecordStore;
use nowcast_export::{finish, is_affirmative, ExportResult, Exporter, PROMPT};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

/// Export outcomes counted over one operator session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorStats {
    pub requested: u64,
    pub written: u64,
    pub failed: u64,
}

impl OperatorStats {
    fn record(&mut self, outcome: Result<ExportResult<usize>, JoinError>) {
        match outcome {
            Ok(Ok(_)) => self.written += 1,
            Ok(Err(_)) | Err(_) => self.failed += 1,
        }
    }
}

/// Prompt on `output`, read answers from `input`, export on "yes"
///
/// Exports are queued on `exporter` and not awaited here, so the prompt
/// comes back immediately. Finished exports are tallied as the loop goes;
/// once `input` reaches end of file the remaining ones are awaited.
pub async fn run_operator<R, W>(
    mut input: R,
    mut output: W,
    store: Arc<dyn RecordStore>,
    exporter: Exporter,
) -> std::io::Result<OperatorStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = OperatorStats::default();
    let mut reports = JoinSet::new();

    loop {
        while let Some(outcome) = reports.try_join_next() {
            stats.record(outcome);
        }

        output.write_all(PROMPT.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            info!("Operator input closed");
            break;
        }

        if !is_affirmative(&line) {
            continue;
        }
        stats.requested += 1;

        match exporter.export_recent(store.as_ref()).await {
            Ok(job) => {
                let path = exporter.settings().path.display().to_string();
                reports.spawn(async move {
                    let result = finish(job).await;
                    match &result {
                        Ok(rows) => info!(rows, %path, "Export written"),
                        Err(e) => error!(%path, "Export failed: {}", e),
                    }
                    result
                });
            }
            Err(e) => {
                stats.failed += 1;
                error!("Export failed: {}", e);
                output
                    .write_all(format!("Export failed: {e}\n").as_bytes())
                    .await?;
            }
        }
    }

    while let Some(outcome) = reports.join_next().await {
        stats.record(outcome);
    }

    info!(?stats, "Operator prompt stopped");
    Ok(stats)
}
