//! Spreadsheet export of recent weather records
//!
//! Reading the snapshot happens on the async runtime. Workbooks are written
//! by a single writer task, one at a time and in request order, each on a
//! blocking worker so the polling task keeps its cadence.

pub mod prompt;
pub mod rows;
pub mod xlsx;

pub use prompt::*;
pub use rows::*;
pub use xlsx::*;

use nowcast_core::{RecordOrder, RecordStore, StorageError};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

pub const DEFAULT_EXPORT_PATH: &str = "test.xlsx";
pub const DEFAULT_EXPORT_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to read records: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Export worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Export writer stopped")]
    Closed,
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Where to write and how many records to include
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub path: PathBuf,
    pub limit: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EXPORT_PATH),
            limit: DEFAULT_EXPORT_LIMIT,
        }
    }
}

/// Handle to a queued workbook write; resolves to the row count
pub type ExportJob = oneshot::Receiver<ExportResult<usize>>;

struct WriteRequest {
    rows: Vec<ExportRow>,
    path: PathBuf,
    done: oneshot::Sender<ExportResult<usize>>,
}

/// Snapshots recent records and queues them for the writer task
#[derive(Clone)]
pub struct Exporter {
    settings: ExportSettings,
    queue: mpsc::UnboundedSender<WriteRequest>,
}

impl Exporter {
    /// Start the writer task. Must be called inside a Tokio runtime.
    ///
    /// The writer stops once every clone of the exporter is dropped and the
    /// queue is drained.
    pub fn spawn(settings: ExportSettings) -> Self {
        let (queue, mut requests) = mpsc::unbounded_channel::<WriteRequest>();

        tokio::spawn(async move {
            while let Some(WriteRequest { rows, path, done }) = requests.recv().await {
                let result = tokio::task::spawn_blocking(move || -> ExportResult<usize> {
                    write_workbook(&rows, &path)?;
                    Ok(rows.len())
                })
                .await
                .map_err(ExportError::from)
                .and_then(|written| written);

                // Nobody waiting is fine; the caller chose not to report
                let _ = done.send(result);
            }
            debug!("Export writer stopped");
        });

        Self { settings, queue }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Snapshot the newest records and queue the workbook write
    #[instrument(skip(self, store), fields(path = %self.settings.path.display(), limit = self.settings.limit))]
    pub async fn export_recent<S>(&self, store: &S) -> ExportResult<ExportJob>
    where
        S: RecordStore + ?Sized,
    {
        let records = store
            .get_recent(self.settings.limit, RecordOrder::IdDesc)
            .await?;
        let rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();

        info!("Exporting {} records to {}", rows.len(), self.settings.path.display());

        let (done, job) = oneshot::channel();
        self.queue
            .send(WriteRequest {
                rows,
                path: self.settings.path.clone(),
                done,
            })
            .map_err(|_| ExportError::Closed)?;
        Ok(job)
    }
}

/// Wait for an export job and flatten its result
pub async fn finish(job: ExportJob) -> ExportResult<usize> {
    job.await.map_err(|_| ExportError::Closed)?
}
