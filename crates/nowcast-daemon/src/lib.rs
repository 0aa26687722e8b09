//! Nowcast daemon
//!
//! Coordinates:
//! - Polling the forecast provider on a fixed interval
//! - Reducing each response to one weather record and storing it
//! - Exporting recent records to a spreadsheet when the operator asks

pub mod clock;
pub mod config;
pub mod operator;
pub mod scheduler;

pub use clock::SystemClock;
pub use config::DaemonConfig;
pub use operator::{run_operator, OperatorStats};
pub use scheduler::{PollError, PollState, PollStats, Scheduler};
