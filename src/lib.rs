pub mod app;
pub mod catalog;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod profile;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod storage;
pub mod week;

pub use app::router;
pub use errors::{AppError, LedgerError};
pub use ledger::{Ledger, SnapshotSink};
pub use models::{Category, Day, DayRecord, FactorInput, FactorValue, LedgerSnapshot};
pub use state::AppState;
pub use storage::{FileSink, SinkWriter, load_profile, load_snapshot, resolve_data_path, resolve_profile_path};
pub use week::WeekKey;
