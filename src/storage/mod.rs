pub mod sqlite;

pub use sqlite::Storage;

use crate::error::Result;
use crate::models::{RepositoryRecord, SignalRecord};

/// Append-only persistence for scan results. Both writes are unconditional
/// inserts; re-running a scan appends new rows rather than replacing old
/// ones.
pub trait SignalSink: Send + Sync {
    fn record_repository(&self, record: &RepositoryRecord) -> Result<()>;

    fn record_file(&self, record: &SignalRecord) -> Result<()>;
}
