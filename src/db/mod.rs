//! Record store layer.
//!
//! One capability trait with two implementations: [`FirestoreStore`] for
//! production and [`MemoryStore`] for tests and local development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{DailyRecord, RecordPatch};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Collection names as constants.
pub mod collections {
    /// Daily tracking records (keyed by user_id + date)
    pub const TRACKING: &str = "prayer_tracking";
}

/// Persistence contract for daily tracking records.
///
/// A fetch distinguishes absence (`Ok(None)`) from transport failure
/// (`Err(StoreUnavailable)`). An upsert merges the patch into the
/// `(user_id, date)` record, creating it if absent, and returns the full
/// authoritative post-write record; flags not named in the patch must
/// never be cleared.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, AppError>;

    async fn upsert_record(
        &self,
        user_id: &str,
        date: NaiveDate,
        patch: &RecordPatch,
    ) -> Result<DailyRecord, AppError>;
}
