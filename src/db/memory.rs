// SPDX-License-Identifier: MIT

//! In-process record store for tests and local development.
//!
//! Implements the same contract as the Firestore store: upsert-by-key
//! merge semantics, one record per `(user_id, date)`, and absence kept
//! distinct from failure. Store failures can be injected to exercise the
//! rollback path without a network.

use crate::db::RecordStore;
use crate::error::AppError;
use crate::models::{DailyRecord, RecordPatch};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<(String, NaiveDate), DailyRecord>,
    next_id: u64,
}

/// Record store backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_fetches: AtomicBool,
    fail_upserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent fetch fail with `StoreUnavailable`.
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent upsert fail with `StoreUnavailable`.
    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    /// Direct read of a stored record, bypassing the trait (test inspection).
    pub async fn stored_record(&self, user_id: &str, date: NaiveDate) -> Option<DailyRecord> {
        let inner = self.inner.lock().await;
        inner.records.get(&(user_id.to_string(), date)).cloned()
    }

    /// Number of records currently stored.
    pub async fn record_count(&self) -> usize {
        self.inner.lock().await.records.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, AppError> {
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "injected fetch failure".to_string(),
            ));
        }

        let inner = self.inner.lock().await;
        Ok(inner.records.get(&(user_id.to_string(), date)).cloned())
    }

    async fn upsert_record(
        &self,
        user_id: &str,
        date: NaiveDate,
        patch: &RecordPatch,
    ) -> Result<DailyRecord, AppError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "injected upsert failure".to_string(),
            ));
        }

        let mut inner = self.inner.lock().await;
        let key = (user_id.to_string(), date);

        let record = match inner.records.get_mut(&key) {
            Some(existing) => {
                patch.apply_to(existing);
                existing.updated_at = format_utc_rfc3339(chrono::Utc::now());
                existing.clone()
            }
            None => {
                // Lazy creation: the id is assigned here, on first write.
                inner.next_id += 1;
                let mut created = DailyRecord::empty(user_id, date);
                created.id = Some(format!("rec-{}", inner.next_id));
                patch.apply_to(&mut created);
                created.updated_at = format_utc_rfc3339(chrono::Utc::now());
                inner.records.insert(key, created.clone());
                created
            }
        };

        Ok(record)
    }
}
