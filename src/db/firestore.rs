// SPDX-License-Identifier: MIT

//! Firestore-backed record store.
//!
//! Tracking records live in a single collection, one document per
//! `(user_id, date)` pair. The document id is derived from the pair, so
//! the uniqueness invariant is enforced by the store itself and every
//! write is an upsert against the same key. Partial updates use a field
//! mask so a toggle on one slot can never clear the other four flags.

use crate::db::{collections, RecordStore};
use crate::error::AppError;
use crate::models::{DailyRecord, RecordPatch};
use crate::time_utils::{format_date_key, format_utc_rfc3339};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Firestore record store client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All store operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::StoreUnavailable("Store not connected (offline mode)".to_string())
        })
    }

    /// Document id for a `(user_id, date)` pair.
    ///
    /// The user id is opaque input from the identity provider, so it is
    /// percent-encoded to keep the id Firestore-safe.
    fn document_id(user_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", urlencoding::encode(user_id), format_date_key(date))
    }

    fn map_store_error(err: firestore::errors::FirestoreError) -> AppError {
        match err {
            firestore::errors::FirestoreError::DataConflictError(e) => {
                AppError::ConstraintViolation(e.to_string())
            }
            other => AppError::StoreUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    /// Fetch the record for a `(user_id, date)` pair.
    ///
    /// Absence is `Ok(None)`, distinct from a transport error.
    async fn fetch_record(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRACKING)
            .obj()
            .one(&Self::document_id(user_id, date))
            .await
            .map_err(Self::map_store_error)
    }

    /// Merge the patch into the record for `(user_id, date)`, creating it
    /// if absent, and return the authoritative post-write record.
    async fn upsert_record(
        &self,
        user_id: &str,
        date: NaiveDate,
        patch: &RecordPatch,
    ) -> Result<DailyRecord, AppError> {
        let mut record = DailyRecord::empty(user_id, date);
        patch.apply_to(&mut record);
        record.updated_at = format_utc_rfc3339(chrono::Utc::now());

        // Only masked fields are written; flags outside the patch keep
        // whatever value the stored document already has.
        let mut mask: Vec<String> = vec![
            "user_id".to_string(),
            "date".to_string(),
            "updated_at".to_string(),
        ];
        mask.extend(patch.fields().iter().map(|(slot, _)| slot.as_str().to_string()));

        let written: DailyRecord = self
            .get_client()?
            .fluent()
            .update()
            .fields(mask)
            .in_col(collections::TRACKING)
            .document_id(Self::document_id(user_id, date))
            .object(&record)
            .execute()
            .await
            .map_err(Self::map_store_error)?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_encodes_opaque_user_ids() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(
            FirestoreStore::document_id("user-1", date),
            "user-1_2024-03-11"
        );
        // Ids from the identity provider can contain separators
        assert_eq!(
            FirestoreStore::document_id("auth0|abc/def", date),
            "auth0%7Cabc%2Fdef_2024-03-11"
        );
    }

    #[tokio::test]
    async fn test_offline_mock_reports_store_unavailable() {
        let store = FirestoreStore::new_mock();
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        let err = store.fetch_record("user-1", date).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }
}
