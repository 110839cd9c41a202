// SPDX-License-Identifier: MIT

use salah_tracker::config::Config;
use salah_tracker::db::FirestoreStore;
use salah_tracker::routes::create_router;
use salah_tracker::services::TrackingRegistry;
use salah_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test store backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn test_store() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock store (offline).
#[allow(dead_code)]
pub fn test_store_offline() -> FirestoreStore {
    FirestoreStore::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the JWT signing key.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Vec<u8>) {
    let config = Config::test_default();
    let signing_key = config.jwt_signing_key.clone();

    let registry = TrackingRegistry::new(Arc::new(test_store_offline()));

    let state = Arc::new(AppState { config, registry });

    (create_router(state), signing_key)
}
