// SPDX-License-Identifier: MIT

//! Per-user tracking session cache.

use crate::db::RecordStore;
use crate::error::Result;
use crate::services::TrackingSync;
use crate::time_utils::today_local;
use dashmap::DashMap;
use std::sync::Arc;

/// Caches one live [`TrackingSync`] per signed-in user.
///
/// A session is loaded lazily on first access and replaced when the day it
/// was loaded for is no longer today, so the first request after midnight
/// starts a fresh record instead of mutating yesterday's.
pub struct TrackingRegistry<S: RecordStore> {
    store: Arc<S>,
    sessions: DashMap<String, Arc<TrackingSync<S>>>,
}

impl<S: RecordStore> TrackingRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sessions: DashMap::new(),
        }
    }

    /// Get the user's session for today, loading or reloading as needed.
    pub async fn session(&self, user_id: &str) -> Result<Arc<TrackingSync<S>>> {
        let today = today_local();

        if let Some(existing) = self.sessions.get(user_id) {
            if existing.day() == today {
                return Ok(existing.clone());
            }
        }

        // Load outside the map lock; if two requests race here, the first
        // inserted session wins and the other load is discarded.
        let loaded = Arc::new(TrackingSync::load(self.store.clone(), user_id).await?);

        let entry = self
            .sessions
            .entry(user_id.to_string())
            .and_modify(|existing| {
                if existing.day() != today {
                    *existing = loaded.clone();
                }
            })
            .or_insert_with(|| loaded.clone());

        Ok(entry.value().clone())
    }

    /// Number of cached sessions (test inspection).
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::PrayerSlot;

    #[tokio::test]
    async fn test_session_is_cached_per_user() {
        let registry = TrackingRegistry::new(Arc::new(MemoryStore::new()));

        let first = registry.session("user-1").await.unwrap();
        let again = registry.session("user-1").await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        registry.session("user-2").await.unwrap();
        assert_eq!(registry.session_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_day_session_is_reloaded() {
        let store = Arc::new(MemoryStore::new());
        let registry = TrackingRegistry::new(store.clone());

        // Seed a session loaded for yesterday, as if the server crossed
        // midnight while it was cached
        let yesterday = today_local().pred_opt().unwrap();
        let stale = Arc::new(
            TrackingSync::load_for_day(store, "user-1", yesterday)
                .await
                .unwrap(),
        );
        registry.sessions.insert("user-1".to_string(), stale.clone());

        let fresh = registry.session("user-1").await.unwrap();
        assert!(!Arc::ptr_eq(&stale, &fresh));
        assert_eq!(fresh.day(), today_local());
        assert_eq!(registry.session_count(), 1);
    }

    #[tokio::test]
    async fn test_cached_session_sees_prior_toggles() {
        let store = Arc::new(MemoryStore::new());
        let registry = TrackingRegistry::new(store);

        registry
            .session("user-1")
            .await
            .unwrap()
            .toggle(PrayerSlot::Dhuhr)
            .await
            .unwrap();

        let snapshot = registry.session("user-1").await.unwrap().snapshot().await;
        assert!(snapshot.state.flag(PrayerSlot::Dhuhr));
    }
}
