// SPDX-License-Identifier: MIT

//! Toggle-and-persist protocol for daily prayer tracking.
//!
//! Handles the core workflow:
//! 1. Flip the requested slot optimistically in the local state
//! 2. Issue a single merge upsert for that slot against the day's record
//! 3. On success, reconcile local state from the authoritative record
//! 4. On failure, revert the slot and surface the error
//!
//! Each in-flight write is stamped with a per-slot sequence number; a
//! resolution that is no longer the latest issued for its slot is
//! discarded so it can never overwrite a newer local value.

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{PrayerSlot, PrayerState, RecordPatch};
use crate::time_utils::today_local;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Observable protocol events for the host UI.
///
/// For an applied toggle the order is always `ToggleStarted` followed by
/// exactly one of `ToggleConfirmed` or `ToggleFailed`. A superseded toggle
/// emits no terminal event; the newer toggle on the same slot owns it.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    ToggleStarted {
        slot: PrayerSlot,
    },
    ToggleConfirmed {
        slot: PrayerSlot,
        completed: bool,
    },
    ToggleFailed {
        slot: PrayerSlot,
        reverted_to: bool,
        message: String,
    },
}

/// Result of a completed toggle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The write was applied and confirmed by the store.
    Confirmed { completed: bool },
    /// A newer toggle on the same slot was issued before this one
    /// resolved; the resolution was discarded with no local effect.
    Superseded,
}

/// Point-in-time view of the tracked day for rendering.
#[derive(Debug, Clone)]
pub struct TrackingSnapshot {
    pub date: NaiveDate,
    pub state: PrayerState,
    /// Slots with a write still in flight, in canonical order.
    pub saving: Vec<PrayerSlot>,
}

/// Per-slot write sequencing.
///
/// `issued` counts toggles requested, `settled` counts resolutions that
/// came back (applied or discarded). The slot is in flight while they
/// differ, and a resolution is applied only if its stamp equals `issued`.
#[derive(Debug, Clone, Copy, Default)]
struct SlotSequence {
    issued: u64,
    settled: u64,
}

#[derive(Debug)]
struct Inner {
    state: PrayerState,
    slots: HashMap<PrayerSlot, SlotSequence>,
}

/// Reconciles the local five-slot view against the remote day record.
///
/// One instance per signed-in user session. All methods take `&self`;
/// overlapping toggles on different slots proceed concurrently, and the
/// state lock is never held across a store round trip.
#[derive(Debug)]
pub struct TrackingSync<S: RecordStore> {
    store: Arc<S>,
    user_id: String,
    day: NaiveDate,
    inner: Mutex<Inner>,
    events: broadcast::Sender<TrackingEvent>,
}

impl<S: RecordStore> TrackingSync<S> {
    /// Fetch the record for `(user_id, today)` and build the session view.
    ///
    /// A missing record means a fresh day (all flags false); a transport
    /// error propagates instead of being masked as an empty day.
    pub async fn load(store: Arc<S>, user_id: impl Into<String>) -> Result<Self> {
        Self::load_for_day(store, user_id, today_local()).await
    }

    /// Load a session pinned to a specific calendar day.
    pub(crate) async fn load_for_day(
        store: Arc<S>,
        user_id: impl Into<String>,
        day: NaiveDate,
    ) -> Result<Self> {
        let user_id = user_id.into();

        let record = store.fetch_record(&user_id, day).await?;
        tracing::debug!(
            user_id = %user_id,
            day = %day,
            found = record.is_some(),
            "Loaded tracking record"
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            store,
            user_id,
            day,
            inner: Mutex::new(Inner {
                state: PrayerState::from_record(record.as_ref()),
                slots: HashMap::new(),
            }),
            events,
        })
    }

    /// The calendar day this session tracks.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Subscribe to protocol events (the notification sink).
    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.events.subscribe()
    }

    /// Current view of the day, including in-flight markers.
    pub async fn snapshot(&self) -> TrackingSnapshot {
        let inner = self.inner.lock().await;
        let saving = PrayerSlot::ALL
            .iter()
            .copied()
            .filter(|slot| {
                inner
                    .slots
                    .get(slot)
                    .is_some_and(|seq| seq.issued > seq.settled)
            })
            .collect();

        TrackingSnapshot {
            date: self.day,
            state: inner.state,
            saving,
        }
    }

    /// Flip one slot and persist the change.
    ///
    /// The local flip is visible to concurrent snapshots immediately; the
    /// remote write confirms or reverts it. Exactly one upsert is issued
    /// per call, and no retry happens here; the caller decides whether
    /// the user re-issues a failed toggle.
    pub async fn toggle(&self, slot: PrayerSlot) -> Result<ToggleOutcome> {
        // The upsert key is pinned before the round trip starts, so a
        // midnight rollover mid-flight cannot split the day's record.
        let date = self.day;

        let (seq, previous, desired) = {
            let mut inner = self.inner.lock().await;
            let previous = inner.state.flag(slot);
            let desired = !previous;

            let tracker = inner.slots.entry(slot).or_default();
            tracker.issued += 1;
            let seq = tracker.issued;

            inner.state = inner.state.with_slot(slot, desired);
            (seq, previous, desired)
        };

        self.emit(TrackingEvent::ToggleStarted { slot });
        tracing::debug!(
            user_id = %self.user_id,
            slot = slot.as_str(),
            seq,
            desired,
            "Toggle issued"
        );

        let patch = RecordPatch::for_slot(slot, desired);
        let result = self.store.upsert_record(&self.user_id, date, &patch).await;

        let mut inner = self.inner.lock().await;
        let tracker = inner.slots.entry(slot).or_default();
        tracker.settled += 1;
        let is_latest = seq == tracker.issued;

        if !is_latest {
            // A newer toggle owns this slot; this resolution is discarded
            // whether the remote write succeeded or failed. It completed
            // remotely but has no further local effect.
            tracing::debug!(
                user_id = %self.user_id,
                slot = slot.as_str(),
                seq,
                latest = tracker.issued,
                "Stale resolution discarded"
            );
            return Ok(ToggleOutcome::Superseded);
        }

        match result {
            Ok(record) => {
                // The returned record is authoritative: replacing all five
                // flags repairs any stale merge from a racing write on
                // another slot. Slots with their own write still in flight
                // keep the optimistic value until that write settles.
                let mut next = PrayerState::from_record(Some(&record));
                for (&other, seqs) in inner.slots.iter() {
                    if seqs.issued > seqs.settled {
                        next = next.with_slot(other, inner.state.flag(other));
                    }
                }
                inner.state = next;
                drop(inner);

                self.emit(TrackingEvent::ToggleConfirmed {
                    slot,
                    completed: desired,
                });
                tracing::info!(
                    user_id = %self.user_id,
                    slot = slot.as_str(),
                    completed = desired,
                    "Toggle confirmed"
                );
                Ok(ToggleOutcome::Confirmed { completed: desired })
            }
            Err(err) => {
                inner.state = inner.state.with_slot(slot, previous);
                drop(inner);

                self.emit(TrackingEvent::ToggleFailed {
                    slot,
                    reverted_to: previous,
                    message: err.to_string(),
                });
                tracing::warn!(
                    user_id = %self.user_id,
                    slot = slot.as_str(),
                    error = %err,
                    "Toggle failed, slot reverted"
                );
                Err(err)
            }
        }
    }

    fn emit(&self, event: TrackingEvent) {
        // No subscribers is fine; events are advisory for the host UI.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_load_from_empty_store_is_fresh_day() {
        let store = Arc::new(MemoryStore::new());
        let sync = TrackingSync::load(store, "user-1").await.unwrap();

        let snapshot = sync.snapshot().await;
        assert_eq!(snapshot.state.completed_count(), 0);
        assert_eq!(snapshot.state.completion_ratio(), 0.0);
        assert!(snapshot.saving.is_empty());
    }

    #[tokio::test]
    async fn test_load_propagates_store_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_fetches(true);

        let err = TrackingSync::load(store, "user-1").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_toggle_confirms_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let sync = TrackingSync::load(store.clone(), "user-1").await.unwrap();

        let outcome = sync.toggle(PrayerSlot::Fajr).await.unwrap();
        assert_eq!(outcome, ToggleOutcome::Confirmed { completed: true });

        let snapshot = sync.snapshot().await;
        assert!(snapshot.state.flag(PrayerSlot::Fajr));
        assert!(snapshot.saving.is_empty());

        // The record was lazily created by the first toggle
        let stored = store.stored_record("user-1", sync.day()).await.unwrap();
        assert!(stored.fajr);
        assert!(stored.id.is_some());
    }

    #[tokio::test]
    async fn test_toggle_back_unsets_flag() {
        let store = Arc::new(MemoryStore::new());
        let sync = TrackingSync::load(store, "user-1").await.unwrap();

        sync.toggle(PrayerSlot::Asr).await.unwrap();
        let outcome = sync.toggle(PrayerSlot::Asr).await.unwrap();

        assert_eq!(outcome, ToggleOutcome::Confirmed { completed: false });
        assert!(!sync.snapshot().await.state.flag(PrayerSlot::Asr));
    }

    #[tokio::test]
    async fn test_failed_toggle_reverts_and_errors() {
        let store = Arc::new(MemoryStore::new());
        let sync = TrackingSync::load(store.clone(), "user-1").await.unwrap();

        sync.toggle(PrayerSlot::Maghrib).await.unwrap();
        let before = sync.snapshot().await.state;

        store.set_fail_upserts(true);
        let err = sync.toggle(PrayerSlot::Isha).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));

        let after = sync.snapshot().await;
        assert_eq!(after.state, before);
        assert_eq!(after.state.completed_count(), before.completed_count());
        assert!(after.saving.is_empty());
    }
}
