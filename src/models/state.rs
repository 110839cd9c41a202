// SPDX-License-Identifier: MIT

//! In-memory view of today's five prayer flags.
//!
//! Pure data plus derived display values; no I/O and no failure modes.
//! All mutation goes through [`TrackingSync`](crate::services::TrackingSync),
//! which replaces the whole value rather than editing it in place.

use crate::models::{DailyRecord, PrayerSlot};
use serde::Serialize;

/// The five completion flags for the active day, in canonical slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PrayerState {
    flags: [bool; 5],
}

impl PrayerState {
    /// Build the state from a fetched record, or all-false if the day has
    /// no record yet.
    pub fn from_record(record: Option<&DailyRecord>) -> Self {
        let mut flags = [false; 5];
        if let Some(record) = record {
            for (i, slot) in PrayerSlot::ALL.iter().enumerate() {
                flags[i] = record.flag(*slot);
            }
        }
        Self { flags }
    }

    pub fn flag(&self, slot: PrayerSlot) -> bool {
        self.flags[Self::index(slot)]
    }

    /// Copy of this state with exactly one slot's flag overwritten.
    pub fn with_slot(&self, slot: PrayerSlot, completed: bool) -> Self {
        let mut next = *self;
        next.flags[Self::index(slot)] = completed;
        next
    }

    /// Number of completed prayers, in `[0, 5]`.
    pub fn completed_count(&self) -> u8 {
        self.flags.iter().filter(|&&done| done).count() as u8
    }

    /// Completed fraction in `[0.0, 1.0]`.
    pub fn completion_ratio(&self) -> f64 {
        f64::from(self.completed_count()) / PrayerSlot::ALL.len() as f64
    }

    /// Iterate `(slot, completed)` pairs in canonical order.
    pub fn slots(&self) -> impl Iterator<Item = (PrayerSlot, bool)> + '_ {
        PrayerSlot::ALL
            .iter()
            .enumerate()
            .map(move |(i, &slot)| (slot, self.flags[i]))
    }

    fn index(slot: PrayerSlot) -> usize {
        match slot {
            PrayerSlot::Fajr => 0,
            PrayerSlot::Dhuhr => 1,
            PrayerSlot::Asr => 2,
            PrayerSlot::Maghrib => 3,
            PrayerSlot::Isha => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record_with(fajr: bool, dhuhr: bool, asr: bool, maghrib: bool, isha: bool) -> DailyRecord {
        DailyRecord {
            id: Some("rec-1".to_string()),
            user_id: "user-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            fajr,
            dhuhr,
            asr,
            maghrib,
            isha,
            updated_at: "2024-03-11T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_absent_record_is_all_false() {
        let state = PrayerState::from_record(None);
        assert_eq!(state.completed_count(), 0);
        assert_eq!(state.completion_ratio(), 0.0);
    }

    #[test]
    fn test_from_record_is_deterministic() {
        let record = record_with(true, false, true, false, true);
        let a = PrayerState::from_record(Some(&record));
        let b = PrayerState::from_record(Some(&record));
        assert_eq!(a, b);
        assert_eq!(a.completed_count(), 3);
    }

    #[test]
    fn test_with_slot_flips_exactly_one_flag() {
        let state = PrayerState::from_record(Some(&record_with(true, false, false, true, false)));

        for slot in PrayerSlot::ALL {
            let flipped = state.with_slot(slot, !state.flag(slot));
            for other in PrayerSlot::ALL {
                if other == slot {
                    assert_eq!(flipped.flag(other), !state.flag(other));
                } else {
                    assert_eq!(flipped.flag(other), state.flag(other));
                }
            }
        }
    }

    #[test]
    fn test_completion_ratio_steps_by_fifths() {
        let mut state = PrayerState::default();
        for (i, slot) in PrayerSlot::ALL.iter().enumerate() {
            state = state.with_slot(*slot, true);
            assert_eq!(state.completed_count() as usize, i + 1);
            assert!((state.completion_ratio() - (i + 1) as f64 / 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_slots_iterates_in_canonical_order() {
        let state = PrayerState::from_record(Some(&record_with(true, true, false, false, true)));
        let observed: Vec<(PrayerSlot, bool)> = state.slots().collect();
        assert_eq!(
            observed,
            vec![
                (PrayerSlot::Fajr, true),
                (PrayerSlot::Dhuhr, true),
                (PrayerSlot::Asr, false),
                (PrayerSlot::Maghrib, false),
                (PrayerSlot::Isha, true),
            ]
        );
    }
}
