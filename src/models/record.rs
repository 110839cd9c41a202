// SPDX-License-Identifier: MIT

//! Daily tracking record model for storage and API.

use crate::models::PrayerSlot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stored tracking row for one user on one calendar date.
///
/// At most one record exists per `(user_id, date)` pair; the store derives
/// the document key from the pair and all writes are upsert-by-key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Opaque remote identifier assigned by the store on first creation
    #[serde(alias = "_firestore_id", default)]
    pub id: Option<String>,
    /// Owner of the record (opaque id from the identity provider)
    pub user_id: String,
    /// Calendar day, no time component
    pub date: NaiveDate,
    // Masked writes only store the slots that have been toggled, so a
    // stored document may lack some flag fields; an absent flag reads
    // as false.
    #[serde(default)]
    pub fajr: bool,
    #[serde(default)]
    pub dhuhr: bool,
    #[serde(default)]
    pub asr: bool,
    #[serde(default)]
    pub maghrib: bool,
    #[serde(default)]
    pub isha: bool,
    /// When this record was last written (RFC3339)
    #[serde(default)]
    pub updated_at: String,
}

impl DailyRecord {
    /// A record with all five flags false, as implied by an absent row.
    pub fn empty(user_id: &str, date: NaiveDate) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            date,
            fajr: false,
            dhuhr: false,
            asr: false,
            maghrib: false,
            isha: false,
            updated_at: String::new(),
        }
    }

    pub fn flag(&self, slot: PrayerSlot) -> bool {
        match slot {
            PrayerSlot::Fajr => self.fajr,
            PrayerSlot::Dhuhr => self.dhuhr,
            PrayerSlot::Asr => self.asr,
            PrayerSlot::Maghrib => self.maghrib,
            PrayerSlot::Isha => self.isha,
        }
    }

    pub fn set_flag(&mut self, slot: PrayerSlot, completed: bool) {
        match slot {
            PrayerSlot::Fajr => self.fajr = completed,
            PrayerSlot::Dhuhr => self.dhuhr = completed,
            PrayerSlot::Asr => self.asr = completed,
            PrayerSlot::Maghrib => self.maghrib = completed,
            PrayerSlot::Isha => self.isha = completed,
        }
    }
}

/// Partial fields for an upsert.
///
/// Only the flags that are `Some` are written; the store must merge and
/// never clear the unspecified ones. A toggle sets exactly one flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    pub fajr: Option<bool>,
    pub dhuhr: Option<bool>,
    pub asr: Option<bool>,
    pub maghrib: Option<bool>,
    pub isha: Option<bool>,
}

impl RecordPatch {
    /// Patch that sets a single slot's flag.
    pub fn for_slot(slot: PrayerSlot, completed: bool) -> Self {
        let mut patch = Self::default();
        match slot {
            PrayerSlot::Fajr => patch.fajr = Some(completed),
            PrayerSlot::Dhuhr => patch.dhuhr = Some(completed),
            PrayerSlot::Asr => patch.asr = Some(completed),
            PrayerSlot::Maghrib => patch.maghrib = Some(completed),
            PrayerSlot::Isha => patch.isha = Some(completed),
        }
        patch
    }

    /// The `(slot, value)` pairs present in this patch, in canonical order.
    pub fn fields(&self) -> Vec<(PrayerSlot, bool)> {
        PrayerSlot::ALL
            .iter()
            .filter_map(|&slot| self.get(slot).map(|v| (slot, v)))
            .collect()
    }

    pub fn get(&self, slot: PrayerSlot) -> Option<bool> {
        match slot {
            PrayerSlot::Fajr => self.fajr,
            PrayerSlot::Dhuhr => self.dhuhr,
            PrayerSlot::Asr => self.asr,
            PrayerSlot::Maghrib => self.maghrib,
            PrayerSlot::Isha => self.isha,
        }
    }

    /// Apply this patch to a record, leaving unspecified flags untouched.
    pub fn apply_to(&self, record: &mut DailyRecord) {
        for (slot, value) in self.fields() {
            record.set_flag(slot, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    #[test]
    fn test_empty_record_has_no_completions() {
        let record = DailyRecord::empty("user-1", date());
        for slot in PrayerSlot::ALL {
            assert!(!record.flag(slot));
        }
    }

    #[test]
    fn test_single_slot_patch_merges() {
        let mut record = DailyRecord::empty("user-1", date());
        record.fajr = true;
        record.isha = true;

        RecordPatch::for_slot(PrayerSlot::Dhuhr, true).apply_to(&mut record);

        assert!(record.fajr);
        assert!(record.dhuhr);
        assert!(record.isha);
        assert!(!record.asr);
        assert!(!record.maghrib);
    }

    #[test]
    fn test_patch_lists_only_present_fields() {
        let patch = RecordPatch::for_slot(PrayerSlot::Asr, false);
        assert_eq!(patch.fields(), vec![(PrayerSlot::Asr, false)]);
    }

    #[test]
    fn test_partial_document_reads_absent_flags_as_false() {
        // A day that has only seen a dhuhr toggle stores no other flags
        let json = r#"{"user_id":"user-1","date":"2024-03-11","dhuhr":true}"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();

        assert!(record.dhuhr);
        for slot in [
            PrayerSlot::Fajr,
            PrayerSlot::Asr,
            PrayerSlot::Maghrib,
            PrayerSlot::Isha,
        ] {
            assert!(!record.flag(slot));
        }
        assert!(record.id.is_none());
        assert!(record.updated_at.is_empty());
    }
}
