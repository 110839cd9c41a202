// SPDX-License-Identifier: MIT

//! The five daily prayer slots.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the five fixed prayer identifiers tracked per day.
///
/// The set is total and immutable; `ALL` gives the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerSlot {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerSlot {
    /// Canonical ordering for storage fields and UI iteration.
    pub const ALL: [PrayerSlot; 5] = [
        PrayerSlot::Fajr,
        PrayerSlot::Dhuhr,
        PrayerSlot::Asr,
        PrayerSlot::Maghrib,
        PrayerSlot::Isha,
    ];

    /// Wire identifier, also used as the storage field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "fajr",
            PrayerSlot::Dhuhr => "dhuhr",
            PrayerSlot::Asr => "asr",
            PrayerSlot::Maghrib => "maghrib",
            PrayerSlot::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "Fajr",
            PrayerSlot::Dhuhr => "Dhuhr",
            PrayerSlot::Asr => "Asr",
            PrayerSlot::Maghrib => "Maghrib",
            PrayerSlot::Isha => "Isha",
        }
    }

    pub fn arabic_name(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "الفجر",
            PrayerSlot::Dhuhr => "الظهر",
            PrayerSlot::Asr => "العصر",
            PrayerSlot::Maghrib => "المغرب",
            PrayerSlot::Isha => "العشاء",
        }
    }

    /// Fixed scheduled time label shown next to the slot.
    ///
    /// These are static display strings; prayer-time computation is
    /// intentionally not part of this service.
    pub fn time_label(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "5:30 AM",
            PrayerSlot::Dhuhr => "12:15 PM",
            PrayerSlot::Asr => "3:45 PM",
            PrayerSlot::Maghrib => "6:20 PM",
            PrayerSlot::Isha => "8:00 PM",
        }
    }
}

impl std::fmt::Display for PrayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerSlot {
    type Err = AppError;

    /// Parse a wire identifier. This is the only place an unknown slot can
    /// surface; past this boundary slots are valid by construction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerSlot::Fajr),
            "dhuhr" | "zuhr" => Ok(PrayerSlot::Dhuhr),
            "asr" => Ok(PrayerSlot::Asr),
            "maghrib" => Ok(PrayerSlot::Maghrib),
            "isha" => Ok(PrayerSlot::Isha),
            _ => Err(AppError::InvalidSlot(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_ordering() {
        let ids: Vec<&str> = PrayerSlot::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, ["fajr", "dhuhr", "asr", "maghrib", "isha"]);
    }

    #[test]
    fn test_parse_known_identifiers() {
        for slot in PrayerSlot::ALL {
            assert_eq!(slot.as_str().parse::<PrayerSlot>().unwrap(), slot);
        }
        // Accepted alias spelling
        assert_eq!("zuhr".parse::<PrayerSlot>().unwrap(), PrayerSlot::Dhuhr);
        assert_eq!("Fajr".parse::<PrayerSlot>().unwrap(), PrayerSlot::Fajr);
    }

    #[test]
    fn test_parse_unknown_identifier() {
        let err = "tahajjud".parse::<PrayerSlot>().unwrap_err();
        assert!(matches!(err, AppError::InvalidSlot(_)));
    }

    #[test]
    fn test_serde_uses_wire_identifier() {
        let json = serde_json::to_string(&PrayerSlot::Maghrib).unwrap();
        assert_eq!(json, "\"maghrib\"");
        let slot: PrayerSlot = serde_json::from_str("\"isha\"").unwrap();
        assert_eq!(slot, PrayerSlot::Isha);
    }
}
