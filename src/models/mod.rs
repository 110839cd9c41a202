// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod record;
pub mod slot;
pub mod state;

pub use record::{DailyRecord, RecordPatch};
pub use slot::PrayerSlot;
pub use state::PrayerState;
