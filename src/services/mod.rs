// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod sessions;
pub mod tracking;

pub use sessions::TrackingRegistry;
pub use tracking::{ToggleOutcome, TrackingEvent, TrackingSnapshot, TrackingSync};
