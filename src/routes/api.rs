// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::PrayerSlot;
use crate::services::{ToggleOutcome, TrackingSnapshot};
use crate::time_utils::format_date_key;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tracking/today", get(get_today))
        .route("/api/tracking/{slot}/toggle", post(toggle_slot))
}

// ─── Today's Tracking ────────────────────────────────────────

/// One prayer slot as rendered by the frontend.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PrayerSlotView {
    pub id: String,
    pub name: String,
    pub arabic_name: String,
    pub time: String,
    pub completed: bool,
    /// A toggle for this slot is still awaiting store confirmation
    pub saving: bool,
}

/// Today's tracking state.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrackingResponse {
    pub date: String,
    pub completed_count: u8,
    pub completion_ratio: f64,
    pub prayers: Vec<PrayerSlotView>,
}

impl TrackingResponse {
    fn from_snapshot(snapshot: &TrackingSnapshot) -> Self {
        let prayers = snapshot
            .state
            .slots()
            .map(|(slot, completed)| PrayerSlotView {
                id: slot.as_str().to_string(),
                name: slot.display_name().to_string(),
                arabic_name: slot.arabic_name().to_string(),
                time: slot.time_label().to_string(),
                completed,
                saving: snapshot.saving.contains(&slot),
            })
            .collect();

        Self {
            date: format_date_key(snapshot.date),
            completed_count: snapshot.state.completed_count(),
            completion_ratio: snapshot.state.completion_ratio(),
            prayers,
        }
    }
}

/// Get the signed-in user's tracking state for today.
async fn get_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TrackingResponse>> {
    let session = state.registry.session(&user.user_id).await?;
    let snapshot = session.snapshot().await;
    Ok(Json(TrackingResponse::from_snapshot(&snapshot)))
}

// ─── Toggle ──────────────────────────────────────────────────

/// Response for a toggle request.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleResponse {
    pub slot: String,
    /// Confirmed value, or `None` when a newer toggle superseded this one
    pub completed: Option<bool>,
    pub superseded: bool,
    pub tracking: TrackingResponse,
}

/// Toggle one prayer slot for today.
///
/// The slot path segment is the wire identifier; an unknown identifier is
/// rejected before any state is touched.
async fn toggle_slot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(slot): Path<String>,
) -> Result<Json<ToggleResponse>> {
    let slot: PrayerSlot = slot.parse()?;

    let session = state.registry.session(&user.user_id).await?;
    let outcome = session.toggle(slot).await?;
    let snapshot = session.snapshot().await;

    let (completed, superseded) = match outcome {
        ToggleOutcome::Confirmed { completed } => (Some(completed), false),
        ToggleOutcome::Superseded => (None, true),
    };

    Ok(Json(ToggleResponse {
        slot: slot.as_str().to_string(),
        completed,
        superseded,
        tracking: TrackingResponse::from_snapshot(&snapshot),
    }))
}
