// SPDX-License-Identifier: MIT

//! Salah-Tracker: daily prayer completion tracking
//!
//! This crate provides the backend for marking the five daily prayers as
//! complete/incomplete and reconciling that state with a per-user,
//! per-day record in the store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreStore;
use services::TrackingRegistry;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub registry: TrackingRegistry<FirestoreStore>,
}
