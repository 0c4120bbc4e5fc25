//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use cadence_core::ports::HabitStore;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn HabitStore>,
    pub config: Arc<Config>,
}
