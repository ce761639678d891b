//! Break Alarm - a work/break reminder daemon
//!
//! This library provides the timer state machine that alternates work and
//! break phases, the collaborators it drives on every transition, and an
//! HTTP API through which any number of views observe and control it.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Phase, Settings, SettingsUpdate, Snapshot, TimerController, TimerEvent};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
