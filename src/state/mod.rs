//! State management module
//!
//! This module contains the timer state machine, its data model and the
//! process-wide application state that wraps it.

pub mod app_state;
pub mod clock;
pub mod controller;
pub mod events;
pub mod observer;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::TimerController;
pub use events::TimerEvent;
pub use observer::{BroadcastObserver, TimerObserver};
pub use settings::{Settings, SettingsUpdate};
pub use timer_state::{Phase, Snapshot, TimerState};
