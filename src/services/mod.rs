//! External collaborator module
//!
//! This module contains the collaborators the timer controller drives:
//! user notifications, the break display and settings persistence.

pub mod break_display;
pub mod notifier;
pub mod settings_store;

// Re-export main types
pub use break_display::{BreakBoard, BreakDisplay};
pub use notifier::{break_start_message, work_start_message, DesktopNotifier, LogNotifier, Notifier};
pub use settings_store::SettingsStore;
