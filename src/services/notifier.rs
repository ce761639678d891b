//! Phase transition notifications

use tracing::{info, warn};

/// Fire-and-forget delivery of a title/body notification
pub trait Notifier: Send {
    fn notify(&self, title: &str, body: &str) -> Result<(), String>;
}

/// Writes notifications to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), String> {
        info!("Notification: {} - {}", title, body);
        Ok(())
    }
}

/// Native desktop notifications through notify-rust.
///
/// Delivery happens on tokio's blocking pool so a slow notification daemon
/// never holds up the controller.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), String> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| format!("No runtime available for notification delivery: {}", e))?;

        let app_name = self.app_name.clone();
        let title = title.to_string();
        let body = body.to_string();

        handle.spawn_blocking(move || {
            let result = notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&body)
                .show();
            if let Err(e) = result {
                warn!("Failed to show desktop notification: {}", e);
            }
        });

        Ok(())
    }
}

/// Title and body announcing the start of a break
pub fn break_start_message(break_seconds: u32) -> (String, String) {
    (
        "Time for a break".to_string(),
        format!("Take {} seconds to rest your eyes and stretch your neck.", break_seconds),
    )
}

/// Title and body announcing the return to work
pub fn work_start_message() -> (String, String) {
    (
        "Break is over".to_string(),
        "Starting a new round of focused work.".to_string(),
    )
}
