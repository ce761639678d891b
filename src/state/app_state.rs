//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

use super::{BroadcastObserver, Clock, Settings, Snapshot, TimerController, TimerEvent};
use crate::utils::format_uptime;

/// Process-wide state shared by the HTTP handlers and the heartbeat
pub struct AppState {
    /// The one timer controller; the lock serializes commands and pulses
    pub controller: Arc<Mutex<TimerController>>,
    pub clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel every view subscribes to for pushed timer events
    pub event_tx: broadcast::Sender<TimerEvent>,
}

impl AppState {
    /// Wrap a configured controller and hook it up to the event channel
    pub fn new(port: u16, host: String, mut controller: TimerController, clock: Arc<dyn Clock>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        controller.subscribe(Box::new(BroadcastObserver::new(event_tx.clone())));

        Self {
            controller: Arc::new(Mutex::new(controller)),
            clock,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
        }
    }

    /// Run a query against the controller
    pub fn with_controller<F, R>(&self, f: F) -> Result<R, String>
    where
        F: FnOnce(&mut TimerController) -> R,
    {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock timer controller: {}", e))?;
        Ok(f(&mut *controller))
    }

    /// Run a user command against the controller and record it as the last action
    pub fn command<F, R>(&self, action: &str, f: F) -> Result<R, String>
    where
        F: FnOnce(&mut TimerController) -> R,
    {
        let result = self.with_controller(f)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        debug!("Command handled: {}", action);

        Ok(result)
    }

    /// Advance the timer to the clock's current instant
    pub fn pulse(&self) -> Result<(), String> {
        let now = self.clock.now();
        self.with_controller(|controller| controller.on_pulse(now))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub fn get_state(&self) -> Result<Snapshot, String> {
        self.with_controller(|controller| controller.state())
    }

    pub fn get_settings(&self) -> Result<Settings, String> {
        self.with_controller(|controller| controller.settings())
    }

    pub fn is_break_display_open(&self) -> Result<bool, String> {
        self.with_controller(|controller| controller.is_break_display_open())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
