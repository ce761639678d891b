//! Events pushed from the timer controller to its observers

use serde::{Deserialize, Serialize};

use super::{Settings, Snapshot};

/// State change broadcast after every controller mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TimerEvent {
    /// Remaining time moved without a phase change
    #[serde(rename = "timer:tick")]
    Tick(Snapshot),
    /// Phase entered, or the timer was reset
    #[serde(rename = "timer:phase")]
    PhaseChanged(Snapshot),
    #[serde(rename = "timer:running")]
    RunningChanged { running: bool },
    #[serde(rename = "settings:updated")]
    SettingsChanged { settings: Settings },
}

impl TimerEvent {
    /// Channel name used on the event stream
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Tick(_) => "timer:tick",
            TimerEvent::PhaseChanged(_) => "timer:phase",
            TimerEvent::RunningChanged { .. } => "timer:running",
            TimerEvent::SettingsChanged { .. } => "settings:updated",
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            TimerEvent::Tick(snapshot) | TimerEvent::PhaseChanged(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
