//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Settings, Snapshot};

/// Response for the settings query and update endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
}

/// Response for start and pause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunningResponse {
    pub running: bool,
}

/// Response for reset and the skip commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub ok: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: Snapshot,
}

impl CommandResponse {
    pub fn ok(message: String, state: Snapshot) -> Self {
        Self {
            ok: true,
            message,
            timestamp: Utc::now(),
            state,
        }
    }
}

/// Timer state enriched with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: Snapshot,
    /// Remaining time formatted as `mm:ss`
    pub remaining: String,
    pub progress: f64,
    pub break_display_open: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
