//! Timer settings and the coercion rules applied to incoming updates

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_WORK_MINUTES: u32 = 20;
pub const DEFAULT_BREAK_SECONDS: u32 = 20;

pub const MIN_WORK_MINUTES: u32 = 1;
pub const MAX_WORK_MINUTES: u32 = 180;
pub const MIN_BREAK_SECONDS: u32 = 5;
pub const MAX_BREAK_SECONDS: u32 = 600;

/// User-configured phase durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Length of the work phase in minutes (1..=180)
    pub work_minutes: u32,
    /// Length of the break phase in seconds (5..=600)
    pub break_seconds: u32,
    /// Keep running into the next phase instead of pausing on transition
    pub auto_start_next: bool,
}

impl Settings {
    pub fn work_duration_ms(&self) -> u64 {
        u64::from(self.work_minutes) * 60 * 1000
    }

    pub fn break_duration_ms(&self) -> u64 {
        u64::from(self.break_seconds) * 1000
    }

    /// Merge a partial update, coercing and clamping every field
    pub fn merge(&self, update: &SettingsUpdate) -> Self {
        let work_minutes = match &update.work_minutes {
            Some(value) => coerce_number(value, DEFAULT_WORK_MINUTES, MIN_WORK_MINUTES, MAX_WORK_MINUTES),
            None => self.work_minutes.clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES),
        };
        let break_seconds = match &update.break_seconds {
            Some(value) => coerce_number(value, DEFAULT_BREAK_SECONDS, MIN_BREAK_SECONDS, MAX_BREAK_SECONDS),
            None => self.break_seconds.clamp(MIN_BREAK_SECONDS, MAX_BREAK_SECONDS),
        };
        let auto_start_next = match &update.auto_start_next {
            Some(value) => truthy(value),
            None => self.auto_start_next,
        };

        Self {
            work_minutes,
            break_seconds,
            auto_start_next,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_seconds: DEFAULT_BREAK_SECONDS,
            auto_start_next: true,
        }
    }
}

/// Partial settings change as received from views or the settings file.
///
/// Fields are kept loosely typed so that bad input is corrected rather
/// than rejected at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_seconds: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_next: Option<Value>,
}

impl SettingsUpdate {
    pub fn work_minutes(mut self, minutes: impl Into<Value>) -> Self {
        self.work_minutes = Some(minutes.into());
        self
    }

    pub fn break_seconds(mut self, seconds: impl Into<Value>) -> Self {
        self.break_seconds = Some(seconds.into());
        self
    }

    pub fn auto_start_next(mut self, enabled: bool) -> Self {
        self.auto_start_next = Some(Value::Bool(enabled));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.work_minutes.is_none() && self.break_seconds.is_none() && self.auto_start_next.is_none()
    }
}

impl From<Settings> for SettingsUpdate {
    fn from(settings: Settings) -> Self {
        Self::default()
            .work_minutes(settings.work_minutes)
            .break_seconds(settings.break_seconds)
            .auto_start_next(settings.auto_start_next)
    }
}

/// Zero, non-numeric and non-finite input becomes `default`; everything
/// else is rounded and clamped into `[min, max]`.
fn coerce_number(value: &Value, default: u32, min: u32, max: u32) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(true) => Some(1.0),
        _ => None,
    };

    let number = match parsed {
        Some(n) if n.is_finite() && n != 0.0 => n.round(),
        _ => f64::from(default),
    };

    number.clamp(f64::from(min), f64::from(max)) as u32
}

/// Truthiness for the auto-start flag. The strings "false" and "0" count
/// as false since form inputs send them.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
