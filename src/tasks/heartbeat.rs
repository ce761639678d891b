//! Heartbeat background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::state::AppState;

/// Pulse the timer controller at a fixed interval.
///
/// The controller measures real elapsed time between pulses, so a late or
/// skipped tick only delays the next update and never loses time.
pub async fn heartbeat_task(state: Arc<AppState>, period: Duration) {
    info!("Starting heartbeat task ({}ms)", period.as_millis());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(e) = state.pulse() {
            error!("Failed to pulse timer: {}", e);
        }
    }
}
