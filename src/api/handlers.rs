//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    state::{AppState, Phase, SettingsUpdate, Snapshot, TimerController, TimerEvent},
    utils::format_remaining,
};
use super::responses::{CommandResponse, HealthResponse, RunningResponse, SettingsResponse, StatusResponse};

/// Handle GET /settings - Return the current settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.get_settings() {
        Ok(settings) => Ok(Json(SettingsResponse { settings })),
        Err(e) => {
            error!("Failed to get settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT/POST /settings - Merge a partial settings change.
///
/// A missing or malformed body is treated as an empty update.
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<SettingsUpdate>>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    let update = payload.map(|Json(update)| update).unwrap_or_default();

    match state.command("settings:update", |c| {
        c.update_settings(&update);
        c.settings()
    }) {
        Ok(settings) => {
            info!("Settings endpoint called - settings updated");
            Ok(Json(SettingsResponse { settings }))
        }
        Err(e) => {
            error!("Failed to update settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /state - Return a full timer snapshot
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Result<Json<Snapshot>, StatusCode> {
    match state.get_state() {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<RunningResponse>, StatusCode> {
    running_command(&state, "start", TimerController::start)
}

/// Handle POST /timer/pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<RunningResponse>, StatusCode> {
    running_command(&state, "pause", TimerController::pause)
}

/// Handle POST /timer/reset - Stop and rewind to a fresh work phase
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    phase_command(&state, "reset", "Timer reset", TimerController::reset)
}

/// Handle POST /timer/skip-to-break - Start the break now
pub async fn skip_to_break_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    phase_command(&state, "skip-to-break", "Skipped to break", |c| c.skip_to_phase(Phase::Break))
}

/// Handle POST /timer/skip-to-work - End the break now
pub async fn skip_to_work_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    phase_command(&state, "skip-to-work", "Skipped to work", |c| c.skip_to_phase(Phase::Work))
}

/// Handle POST /break/end - "End break" control of the break display
pub async fn end_break_handler(State(state): State<Arc<AppState>>) -> Result<Json<CommandResponse>, StatusCode> {
    phase_command(&state, "end-break", "Break ended", |c| c.skip_to_phase(Phase::Work))
}

/// Handle GET /events - Stream timer events to a view
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    // Subscribe before taking the snapshot so no event falls in between
    let rx = state.subscribe_events();
    let initial = match state.get_state() {
        Ok(snapshot) => Some(TimerEvent::PhaseChanged(snapshot)),
        Err(e) => {
            warn!("Failed to get initial state for event stream: {}", e);
            None
        }
    };
    info!("Event stream opened");

    let live = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let events = stream::iter(initial)
        .chain(live)
        .map(|event| Event::default().event(event.name()).json_data(&event));

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return timer state with server information
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let (snapshot, break_display_open) = match state.with_controller(|c| (c.state(), c.is_break_display_open())) {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        remaining: format_remaining(snapshot.remaining_ms),
        progress: snapshot.progress(),
        state: snapshot,
        break_display_open,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn running_command(
    state: &AppState,
    action: &str,
    op: fn(&mut TimerController),
) -> Result<Json<RunningResponse>, StatusCode> {
    match state.command(action, |c| {
        op(c);
        c.state().running
    }) {
        Ok(running) => Ok(Json(RunningResponse { running })),
        Err(e) => {
            error!("Failed to handle {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn phase_command<F>(state: &AppState, action: &str, message: &str, op: F) -> Result<Json<CommandResponse>, StatusCode>
where
    F: FnOnce(&mut TimerController),
{
    match state.command(action, |c| {
        op(c);
        c.state()
    }) {
        Ok(snapshot) => Ok(Json(CommandResponse::ok(message.to_string(), snapshot))),
        Err(e) => {
            error!("Failed to handle {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
