//! Break Alarm - a work/break reminder daemon
//!
//! This is the main entry point for the break-alarm application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use break_alarm::{
    config::Config,
    state::{AppState, Clock, SystemClock, TimerController},
    api::create_router,
    services::{BreakBoard, DesktopNotifier, LogNotifier, Notifier, SettingsStore},
    tasks::heartbeat_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("break_alarm={},tower_http=info", config.log_level()))
        .init();

    info!("Starting break-alarm v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, pulse={}ms",
          config.host, config.port, config.pulse_ms);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier: Box<dyn Notifier> = if config.no_notify {
        Box::new(LogNotifier)
    } else {
        Box::new(DesktopNotifier::new("Break Alarm"))
    };

    let mut controller = TimerController::new(Arc::clone(&clock))
        .with_notifier(notifier)
        .with_break_display(Box::new(BreakBoard::new(config.break_command.clone())));

    // Saved settings first, then command line overrides. The store only
    // subscribes afterwards so one-off flags are not written back.
    let store = (!config.no_persist).then(|| SettingsStore::new(config.settings_file.clone()));
    if let Some(saved) = store.as_ref().and_then(SettingsStore::load) {
        controller.update_settings(&saved);
    }
    let overrides = config.settings_overrides();
    if !overrides.is_empty() {
        controller.update_settings(&overrides);
    }
    if let Some(store) = store {
        info!("Persisting settings to {}", store.path().display());
        controller.subscribe(Box::new(store));
    }

    let settings = controller.settings();
    info!("Timer settings: work={}min, break={}s, auto_start_next={}",
          settings.work_minutes, settings.break_seconds, settings.auto_start_next);

    if config.start {
        controller.start();
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), controller, clock));

    // Start the heartbeat background task
    let heartbeat_state = Arc::clone(&state);
    let period = config.pulse_interval();
    tokio::spawn(async move {
        heartbeat_task(heartbeat_state, period).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /settings            - Current settings");
    info!("  PUT  /settings            - Update settings");
    info!("  GET  /state               - Timer snapshot");
    info!("  POST /timer/start         - Start the countdown");
    info!("  POST /timer/pause         - Pause the countdown");
    info!("  POST /timer/reset         - Back to a fresh work phase");
    info!("  POST /timer/skip-to-break - Start the break now");
    info!("  POST /timer/skip-to-work  - End the break now");
    info!("  POST /break/end           - End the break from the break display");
    info!("  GET  /events              - Event stream (SSE)");
    info!("  GET  /status              - Status with server information");
    info!("  GET  /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
