use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use ac_common::{
    AcController, ControllerConfig, ControllerStatus, CycleMode, FanSpeed, Schedule,
};

use crate::{
    cycle::{CycleRunner, SharedController},
    driver::BoxedDriver,
};

#[derive(Clone)]
struct AppState {
    controller: SharedController,
    cycle: Arc<CycleRunner>,
    schedule: Arc<Mutex<Schedule>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    #[serde(default)]
    speed: FanSpeed,
}

#[derive(Debug, Deserialize)]
struct CycleSettingsRequest {
    #[serde(default)]
    mode: CycleMode,
    #[serde(default = "default_cycle_speed")]
    speed: FanSpeed,
}

fn default_cycle_speed() -> FanSpeed {
    FanSpeed::Med
}

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct ModeResponse {
    status: &'static str,
    current_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct CycleSettingsResponse {
    status: &'static str,
    cycle_mode: &'static str,
    cycle_fan_speed: &'static str,
}

#[derive(Debug, Serialize)]
struct ScheduleResponse {
    status: &'static str,
    schedule_enabled: bool,
    start_time: Option<String>,
    end_time: Option<String>,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = config_from_env();
    config.sanitize();

    let driver = build_driver(&config)?;
    let controller: SharedController = Arc::new(Mutex::new(AcController::new(driver)));
    let cycle = Arc::new(CycleRunner::new(Arc::clone(&controller), &config));

    let app_state = AppState {
        controller: Arc::clone(&controller),
        cycle: Arc::clone(&cycle),
        schedule: Arc::new(Mutex::new(Schedule::default())),
    };

    let web_root = format!("{}/web", env!("CARGO_MANIFEST_DIR"));
    let app = router(app_state).fallback_service(ServeDir::new(web_root));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse().unwrap();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind controller server at {addr}"))?;

    info!("AC controller listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Release the unit in a known state: join the cycle task, then
    // force everything off before the pins are dropped.
    cycle.stop().await;
    controller.lock().await.turn_off();
    info!("AC controller shut down");
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/fan", post(handle_set_fan))
        .route("/api/cool", post(handle_set_cooling))
        .route("/api/off", post(handle_turn_off))
        .route("/api/cycle/start", post(handle_cycle_start))
        .route("/api/cycle/stop", post(handle_cycle_stop))
        .route("/api/cycle/settings", post(handle_cycle_settings))
        .route("/api/status", get(handle_get_status))
        .route("/api/schedule", post(handle_set_schedule))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
}

fn config_from_env() -> ControllerConfig {
    let mut config = ControllerConfig::default();
    if let Some(port) = env_parse::<u16>("CONTROLLER_HTTP_PORT") {
        config.http_port = port;
    }
    if let Some(secs) = env_parse::<u64>("AC_ON_PHASE_SECS") {
        config.on_phase_secs = secs;
    }
    if let Some(secs) = env_parse::<u64>("AC_OFF_PHASE_SECS") {
        config.off_phase_secs = secs;
    }
    config
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring unparsable {name} value {value:?}");
            None
        }
    }
}

/// Unwraps a JSON body, turning extractor rejections (syntactically
/// invalid JSON, unknown speed/mode variants) into the structured
/// error payload instead of axum's plain-text default.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            warn!("rejected request body: {}", rejection.body_text());
            Err(error_response(StatusCode::BAD_REQUEST, &rejection.body_text()))
        }
    }
}

#[cfg(feature = "gpio")]
fn build_driver(config: &ControllerConfig) -> anyhow::Result<BoxedDriver> {
    let driver = crate::driver::GpioDriver::new(&config.pins)?;
    info!("GPIO outputs acquired: {:?}", config.pins);
    Ok(Box::new(driver))
}

#[cfg(not(feature = "gpio"))]
fn build_driver(config: &ControllerConfig) -> anyhow::Result<BoxedDriver> {
    let _ = &config.pins;
    info!("no GPIO support compiled in, output writes go to the log");
    Ok(Box::new(crate::driver::LogDriver))
}

async fn handle_set_fan(
    State(state): State<AppState>,
    body: Result<Json<SpeedRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let current_mode = {
        let mut controller = state.controller.lock().await;
        controller.set_fan(request.speed);
        controller.current_mode()
    };
    info!("fan mode set to {}", request.speed.as_str());

    Json(ModeResponse {
        status: "success",
        current_mode: current_mode.as_str(),
    })
    .into_response()
}

async fn handle_set_cooling(
    State(state): State<AppState>,
    body: Result<Json<SpeedRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let current_mode = {
        let mut controller = state.controller.lock().await;
        controller.set_cooling(request.speed);
        controller.current_mode()
    };
    info!("cooling mode set to {}", request.speed.as_str());

    Json(ModeResponse {
        status: "success",
        current_mode: current_mode.as_str(),
    })
    .into_response()
}

async fn handle_turn_off(State(state): State<AppState>) -> impl IntoResponse {
    let current_mode = {
        let mut controller = state.controller.lock().await;
        controller.turn_off();
        controller.current_mode()
    };
    info!("AC system turned off");

    Json(ModeResponse {
        status: "success",
        current_mode: current_mode.as_str(),
    })
}

async fn handle_cycle_start(State(state): State<AppState>) -> impl IntoResponse {
    state.cycle.start().await;
    let current_mode = state.controller.lock().await.current_mode();

    Json(ModeResponse {
        status: "success",
        current_mode: current_mode.as_str(),
    })
}

async fn handle_cycle_stop(State(state): State<AppState>) -> impl IntoResponse {
    state.cycle.stop().await;
    let current_mode = state.controller.lock().await.current_mode();

    Json(ModeResponse {
        status: "success",
        current_mode: current_mode.as_str(),
    })
}

async fn handle_cycle_settings(
    State(state): State<AppState>,
    body: Result<Json<CycleSettingsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    state.cycle.set_settings(request.mode, request.speed).await;
    let settings = state.cycle.settings().await;
    info!(
        "cycle settings set to {} {}",
        settings.mode.as_str(),
        settings.speed.as_str()
    );

    Json(CycleSettingsResponse {
        status: "success",
        cycle_mode: settings.mode.as_str(),
        cycle_fan_speed: settings.speed.as_str(),
    })
    .into_response()
}

async fn handle_get_status(State(state): State<AppState>) -> impl IntoResponse {
    let current_mode = state.controller.lock().await.current_mode();
    let is_running = state.cycle.is_running().await;
    let settings = state.cycle.settings().await;
    let schedule = state.schedule.lock().await;

    Json(ControllerStatus {
        current_mode: current_mode.as_str(),
        is_running,
        schedule_enabled: schedule.enabled,
        cycle_mode: settings.mode.as_str(),
        cycle_fan_speed: settings.speed.as_str(),
        start_time: schedule.start_string(),
        end_time: schedule.end_string(),
    })
}

async fn handle_set_schedule(
    State(state): State<AppState>,
    body: Result<Json<ScheduleRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut schedule = state.schedule.lock().await;
    if let Err(err) = schedule.apply(
        request.start_time.as_deref(),
        request.end_time.as_deref(),
        request.enabled,
    ) {
        warn!("rejected schedule update: {err}");
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }
    info!(
        "schedule set: {:?} - {:?}, enabled={}",
        schedule.start_string(),
        schedule.end_string(),
        schedule.enabled
    );

    Json(ScheduleResponse {
        status: "success",
        schedule_enabled: schedule.enabled,
        start_time: schedule.start_string(),
        end_time: schedule.end_string(),
    })
    .into_response()
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
