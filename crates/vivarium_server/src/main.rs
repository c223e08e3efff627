//! HTTP service wrapping the simulation engine: start a run, stream
//! per-tick snapshots over Server-Sent Events, expose a liveness check.
//!
//! The service is a thin I/O layer; all simulation semantics live in
//! `vivarium_core`.

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vivarium_core::{SimConfig, Simulation};

/// Server state: the single simulation behind a lock.
struct AppState {
    sim: Mutex<Simulation>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vivarium_server=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = router(Arc::new(AppState {
        sim: Mutex::new(Simulation::new()),
    }));
    let addr = SocketAddr::from(([127, 0, 0, 1], 5000));

    tracing::info!("Vivarium server listening on {}", addr);
    tracing::info!("    Start:  POST http://{}/api/simulation", addr);
    tracing::info!("    Stream: GET  http://{}/api/simulation/stream", addr);
    tracing::info!("    Health: GET  http://{}/api/health", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/simulation", post(start_simulation))
        .route("/api/simulation/stream", get(simulation_stream))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness check.
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let started = state.sim.lock().map(|s| s.is_started()).unwrap_or(false);
    Json(serde_json::json!({
        "status": "ok",
        "simulation_started": started
    }))
}

/// Starts a run from a partial config body; unspecified fields take the
/// documented defaults. Replies with the resolved configuration.
async fn start_simulation(
    State(state): State<Arc<AppState>>,
    Json(config): Json<SimConfig>,
) -> impl IntoResponse {
    let mut sim = match state.sim.lock() {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!("Failed to lock simulation state: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "simulation state unavailable" })),
            )
                .into_response();
        }
    };
    match sim.start(config) {
        Ok(resolved) => Json(serde_json::json!({
            "message": "Simulation started successfully",
            "params": resolved
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("Rejected start request: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Streams the run as Server-Sent Events: each event advances one tick and
/// carries the full snapshot. The stream ends after the event whose snapshot
/// reports the simulation over, or immediately with an error event if no
/// simulation was started.
async fn simulation_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = futures::stream::unfold((state, false), |(state, finished)| async move {
        if finished {
            return None;
        }
        let (event, finished) = advance_one_tick(&state);
        Some((Ok(event), (state, finished)))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// One stream iteration: step, snapshot, serialize. Returns the event and
/// whether the stream is finished.
fn advance_one_tick(state: &Arc<AppState>) -> (Event, bool) {
    let mut sim = match state.sim.lock() {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!("Failed to lock simulation state: {}", e);
            return (error_event("simulation state unavailable"), true);
        }
    };
    if let Err(e) = sim.step() {
        tracing::error!("Simulation step failed: {}", e);
        return (error_event(&e.to_string()), true);
    }
    let data = match sim.snapshot() {
        Ok(data) => data,
        Err(e) => return (error_event(&e.to_string()), true),
    };
    match serde_json::to_string(&data) {
        Ok(json) => (
            Event::default().data(json),
            data.is_simulation_over,
        ),
        Err(e) => {
            tracing::error!("Failed to serialize snapshot: {}", e);
            (error_event("snapshot serialization failed"), true)
        }
    }
}

fn error_event(message: &str) -> Event {
    Event::default().data(serde_json::json!({ "error": message }).to_string())
}
