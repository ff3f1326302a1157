// Module: http
// Viewer page, MJPEG stream endpoint and the settings REST API.

pub mod error;
pub mod settings;
pub mod stream;

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use camcast_core::{CaptureState, FrameBroadcaster, SettingsStore};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Arc<FrameBroadcaster>,
    pub settings: SettingsStore,
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_stream", get(stream::video_stream))
        .route("/healthz", get(healthz))
        .route(
            "/api/settings/{section}/{key}",
            get(settings::get_setting)
                .put(settings::put_setting)
                .delete(settings::delete_setting),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Viewer page: a static shell pointing an `<img>` at the stream.
async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let capture = match state.broadcaster.state() {
        CaptureState::Running => "running",
        CaptureState::Stopped => "stopped",
    };
    Json(serde_json::json!({ "status": "ok", "capture": capture }))
}
