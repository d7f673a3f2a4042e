//! vs-api - HTTP control API for Visionary Solutions encoders/decoders
//!
//! Translates REST calls into device intents, submits them to the shared
//! request dispatcher and renders the replies as JSON.
//!
//! # Usage
//!
//! ```ignore
//! use vs_api::{create_router, AppState, FixedLevel};
//! use vs_client::{Dispatcher, DispatcherConfig, HttpTransport};
//!
//! let transport = HttpTransport::new(credentials)?;
//! let (dispatcher, _worker) = Dispatcher::spawn(Arc::new(transport), DispatcherConfig::default());
//! let state = AppState::new(dispatcher, Arc::new(FixedLevel::new(LevelFilter::INFO)));
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod log_level;
pub mod models;
pub mod resolve;
pub mod state;

pub use error::ApiError;
pub use log_level::{FixedLevel, LogLevelControl, ReloadLevel};
pub use state::AppState;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

/// Create the control API router with the given application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { Json("healthy") }))
        // Log level
        .route("/log-level", get(handlers::log_level::get_log_level))
        .route(
            "/log-level/{level}",
            put(handlers::log_level::set_log_level),
        )
        // Stream host routes
        .route(
            "/input/{encoder}/{decoder}",
            get(handlers::input::set_stream_host),
        )
        .route(
            "/input/get/{address}",
            get(handlers::input::get_connected_host),
        )
        .route(
            "/configure/{encoder}",
            put(handlers::input::configure_device),
        )
        // Per-device routes
        .route(
            "/{address}/videowall",
            post(handlers::videowall::set_video_wall),
        )
        .route(
            "/{address}/hardware",
            get(handlers::device::get_device_info),
        )
        .route("/{address}/signal", get(handlers::device::get_signal))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
