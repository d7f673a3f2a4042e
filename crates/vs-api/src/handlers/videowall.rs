//! Video wall handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;
use vs_core::{Intent, VideoWallLayout};

use super::dispatch;
use crate::error::ApiError;
use crate::resolve::resolve_ipv4;
use crate::state::AppState;

/// POST /{address}/videowall
/// Place a decoder inside a video wall grid
pub async fn set_video_wall(
    State(state): State<AppState>,
    Path(address): Path<String>,
    body: Result<Json<VideoWallLayout>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    debug!(%address, "Setting video wall parameters");

    let Json(layout) = body.map_err(|e| {
        debug!(error = %e, "Failed to bind video wall request body");
        ApiError::BadRequest("invalid request body".to_string())
    })?;

    let ip = resolve_ipv4(&address).await?;
    dispatch(
        &state,
        ip,
        Intent::ConfigureVideoWall(layout),
        "setting video wall parameters",
    )
    .await?;

    debug!(decoder = %address, ?layout, "Set video wall parameters successfully");
    Ok(Json("ok"))
}
