//! Log level handlers

use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::log_level::{level_name, parse_level};
use crate::state::AppState;

/// GET /log-level
pub async fn get_log_level(State(state): State<AppState>) -> String {
    level_name(state.log_level().level())
}

/// PUT /log-level/{level}
pub async fn set_log_level(
    State(state): State<AppState>,
    Path(level): Path<String>,
) -> Result<String, ApiError> {
    let filter =
        parse_level(&level).ok_or_else(|| ApiError::BadRequest("invalid log level".to_string()))?;

    state
        .log_level()
        .set_level(filter)
        .map_err(|e| ApiError::Internal(format!("failed to set log level: {}", e)))?;

    Ok(level)
}
