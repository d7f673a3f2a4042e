//! Device status handlers

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;
use vs_core::Intent;

use super::dispatch;
use crate::error::ApiError;
use crate::models::{ActiveSignal, HardwareInfo};
use crate::resolve::resolve_ipv4;
use crate::state::AppState;

/// GET /{address}/hardware
pub async fn get_device_info(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<HardwareInfo>, ApiError> {
    debug!(%address, "Getting device details");

    let ip = resolve_ipv4(&address).await?;
    let response = dispatch(&state, ip, Intent::QueryDeviceInfo, "getting device details").await?;

    let info = HardwareInfo::from_response(&response);
    debug!(%address, ?info, "Got device details");
    Ok(Json(info))
}

/// GET /{address}/signal
pub async fn get_signal(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ActiveSignal>, ApiError> {
    debug!(%address, "Getting signal data");

    let ip = resolve_ipv4(&address).await?;
    let response = dispatch(&state, ip, Intent::QuerySignal, "getting signal data").await?;

    let signal = ActiveSignal::from_response(&response);
    debug!(%address, active = signal.active_signal, "Returning signal status");
    Ok(Json(signal))
}
