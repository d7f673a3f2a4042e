//! HTTP handlers for the control API

pub mod device;
pub mod input;
pub mod log_level;
pub mod videowall;

use std::net::Ipv4Addr;

use tracing::error;
use vs_core::{DeviceResponse, Intent};

use crate::error::ApiError;
use crate::state::AppState;

/// Encode `intent`, queue it for the device at `target` and wait for the reply.
///
/// `action` names the operation in failure logs.
pub(crate) async fn dispatch(
    state: &AppState,
    target: Ipv4Addr,
    intent: Intent,
    action: &str,
) -> Result<DeviceResponse, ApiError> {
    state
        .dispatcher()
        .submit(state.device_address(target), intent.encode())
        .await
        .map_err(|e| {
            error!(%target, error = %e, "Failed to make request for {}", action);
            ApiError::from(e)
        })
}
