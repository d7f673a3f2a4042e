//! Stream host (input) handlers

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;
use vs_core::{keys, Intent};

use super::dispatch;
use crate::error::ApiError;
use crate::models::Input;
use crate::resolve::resolve_ipv4;
use crate::state::AppState;

/// GET /input/{encoder}/{decoder}
/// Switch a decoder to an encoder's stream
pub async fn set_stream_host(
    State(state): State<AppState>,
    Path((encoder, decoder)): Path<(String, String)>,
) -> Result<Json<Input>, ApiError> {
    debug!(%encoder, %decoder, "Setting stream host");

    let encoder_ip = resolve_ipv4(&encoder).await?;
    let decoder_ip = resolve_ipv4(&decoder).await?;

    let intent = Intent::SwitchHost {
        encoder: encoder_ip.into(),
    };
    dispatch(&state, decoder_ip, intent, "setting stream host").await?;

    debug!(%encoder, %decoder, "Set stream host successfully");
    Ok(Json(Input { input: encoder }))
}

/// GET /input/get/{address}
/// Read the encoder a decoder is streaming from
pub async fn get_connected_host(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Input>, ApiError> {
    debug!(%address, "Getting the current stream host");

    let ip = resolve_ipv4(&address).await?;
    let response = dispatch(&state, ip, Intent::QueryConnectedHost, "getting stream host").await?;

    let stream_host = response.get_or_empty(keys::STREAM_HOST).to_string();
    debug!(decoder = %address, encoder = %stream_host, "Found the current stream host");
    Ok(Json(Input { input: stream_host }))
}

/// PUT /configure/{encoder}
/// Acknowledge an encoder; devices need no configuration, callers expect the
/// resolved address back
pub async fn configure_device(Path(encoder): Path<String>) -> Result<Json<Input>, ApiError> {
    debug!(%encoder, "Configuring encoder");

    let ip = resolve_ipv4(&encoder).await?;
    Ok(Json(Input {
        input: ip.to_string(),
    }))
}
