//! Logging setup

use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};
use vs_api::{LogLevelControl, ReloadLevel};

/// Install the global subscriber and return a handle for runtime changes.
///
/// The maximum level lives in a reloadable layer driven by the API.
/// `RUST_LOG`, when set, narrows output further per target.
pub fn init(level: LevelFilter) -> Arc<dyn LogLevelControl> {
    let (level_layer, handle) = reload::Layer::new(level);

    tracing_subscriber::registry()
        .with(level_layer)
        .with(EnvFilter::try_from_default_env().ok())
        .with(fmt::layer())
        .init();

    Arc::new(ReloadLevel::new(handle))
}
