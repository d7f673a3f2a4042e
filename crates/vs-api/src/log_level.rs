//! Runtime log level control

use parking_lot::RwLock;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload;

/// Read and change the process log level while running
pub trait LogLevelControl: Send + Sync {
    /// Current maximum level
    fn level(&self) -> LevelFilter;

    /// Replace the maximum level
    fn set_level(&self, level: LevelFilter) -> Result<(), String>;
}

/// Parse a level name as accepted by `PUT /log-level/{level}`
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Display name of a level filter (`"info"`, `"debug"`, ...)
pub fn level_name(level: LevelFilter) -> String {
    level.to_string().to_ascii_lowercase()
}

/// Level control backed by a `tracing_subscriber::reload` layer
pub struct ReloadLevel<S> {
    handle: reload::Handle<LevelFilter, S>,
}

impl<S> ReloadLevel<S> {
    pub fn new(handle: reload::Handle<LevelFilter, S>) -> Self {
        Self { handle }
    }
}

impl<S> LogLevelControl for ReloadLevel<S>
where
    S: Send + Sync + 'static,
{
    fn level(&self) -> LevelFilter {
        self.handle.clone_current().unwrap_or(LevelFilter::OFF)
    }

    fn set_level(&self, level: LevelFilter) -> Result<(), String> {
        self.handle.reload(level).map_err(|e| e.to_string())?;
        tracing::info!(level = %level_name(level), "Log level changed");
        Ok(())
    }
}

/// Level control that only records the level, for tests and embedding
pub struct FixedLevel {
    level: RwLock<LevelFilter>,
}

impl FixedLevel {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level: RwLock::new(level),
        }
    }
}

impl LogLevelControl for FixedLevel {
    fn level(&self) -> LevelFilter {
        *self.level.read()
    }

    fn set_level(&self, level: LevelFilter) -> Result<(), String> {
        *self.level.write() = level;
        Ok(())
    }
}
