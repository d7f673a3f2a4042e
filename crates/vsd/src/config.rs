//! Daemon configuration: CLI flags layered over an optional TOML file

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use vs_client::DispatcherConfig;
use vs_core::Credentials;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(name = "vsd")]
#[command(author, version, about = "Control daemon for Visionary Solutions AV encoders/decoders")]
pub struct Cli {
    /// Port on which to run the http server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Initial log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log: String,

    /// Configuration file path (TOML)
    #[arg(short, long, env = "VS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Device username
    #[arg(long, env = "VS_USERNAME")]
    pub username: Option<String>,

    /// Device password
    #[arg(long, env = "VS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Contents of the TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub device: DeviceSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceSection {
    pub username: String,
    pub password: String,
    /// HTTP port of the devices
    pub port: u16,
    /// Requests allowed to wait in the dispatcher queue
    pub queue_capacity: usize,
    /// How long an API caller waits for its device reply
    pub reply_timeout_secs: u64,
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            port: vs_api::state::DEFAULT_DEVICE_PORT,
            queue_capacity: vs_client::DEFAULT_QUEUE_CAPACITY,
            reply_timeout_secs: vs_client::DEFAULT_REPLY_TIMEOUT.as_secs(),
        }
    }
}

impl FileConfig {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Fully resolved settings after merging CLI args over the file
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub credentials: Credentials,
    pub device_port: u16,
    pub dispatcher: DispatcherConfig,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    fn merge(cli: &Cli, file: FileConfig) -> Self {
        let credentials = Credentials::new(
            cli.username.clone().unwrap_or(file.device.username),
            cli.password.clone().unwrap_or(file.device.password),
        );

        let reply_timeout = match file.device.reply_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            port: cli.port.unwrap_or(file.server.port),
            credentials,
            device_port: file.device.port,
            dispatcher: DispatcherConfig {
                queue_capacity: file.device.queue_capacity,
                reply_timeout,
            },
        }
    }
}
