//! Application state for the control API

use std::net::Ipv4Addr;
use std::sync::Arc;

use vs_client::DispatcherHandle;

use crate::log_level::LogLevelControl;

/// Standard HTTP port devices listen on
pub const DEFAULT_DEVICE_PORT: u16 = 80;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    dispatcher: DispatcherHandle,
    log_level: Arc<dyn LogLevelControl>,
    device_port: u16,
}

impl AppState {
    pub fn new(dispatcher: DispatcherHandle, log_level: Arc<dyn LogLevelControl>) -> Self {
        Self {
            dispatcher,
            log_level,
            device_port: DEFAULT_DEVICE_PORT,
        }
    }

    /// Use a non-standard device port (test rigs, port-forwarded devices)
    pub fn with_device_port(mut self, port: u16) -> Self {
        self.device_port = port;
        self
    }

    pub fn dispatcher(&self) -> &DispatcherHandle {
        &self.dispatcher
    }

    pub fn log_level(&self) -> &dyn LogLevelControl {
        self.log_level.as_ref()
    }

    /// Address handed to the transport for a resolved device IP
    pub fn device_address(&self, ip: Ipv4Addr) -> String {
        if self.device_port == DEFAULT_DEVICE_PORT {
            ip.to_string()
        } else {
            format!("{}:{}", ip, self.device_port)
        }
    }
}
