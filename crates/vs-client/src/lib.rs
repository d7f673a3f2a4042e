//! Device client for Visionary Solutions encoders/decoders
//!
//! Two layers:
//!
//! - [`HttpTransport`] posts one command string to one device and returns the
//!   decoded, classified result.
//! - [`Dispatcher`] owns a transport and drains a FIFO queue one request at a
//!   time, so at most one command is ever in flight. Producers talk to it
//!   through a cloneable [`DispatcherHandle`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vs_client::{Dispatcher, DispatcherConfig, HttpTransport};
//! use vs_core::{Credentials, Intent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new(Credentials::new("admin", "password"))?;
//!     let (handle, _worker) = Dispatcher::spawn(Arc::new(transport), DispatcherConfig::default());
//!
//!     let response = handle
//!         .submit("10.0.0.20", Intent::QueryConnectedHost.encode())
//!         .await?;
//!     println!("{:?}", response.get("STREAM.HOST"));
//!     Ok(())
//! }
//! ```

mod dispatcher;
mod error;
pub mod testing;
mod transport;

pub use dispatcher::{
    Dispatcher, DispatcherConfig, DispatcherHandle, PendingRequest, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_REPLY_TIMEOUT,
};
pub use error::{DispatchError, Result};
pub use transport::{
    DeviceTransport, HttpTransport, DEFAULT_REQUEST_TIMEOUT, WAPI_CONTENT_TYPE, WAPI_PATH,
};
