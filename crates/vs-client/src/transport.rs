//! HTTP transport to the device web API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, error, instrument};
use url::Url;
use vs_core::{classify, decode, CommandError, CommandResult, Credentials, DeviceResponse};

/// Path of the command endpoint on every device
pub const WAPI_PATH: &str = "/cgi-bin/wapi.cgi";
/// Content type expected by the command endpoint
pub const WAPI_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Total time allowed for one command, including reading the body
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends one command string to one device
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Send `command` to the device at `address` (`host` or `host:port`).
    ///
    /// Every failure is reported through the returned result.
    async fn send(&self, address: &str, command: &str) -> CommandResult;
}

/// [`DeviceTransport`] over HTTP with Basic authentication
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the standard 10 second timeout
    pub fn new(credentials: Credentials) -> Result<Self, reqwest::Error> {
        Self::with_timeout(credentials, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a transport with a custom total request timeout
    pub fn with_timeout(
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            credentials,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the command endpoint URL for `address`
    ///
    /// `address` must be a bare `host` or `host:port`; anything that would
    /// move the request off [`WAPI_PATH`] is rejected.
    pub fn endpoint(address: &str) -> Result<Url, CommandError> {
        if address.trim().is_empty() {
            return Err(CommandError::RequestBuild("missing device address".to_string()));
        }

        let url = Url::parse(&format!("http://{}{}", address, WAPI_PATH))
            .map_err(|e| CommandError::RequestBuild(format!("{}: {}", address, e)))?;

        if url.path() != WAPI_PATH || url.query().is_some() || url.fragment().is_some() {
            return Err(CommandError::RequestBuild(format!(
                "{}: not a host or host:port",
                address
            )));
        }

        Ok(url)
    }

    fn build_request(&self, address: &str, command: &str) -> Result<reqwest::Request, CommandError> {
        let url = Self::endpoint(address)?;

        self.client
            .post(url)
            .header(CONTENT_TYPE, WAPI_CONTENT_TYPE)
            .header(AUTHORIZATION, self.credentials.basic_auth_header())
            .body(command.to_owned())
            .timeout(self.timeout)
            .build()
            .map_err(|e| CommandError::RequestBuild(e.to_string()))
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    #[instrument(skip(self, command))]
    async fn send(&self, address: &str, command: &str) -> CommandResult {
        debug!("Sending request");

        let request = self.build_request(address, command).map_err(|e| {
            error!(error = %e, "Could not form request");
            e
        })?;

        let response = self.client.execute(request).await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("timed out after {:?}", self.timeout)
            } else {
                e.to_string()
            };
            error!(%reason, "Failure sending http request");
            CommandError::Transport(reason)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, %status, "Failed to read response body");
            CommandError::BodyRead(e.to_string())
        })?;

        let fields = decode(&body);
        if classify(&fields).is_success() {
            debug!(%status, fields = fields.len(), "Request succeeded");
            Ok(DeviceResponse::new(fields))
        } else {
            error!(%status, response = %body, "Received error response");
            Err(CommandError::Protocol { body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_with_ip() {
        let url = HttpTransport::endpoint("10.0.0.20").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.20/cgi-bin/wapi.cgi");
    }

    #[test]
    fn test_endpoint_with_port() {
        let url = HttpTransport::endpoint("127.0.0.1:8081").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8081/cgi-bin/wapi.cgi");
    }

    #[test]
    fn test_endpoint_rejects_empty_address() {
        let err = HttpTransport::endpoint("").unwrap_err();
        assert_eq!(err.kind(), "request_build");

        let err = HttpTransport::endpoint("  ").unwrap_err();
        assert_eq!(err.kind(), "request_build");
    }

    #[test]
    fn test_endpoint_rejects_address_with_path() {
        for address in ["10.0.0.20/admin", "10.0.0.20?x=1", "10.0.0.20#top", "/cgi-bin"] {
            let err = HttpTransport::endpoint(address).unwrap_err();
            assert_eq!(err.kind(), "request_build", "{}", address);
        }
    }

    #[test]
    fn test_default_timeout() {
        let transport = HttpTransport::new(Credentials::default()).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(10));
    }
}
