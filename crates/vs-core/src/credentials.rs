//! Device credentials and HTTP Basic authentication

use std::fmt;

use base64::{engine::general_purpose, Engine};
use serde::Deserialize;

/// Username/password pair shared by every device on the fleet
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Base64 token for `Authorization: Basic <token>`.
    ///
    /// A `:` inside the username is not escaped; the device will split the
    /// pair at the first colon.
    pub fn encoded_auth(&self) -> String {
        general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Full `Authorization` header value
    pub fn basic_auth_header(&self) -> String {
        format!("Basic {}", self.encoded_auth())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_auth() {
        let creds = Credentials::new("admin", "password");
        assert_eq!(creds.encoded_auth(), "YWRtaW46cGFzc3dvcmQ=");
        assert_eq!(creds.basic_auth_header(), "Basic YWRtaW46cGFzc3dvcmQ=");
    }

    #[test]
    fn test_empty_credentials() {
        // base64(":")
        assert_eq!(Credentials::default().encoded_auth(), "Og==");
    }

    #[test]
    fn test_colon_is_not_escaped() {
        let creds = Credentials::new("a:b", "c");
        let decoded = general_purpose::STANDARD
            .decode(creds.encoded_auth())
            .unwrap();
        assert_eq!(decoded, b"a:b:c");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("admin", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
