//! Host name resolution for device addresses

use std::net::{IpAddr, Ipv4Addr};

use tokio::net::lookup_host;

use crate::error::ApiError;

/// Resolve `host` to an IPv4 address.
///
/// IP literals are returned as-is (IPv4-mapped IPv6 literals are unwrapped);
/// host names go through the system resolver and the first IPv4 answer wins.
pub async fn resolve_ipv4(host: &str) -> Result<Ipv4Addr, ApiError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => Ok(v4),
            IpAddr::V6(v6) => v6
                .to_ipv4_mapped()
                .ok_or_else(|| unresolvable(host, "not an IPv4 address")),
        };
    }

    let addrs = lookup_host((host, 0))
        .await
        .map_err(|e| unresolvable(host, &e.to_string()))?;

    addrs
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| unresolvable(host, "no IPv4 address"))
}

fn unresolvable(host: &str, reason: &str) -> ApiError {
    tracing::warn!(%host, %reason, "Failed to resolve device address");
    ApiError::BadRequest(format!("could not resolve address: {}", host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ipv4_literal_passes_through() {
        let ip = resolve_ipv4("10.0.0.5").await.unwrap();
        assert_eq!(ip, Ipv4Addr::new(10, 0, 0, 5));
    }

    #[tokio::test]
    async fn test_mapped_ipv6_literal() {
        let ip = resolve_ipv4("::ffff:10.0.0.5").await.unwrap();
        assert_eq!(ip, Ipv4Addr::new(10, 0, 0, 5));
    }

    #[tokio::test]
    async fn test_plain_ipv6_rejected() {
        assert!(resolve_ipv4("fe80::1").await.is_err());
    }
}
