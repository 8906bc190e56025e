//! Client IP extraction from HTTP requests.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the client IP address for a request.
///
/// When `behind_proxy` is true, the first entry of `X-Forwarded-For` wins,
/// then `X-Real-IP`. Otherwise, or when neither header is usable, the peer
/// socket address is used. Forwarding headers are ignored when the service
/// is exposed directly, since any client can set them.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = client_ip(&headers, "10.0.0.1:5000".parse().unwrap(), true);
/// assert_eq!(ip, "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded.or_else(|| header_str(headers, X_REAL_IP).map(str::trim)) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Returns a header value as `&str`, or `None` if absent, empty or not UTF-8.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.1:54321".parse().unwrap()
    }

    #[test]
    fn test_peer_address_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"));

        assert_eq!(client_ip(&headers, peer(), false), "10.0.0.1");
    }

    #[test]
    fn test_first_forwarded_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static(" 203.0.113.7 , 198.51.100.2"),
        );

        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.9"));

        assert_eq!(client_ip(&headers, peer(), true), "198.51.100.9");
    }

    #[test]
    fn test_peer_fallback_behind_proxy_without_headers() {
        assert_eq!(client_ip(&HeaderMap::new(), peer(), true), "10.0.0.1");
    }

    #[test]
    fn test_ipv6_peer() {
        let peer: SocketAddr = "[::1]:8080".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), peer, false), "::1");
    }

    #[test]
    fn test_header_str_filters_empty() {
        let mut headers = HeaderMap::new();
        headers.insert("referer", HeaderValue::from_static(""));

        assert!(header_str(&headers, "referer").is_none());
        assert!(header_str(&headers, "user-agent").is_none());
    }
}
