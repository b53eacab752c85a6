//! Network utilities
//!
//! Host header parsing and client identity resolution behind a reverse proxy.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;
use axum::http::header::HOST;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Resolved client identity, used as the rate-limit key and session salt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl std::fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host portion of a Host header value, port stripped
///
/// Handles `name`, `name:port`, `[v6]`, `[v6]:port` and bare IPv6 literals.
pub fn host_without_port(host: &str) -> &str {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.matches(':').count() {
        1 => host.split(':').next().unwrap_or(host),
        _ => host,
    }
}

/// Host requested by the client, from the Host header
pub fn request_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(|value| host_without_port(value).to_ascii_lowercase())
        .filter(|host| !host.is_empty())
}

/// Pick the client address: proxy headers when trusted, then the socket peer.
///
/// `X-Real-IP` is set by the proxy outright, so it wins. In `X-Forwarded-For`
/// only the rightmost hop was appended by the proxy; anything left of it is
/// client-supplied.
pub fn client_addr(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> ClientAddr {
    if trust_forwarded_for {
        let forwarded = header_ip(headers, REAL_IP, Some).or_else(|| {
            header_ip(headers, FORWARDED_FOR, |value| value.rsplit(',').next())
        });
        if let Some(ip) = forwarded {
            return ClientAddr(ip.to_string());
        }
    }

    match peer {
        Some(addr) => ClientAddr(addr.ip().to_string()),
        None => ClientAddr("unknown".to_string()),
    }
}

fn header_ip<'a>(
    headers: &'a HeaderMap,
    name: &str,
    pick: impl Fn(&'a str) -> Option<&'a str>,
) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(pick)
        .and_then(|value| value.trim().parse().ok())
}
