//! Session issuer
//!
//! Hands each browser an opaque `sid` cookie on its first successful chat
//! response. The server keeps no session record; the cookie only marks a
//! returning browser.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use log::{debug, warn};
use sha2::{Digest, Sha256};

use crate::utils::ClientAddr;

/// Hex characters kept from the SHA-256 digest
const TOKEN_LEN: usize = 32;

pub struct SessionIssuer {
    cookie_name: String,
}

impl SessionIssuer {
    pub fn new(cookie_name: &str) -> Self {
        Self {
            cookie_name: cookie_name.to_string(),
        }
    }

    /// Session id carried by the request, if any
    pub fn existing(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.cookie_name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }

    /// Attach a fresh cookie unless the request already had one.
    ///
    /// Only headers are touched, never the body.
    pub fn stamp(&self, request_headers: &HeaderMap, client: &ClientAddr, response: &mut Response) {
        if self.existing(request_headers).is_some() {
            return;
        }

        let token = mint_token(client);
        match HeaderValue::from_str(&self.set_cookie_value(&token)) {
            Ok(value) => {
                debug!("Issued session cookie to {}", client);
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Could not encode session cookie: {}", e),
        }
    }

    pub fn set_cookie_value(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name, token
        )
    }
}

/// 32 hex chars of SHA-256 over wall-clock time, client address and random bytes
pub fn mint_token(client: &ClientAddr) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let noise: [u8; 16] = rand::random();

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_string().as_bytes());
    hasher.update(client.0.as_bytes());
    hasher.update(hex::encode(noise).as_bytes());

    let mut token = hex::encode(hasher.finalize());
    token.truncate(TOKEN_LEN);
    token
}
