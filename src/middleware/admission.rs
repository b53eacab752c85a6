//! Admission guard
//!
//! Origin check followed by the per-client rate limit. Applied only to the
//! chat route; the health endpoint bypasses it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::logging::log_admitted;
use super::rate_limit::{RateLimitStore, RateLimiter};
use super::security::OriginPolicy;
use crate::config::AdmissionConfig;
use crate::error::{AdmissionError, ChatServerError};
use crate::server::AppState;
use crate::utils::{ClientAddr, client_addr, host_without_port, request_host};

pub struct AdmissionGuard {
    origin: OriginPolicy,
    limiter: Arc<dyn RateLimitStore>,
    trust_forwarded_for: bool,
}

impl AdmissionGuard {
    pub fn new(config: &AdmissionConfig, limiter: Arc<dyn RateLimitStore>) -> Self {
        Self {
            origin: OriginPolicy::new(&config.allowed_hosts),
            limiter,
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    /// Guard backed by the in-process limiter
    pub fn from_config(config: &AdmissionConfig) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window());
        Self::new(config, Arc::new(limiter))
    }

    /// Origin first; a forbidden request never touches the rate-limit state
    pub fn admit(&self, host: Option<&str>, client: &ClientAddr) -> Result<(), AdmissionError> {
        self.origin.check(host)?;

        if self.limiter.check_and_record(&client.0) {
            Ok(())
        } else {
            Err(AdmissionError::RateLimited(client.0.clone()))
        }
    }

    pub fn limiter(&self) -> Arc<dyn RateLimitStore> {
        Arc::clone(&self.limiter)
    }

    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }
}

/// axum middleware running the guard and stashing the resolved `ClientAddr`
/// in the request extensions for the handler.
pub async fn admission_layer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_addr(
        request.headers(),
        peer,
        state.admission.trust_forwarded_for(),
    );

    // HTTP/2 carries the authority in the URI rather than a Host header
    let host = request_host(request.headers()).or_else(|| {
        request
            .uri()
            .host()
            .map(|host| host_without_port(host).to_ascii_lowercase())
    });

    if let Err(err) = state.admission.admit(host.as_deref(), &client) {
        return ChatServerError::from(err).into_response();
    }

    log_admitted(&client, request.uri().path());
    request.extensions_mut().insert(client);
    next.run(request).await
}
