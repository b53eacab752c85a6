//! Error handlers
//!
//! Maps server errors onto HTTP responses. Every error reaching the router is
//! answered with `{"error": "<reason>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde_json::json;

use crate::error::types::{AdmissionError, ChatServerError, RequestError};

pub const FORBIDDEN_ORIGIN: &str = "Forbidden origin";
pub const TOO_MANY_REQUESTS: &str = "Too many requests, please wait a bit.";
pub const EMPTY_MESSAGE: &str = "Empty message";
pub const INVALID_BODY: &str = "Invalid JSON body";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Log a chat server error at a level matching its severity
pub fn handle_error(err: &ChatServerError) {
    match err {
        ChatServerError::Admission(_) | ChatServerError::Request(_) => {
            warn!("Request rejected: {}", err)
        }
        _ => error!("Chat Server Error: {}", err),
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &ChatServerError) -> StatusCode {
    match err {
        ChatServerError::Admission(AdmissionError::ForbiddenOrigin(_)) => StatusCode::FORBIDDEN,
        ChatServerError::Admission(AdmissionError::RateLimited(_)) => {
            StatusCode::TOO_MANY_REQUESTS
        }
        ChatServerError::Request(_) => StatusCode::BAD_REQUEST,
        ChatServerError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ChatServerError::Completion(_) => StatusCode::BAD_GATEWAY,
        ChatServerError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ChatServerError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short, client-facing reason; internal detail stays in the logs
pub fn public_message(err: &ChatServerError) -> String {
    match err {
        ChatServerError::Admission(AdmissionError::ForbiddenOrigin(_)) => {
            FORBIDDEN_ORIGIN.to_string()
        }
        ChatServerError::Admission(AdmissionError::RateLimited(_)) => {
            TOO_MANY_REQUESTS.to_string()
        }
        ChatServerError::Request(RequestError::EmptyMessage) => EMPTY_MESSAGE.to_string(),
        ChatServerError::Request(RequestError::MalformedBody(_)) => INVALID_BODY.to_string(),
        ChatServerError::Completion(e) => e.to_string(),
        _ => INTERNAL_ERROR.to_string(),
    }
}

impl IntoResponse for ChatServerError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let status = error_to_status(&self);
        (status, Json(json!({ "error": public_message(&self) }))).into_response()
    }
}
