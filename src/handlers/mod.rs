//! HTTP handlers
//!
//! Chat and health endpoints.

pub mod chat;
pub mod health;

pub use chat::{ChatReply, ChatRequest, chat_handler};
pub use health::{HealthResponse, health_handler};
