//! Shop chat server
//!
//! HTTP backend for a shop's web-chat widget. Questions that name a catalog
//! product are answered from the local catalog; everything else is passed to
//! a hosted chat-completion model (or a deterministic demo responder when no
//! API key is configured).

pub mod catalog;
pub mod completion;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod session;
pub mod utils;

pub use config::ServerConfig;
pub use server::{AppState, Server, build_router};
