//! Server core functionality
//!
//! This module contains the HTTP server, its router and the shared state
//! handed to every request.

pub mod core;
pub mod state;

pub use self::core::{Server, build_router};
pub use state::AppState;
