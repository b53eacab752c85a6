//! Utility functions
//!
//! Provides input validation and network helpers.

pub mod network;
pub mod validation;

pub use network::{ClientAddr, client_addr, host_without_port, request_host};
pub use validation::{normalize_message, truncate_chars};
