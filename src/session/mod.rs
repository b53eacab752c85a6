//! Browser sessions
//!
//! Cookie-only session identifiers; nothing is stored server-side.

pub mod issuer;

pub use issuer::{SessionIssuer, mint_token};
