//! Server middleware
//!
//! Provides the admission guard (origin allow-list and rate limiting) and
//! request logging.

pub mod admission;
pub mod logging;
pub mod rate_limit;
pub mod security;

pub use admission::{AdmissionGuard, admission_layer};
pub use rate_limit::{RateLimitStore, RateLimiter};
pub use security::OriginPolicy;
