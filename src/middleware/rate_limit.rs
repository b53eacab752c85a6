//! Rate limiting middleware
//!
//! Fixed-window request counter keyed by client IP.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Shared counter store behind the admission guard.
///
/// Implementations record an attempt only when it is allowed.
pub trait RateLimitStore: Send + Sync {
    fn check_and_record(&self, key: &str) -> bool;

    /// Drop state for keys with no live timestamps; returns how many were removed
    fn purge_idle(&self) -> usize {
        0
    }
}

/// In-process rate limiter
///
/// A single lock guards every bucket; it is held only for the
/// evict-count-append step and never across an await.
pub struct RateLimiter {
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn check_and_record_at(&self, client_id: &str, now: Instant) -> bool {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        let bucket = requests.entry(client_id.to_string()).or_default();

        // Timestamps are appended in order, so expiry is a prefix trim
        while bucket
            .front()
            .is_some_and(|&time| now.saturating_duration_since(time) > self.window)
        {
            bucket.pop_front();
        }

        if bucket.len() < self.max_requests {
            bucket.push_back(now);
            true
        } else {
            false
        }
    }

    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        let before = requests.len();
        requests.retain(|_, bucket| {
            bucket
                .back()
                .is_some_and(|&time| now.saturating_duration_since(time) <= self.window)
        });
        before - requests.len()
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl RateLimitStore for RateLimiter {
    fn check_and_record(&self, key: &str) -> bool {
        self.check_and_record_at(key, Instant::now())
    }

    fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }
}
