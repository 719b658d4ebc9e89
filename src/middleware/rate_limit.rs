//! Fixed-window rate limiting keyed by client address.
//!
//! Each limiter counts requests per client key inside consecutive windows of
//! equal length. Once a key reaches the permit count, further requests in the
//! same window are rejected immediately; nothing is queued.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::LimiterPolicy;
use crate::error::ApiError;

/// Key used when the server runs without connect info.
pub const UNKNOWN_CLIENT: &str = "unknown";

const PRUNE_EVERY: u64 = 256;

#[derive(Debug, Clone, Copy)]
struct Slot {
    window: u64,
    count: u32,
}

/// A named fixed-window counter shared across requests.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    name: &'static str,
    permits: u32,
    window: Duration,
    epoch: Instant,
    slots: Mutex<HashMap<String, Slot>>,
    checks: AtomicU64,
}

impl FixedWindowLimiter {
    pub fn new(name: &'static str, policy: LimiterPolicy) -> Self {
        Self {
            name,
            permits: policy.permits,
            // A zero-length window would divide by zero.
            window: policy.window().max(Duration::from_secs(1)),
            epoch: Instant::now(),
            slots: Mutex::new(HashMap::new()),
            checks: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Admits or rejects one request for `key` now.
    pub fn check(&self, key: &str) -> Result<(), ApiError> {
        self.check_at(key, Instant::now())
    }

    /// Admits or rejects one request for `key` at `now`.
    ///
    /// On rejection, carries the seconds until the current window closes.
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), ApiError> {
        let window = self.window_index(now);

        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune(window);
        }

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(key.to_string()).or_insert(Slot { window, count: 0 });
        if slot.window != window {
            *slot = Slot { window, count: 0 };
        }

        if slot.count >= self.permits {
            let retry_after_secs = self.seconds_until_next_window(now);
            tracing::warn!(
                limiter = self.name,
                client = key,
                permits = self.permits,
                "rate limit exceeded"
            );
            return Err(ApiError::TooManyRequests { retry_after_secs });
        }

        slot.count += 1;
        Ok(())
    }

    /// Number of client keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drops slots belonging to windows that have already closed.
    pub fn prune(&self, current_window: u64) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|_, slot| slot.window >= current_window);
        tracing::debug!(limiter = self.name, removed = before - slots.len(), "pruned rate limiter slots");
    }

    fn window_index(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.epoch);
        (elapsed.as_millis() / self.window.as_millis()) as u64
    }

    fn seconds_until_next_window(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.epoch).as_millis();
        let window = self.window.as_millis();
        let remaining_ms = window - (elapsed % window);
        // Round up so clients never retry inside the closed window.
        (remaining_ms.div_ceil(1000) as u64).max(1)
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Route layer enforcing one limiter; attach with `from_fn_with_state`.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&request);
    if let Err(err) = limiter.check(&client) {
        tracing::debug!(limiter = limiter.name(), client = %client, "rate limit exceeded");
        return Err(err);
    }
    Ok(next.run(request).await)
}
