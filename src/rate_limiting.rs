// ABOUTME: Per-client-address rolling-window rate limiter with a bounded LRU address table
// ABOUTME: Check-then-increment runs in one critical section; elapsed windows are swept lazily
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Client Rate Limiting
//!
//! Rolling fixed-window counting per client address. Each check runs as a
//! single critical section so two concurrent requests cannot both pass the
//! boundary. The address table is a capacity-bounded LRU cache, giving a
//! hard memory bound under address-spoofing load; elapsed windows are also
//! swept opportunistically on the request path. The sweep is incidental
//! cleanup, not a precise eviction policy, and its cost is linear in the
//! table size on every request.

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

/// Default requests allowed per window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length in seconds (15 minutes)
pub const DEFAULT_WINDOW_SECS: i64 = 900;

/// Default bound on tracked client addresses
pub const DEFAULT_MAX_TRACKED_CLIENTS: usize = 10_000;

/// Per-address request counter
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    started_at: DateTime<Utc>,
}

/// Outcome of a rate-limit check, with the metadata clients need to back off
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    /// Whether the request must be rejected
    pub limited: bool,
    /// Maximum requests per window
    pub limit: u32,
    /// Requests remaining in the current window
    pub remaining: u32,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
    /// Time until the window resets; the retry-after for limited requests
    pub retry_after: Duration,
}

/// Rolling fixed-window limiter keyed by client address
pub struct ClientRateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<LruCache<IpAddr, RateWindow>>,
}

impl ClientRateLimiter {
    /// Create a limiter allowing `max_requests` per `window`, tracking at
    /// most `max_tracked_clients` addresses
    #[must_use]
    pub fn new(max_requests: u32, window: Duration, max_tracked_clients: usize) -> Self {
        let capacity = NonZeroUsize::new(max_tracked_clients).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_requests,
            window,
            windows: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Check and count a request from `addr`
    pub fn check(&self, addr: IpAddr) -> RateLimitDecision {
        self.check_at(addr, Utc::now())
    }

    /// Number of addresses currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn check_at(&self, addr: IpAddr, now: DateTime<Utc>) -> RateLimitDecision {
        let mut table = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        // Single critical section: look up, reset if elapsed, then count.
        let mut window = table.pop(&addr).unwrap_or(RateWindow {
            count: 0,
            started_at: now,
        });
        if now.signed_duration_since(window.started_at) > self.window {
            window.count = 0;
            window.started_at = now;
        }

        let reset_at = window.started_at + self.window;
        let retry_after = reset_at.signed_duration_since(now);

        let decision = if window.count >= self.max_requests {
            tracing::warn!(client = %addr, limit = self.max_requests, "Rate limit exceeded");
            RateLimitDecision {
                limited: true,
                limit: self.max_requests,
                remaining: 0,
                reset_at,
                retry_after,
            }
        } else {
            window.count += 1;
            RateLimitDecision {
                limited: false,
                limit: self.max_requests,
                remaining: self.max_requests.saturating_sub(window.count),
                reset_at,
                retry_after,
            }
        };

        // Reinsert as most-recently-used; the LRU capacity bounds memory
        // even when the sweep below lags behind address churn.
        table.put(addr, window);

        // Incidental sweep of elapsed windows on the request path.
        let expired: Vec<IpAddr> = table
            .iter()
            .filter(|(_, w)| now.signed_duration_since(w.started_at) > self.window)
            .map(|(k, _)| *k)
            .collect();
        for key in expired {
            table.pop(&key);
        }

        decision
    }
}
