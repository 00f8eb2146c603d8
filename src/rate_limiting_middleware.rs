// ABOUTME: HTTP surface for rate limiting: X-RateLimit-* response headers and the 429 error
// ABOUTME: Gives clients the limit, remaining, reset time, and retry-after for back-off logic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Rate Limiting Response Surface
//!
//! Helpers for turning a [`RateLimitDecision`] into standard HTTP rate-limit
//! headers and, when the limit is hit, a 429 rejection with a numeric
//! retry-after.

use crate::errors::{AppError, ErrorKind};
use crate::rate_limiting::RateLimitDecision;
use http::{HeaderMap, HeaderValue};

/// HTTP header names for rate limiting
pub mod headers {
    /// Maximum requests allowed in the current window
    pub const X_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
    /// Remaining requests in the current window
    pub const X_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
    /// Unix timestamp when the window resets
    pub const X_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
    /// Seconds until the window resets
    pub const RETRY_AFTER: &str = "Retry-After";
}

/// Build the rate-limit headers for a response
///
/// Emitted on every guarded response, not only rejections, so well-behaved
/// clients can pace themselves.
#[must_use]
pub fn rate_limit_headers(decision: &RateLimitDecision) -> HeaderMap {
    let mut map = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        map.insert(headers::X_RATE_LIMIT_LIMIT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        map.insert(headers::X_RATE_LIMIT_REMAINING, value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.reset_at.timestamp().to_string()) {
        map.insert(headers::X_RATE_LIMIT_RESET, value);
    }

    if decision.limited {
        let retry_after = decision.retry_after.num_seconds().max(0);
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            map.insert(headers::RETRY_AFTER, value);
        }
    }

    map
}

/// Build the 429 rejection for a limited decision
#[must_use]
pub fn rate_limited_error(decision: &RateLimitDecision) -> AppError {
    let retry_after_secs = decision.retry_after.num_seconds().max(0);
    AppError::new(
        ErrorKind::RateLimited,
        format!(
            "Rate limit of {} requests per window exceeded - retry in {retry_after_secs} seconds",
            decision.limit
        ),
    )
    .with_details(serde_json::json!({
        "limit": decision.limit,
        "retry_after_secs": retry_after_secs,
        "reset_at": decision.reset_at.to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn limited_decision() -> RateLimitDecision {
        RateLimitDecision {
            limited: true,
            limit: 100,
            remaining: 0,
            reset_at: Utc::now() + Duration::seconds(30),
            retry_after: Duration::seconds(30),
        }
    }

    #[test]
    fn test_headers_on_limited_response() {
        let map = rate_limit_headers(&limited_decision());
        assert_eq!(map.get(headers::X_RATE_LIMIT_LIMIT).unwrap(), "100");
        assert_eq!(map.get(headers::X_RATE_LIMIT_REMAINING).unwrap(), "0");
        assert_eq!(map.get(headers::RETRY_AFTER).unwrap(), "30");
        assert!(map.contains_key(headers::X_RATE_LIMIT_RESET));
    }

    #[test]
    fn test_retry_after_absent_when_not_limited() {
        let decision = RateLimitDecision {
            limited: false,
            remaining: 57,
            ..limited_decision()
        };
        let map = rate_limit_headers(&decision);
        assert_eq!(map.get(headers::X_RATE_LIMIT_REMAINING).unwrap(), "57");
        assert!(!map.contains_key(headers::RETRY_AFTER));
    }

    #[test]
    fn test_error_carries_retry_metadata() {
        let err = rate_limited_error(&limited_decision());
        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert_eq!(err.http_status(), 429);
        assert_eq!(err.details["retry_after_secs"], 30);
    }
}
