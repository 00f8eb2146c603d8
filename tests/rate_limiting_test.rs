// ABOUTME: Integration tests for the per-address limiter through its public clock-driven API
// ABOUTME: Short real windows keep the suite fast while exercising reset behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

use chrono::Duration;
use fleetgate::errors::ErrorKind;
use fleetgate::rate_limiting::ClientRateLimiter;
use fleetgate::rate_limiting_middleware::{headers, rate_limit_headers, rate_limited_error};
use std::net::IpAddr;

fn addr(last: u8) -> IpAddr {
    IpAddr::from([198, 51, 100, last])
}

#[test]
fn requests_over_the_limit_are_rejected() {
    let limiter = ClientRateLimiter::new(5, Duration::seconds(60), 64);

    for _ in 0..5 {
        assert!(!limiter.check(addr(1)).limited);
    }
    let decision = limiter.check(addr(1));
    assert!(decision.limited);
    assert_eq!(decision.remaining, 0);

    // Another address is unaffected.
    assert!(!limiter.check(addr(2)).limited);
}

#[test]
fn window_elapse_admits_requests_again() {
    let limiter = ClientRateLimiter::new(1, Duration::milliseconds(50), 64);

    assert!(!limiter.check(addr(1)).limited);
    assert!(limiter.check(addr(1)).limited);

    std::thread::sleep(std::time::Duration::from_millis(80));
    assert!(!limiter.check(addr(1)).limited);
}

#[test]
fn limited_decision_produces_headers_and_429() {
    let limiter = ClientRateLimiter::new(1, Duration::seconds(60), 64);
    limiter.check(addr(1));
    let decision = limiter.check(addr(1));
    assert!(decision.limited);

    let map = rate_limit_headers(&decision);
    assert_eq!(map.get(headers::X_RATE_LIMIT_LIMIT).unwrap(), "1");
    assert_eq!(map.get(headers::X_RATE_LIMIT_REMAINING).unwrap(), "0");
    assert!(map.contains_key(headers::X_RATE_LIMIT_RESET));
    assert!(map.contains_key(headers::RETRY_AFTER));

    let err = rate_limited_error(&decision);
    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert_eq!(err.http_status(), 429);
    assert_eq!(err.details["limit"], 1);
}

#[test]
fn concurrent_checks_admit_exactly_the_limit() {
    let limiter = std::sync::Arc::new(ClientRateLimiter::new(10, Duration::seconds(60), 64));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let limiter = std::sync::Arc::clone(&limiter);
            std::thread::spawn(move || {
                (0..10).filter(|_| !limiter.check(addr(1)).limited).count()
            })
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(admitted, 10);
}
