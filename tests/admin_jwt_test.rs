// ABOUTME: Integration tests for the session token codec
// ABOUTME: Covers expiry, tampering, and claim pinning using hand-built tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

mod common;

use chrono::{Duration, Utc};
use fleetgate::errors::ErrorKind;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

/// Wire-shape of the session claims, for building tokens the codec itself
/// would never issue (expired, wrong audience, wrong type)
#[derive(Serialize)]
struct RawClaims {
    iss: String,
    sub: String,
    aud: String,
    exp: i64,
    iat: i64,
    jti: String,
    token_type: String,
}

impl RawClaims {
    fn valid(admin_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            iss: "fleetgate".into(),
            sub: admin_id.to_string(),
            aud: "fleetgate-admin".into(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: "admin_session".into(),
        }
    }
}

fn sign(claims: &RawClaims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

#[test]
fn expired_token_is_rejected_as_expired() {
    let mut claims = RawClaims::valid(Uuid::new_v4());
    claims.iat = (Utc::now() - Duration::hours(2)).timestamp();
    claims.exp = (Utc::now() - Duration::hours(1)).timestamp();

    let err = common::jwt().verify(&sign(&claims)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpiredToken);
    assert_eq!(err.http_status(), 401);
}

#[test]
fn wrong_audience_is_invalid() {
    let mut claims = RawClaims::valid(Uuid::new_v4());
    claims.aud = "fleetgate-customer".into();

    let err = common::jwt().verify(&sign(&claims)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[test]
fn wrong_issuer_is_invalid() {
    let mut claims = RawClaims::valid(Uuid::new_v4());
    claims.iss = "someone-else".into();

    let err = common::jwt().verify(&sign(&claims)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[test]
fn non_session_token_type_is_invalid() {
    let mut claims = RawClaims::valid(Uuid::new_v4());
    claims.token_type = "refresh".into();

    let err = common::jwt().verify(&sign(&claims)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[test]
fn non_uuid_subject_is_invalid() {
    let mut claims = RawClaims::valid(Uuid::new_v4());
    claims.sub = "not-a-uuid".into();

    let err = common::jwt().verify(&sign(&claims)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[test]
fn tampered_payload_fails_signature_check() {
    let codec = common::jwt();
    let token = codec.issue(Uuid::new_v4()).unwrap();

    // Flip a character inside the payload segment.
    let mut parts: Vec<String> = token.split('.').map(String::from).collect();
    assert_eq!(parts.len(), 3);
    let payload = parts[1].clone();
    let flipped = if payload.ends_with('A') { "B" } else { "A" };
    parts[1] = format!("{}{}", &payload[..payload.len() - 1], flipped);

    let err = codec.verify(&parts.join(".")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[test]
fn issued_token_round_trips_subject_and_issue_time() {
    let codec = common::jwt();
    let admin_id = Uuid::new_v4();
    let before = Utc::now() - Duration::seconds(1);

    let claims = codec.verify(&codec.issue(admin_id).unwrap()).unwrap();
    assert_eq!(claims.admin_id, admin_id);
    assert!(claims.issued_at >= before);
    assert!(claims.issued_at <= Utc::now());
}
