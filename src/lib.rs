// ABOUTME: Admin authentication and access control core for the FleetGate car rental platform
// ABOUTME: Token codec, lockout guard, permission evaluator, rate limiter, and session gatekeeper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # FleetGate Auth Core
//!
//! Authentication and access control for the FleetGate admin console:
//!
//! - [`admin::jwt`] — HS256 session token codec with issuer/audience pinning
//! - [`admin::lockout`] — failed-login counting and timed account locks
//! - [`permissions`] — module/action permission evaluation with role bypass
//! - [`rate_limiting`] — per-address rolling-window request limiter
//! - [`middleware::auth`] — the per-request session gatekeeper pipeline
//! - [`auth`] — login, admin registration, and password rotation
//!
//! Storage is abstracted behind [`store::CredentialStore`] and
//! [`store::ActivityLogger`]; [`store::memory::InMemoryStore`] implements
//! both for tests and local development.

/// Admin domain: account models, token codec, lockout policy
pub mod admin;

/// Login, registration, and password management
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Unified error type and wire-format error codes
pub mod errors;

/// Request middleware (session gatekeeper)
pub mod middleware;

/// Permission and role checks
pub mod permissions;

/// Per-address request rate limiting
pub mod rate_limiting;

/// HTTP surface of the rate limiter: headers and the 429 error
pub mod rate_limiting_middleware;

/// Storage traits and the in-memory implementation
pub mod store;
