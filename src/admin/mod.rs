// ABOUTME: Admin authentication building blocks: models, token codec, lockout guard
// ABOUTME: Consumed by the session gatekeeper middleware and the login service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! Admin authentication building blocks

/// Session token issuing and verification
pub mod jwt;

/// Failure-threshold account lockout
pub mod lockout;

/// Account, role, permission, and activity models
pub mod models;
