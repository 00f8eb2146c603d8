// ABOUTME: Request middleware for the admin surface
// ABOUTME: Session gatekeeping lives here; rate limiting has its own top-level modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

/// Session gatekeeper for protected admin routes
pub mod auth;
