// ABOUTME: Shared fixtures for the integration test suite
// ABOUTME: Seeded in-memory stores, low-cost bcrypt hashes, and wired-up services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

#![allow(dead_code)]

use fleetgate::admin::jwt::AdminJwtManager;
use fleetgate::admin::lockout::LockoutPolicy;
use fleetgate::admin::models::{AdminAccount, AdminRole};
use fleetgate::auth::AuthService;
use fleetgate::middleware::auth::AdminGatekeeper;
use fleetgate::store::memory::InMemoryStore;
use std::sync::Arc;

/// Signing secret shared by every fixture; long enough to pass validation
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub const TEST_PASSWORD: &str = "correct-h0rse";

/// Low bcrypt cost keeps the suite fast; production uses the default cost
pub fn hash_password(password: &str) -> String {
    bcrypt::hash(password, 4).unwrap()
}

/// An active account with [`TEST_PASSWORD`] and the role's default grants
pub fn seeded_account(username: &str, role: AdminRole) -> AdminAccount {
    AdminAccount::new(
        username.to_string(),
        format!("{username}@example.com"),
        hash_password(TEST_PASSWORD),
        role,
    )
}

pub fn jwt() -> AdminJwtManager {
    AdminJwtManager::new(TEST_SECRET, 8).unwrap()
}

pub fn gatekeeper(store: Arc<InMemoryStore>) -> AdminGatekeeper {
    AdminGatekeeper::new(
        store.clone(),
        store,
        jwt(),
        LockoutPolicy::default(),
    )
}

pub fn auth_service(store: Arc<InMemoryStore>) -> AuthService {
    AuthService::new(
        store.clone(),
        store,
        jwt(),
        LockoutPolicy::default(),
    )
}
