// ABOUTME: Outbound contracts to the credential store and activity logger collaborators
// ABOUTME: Async object-safe traits; implementations own persistence, the core owns policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Storage Contracts
//!
//! The auth core never talks to a database directly. Collaborators implement
//! [`CredentialStore`] for admin account records and [`ActivityLogger`] for
//! the append-only activity trail. Store calls are async with no internally
//! imposed timeout; the caller's request-timeout policy governs.

use crate::admin::models::{ActivityRecord, AdminAccount};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Admin account persistence owned by the surrounding application
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>>;

    /// Look up an account by exact username or email match
    async fn find_by_username_or_email(&self, value: &str) -> Result<Option<AdminAccount>>;

    /// Persist the account, including failure counters, lock expiry,
    /// last-login, and password-changed timestamps
    async fn save(&self, account: &AdminAccount) -> Result<()>;
}

/// Append-only activity trail
///
/// Recording is fire-and-forget at call sites: a failure here must never
/// fail the guarded request.
#[async_trait]
pub trait ActivityLogger: Send + Sync {
    /// Append one record
    async fn record(&self, entry: ActivityRecord) -> Result<()>;
}

pub mod memory;
