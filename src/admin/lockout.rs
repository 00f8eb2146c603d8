// ABOUTME: Lockout guard tracking consecutive authentication failures per admin account
// ABOUTME: Locks an account after a failure threshold; lock state lives on the persisted record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! Account Lockout Guard
//!
//! The guard is a pure policy over the persisted [`AdminAccount`] fields:
//! callers apply `register_failure`/`register_success` and save the account
//! through the credential store. Keeping the state on the record means
//! lockout survives process restarts and is consistent across instances.
//!
//! Lock expiry is lazy: an elapsed lock reads as unlocked, and the stored
//! `lock_expires_at` is cleared at the next successful or failed attempt.

use crate::admin::models::AdminAccount;
use chrono::{DateTime, Duration, Utc};

/// Consecutive failures before an account locks
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// How long a lock lasts, in seconds
pub const DEFAULT_LOCK_DURATION_SECS: i64 = 900;

/// Lock state of an account at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    Locked {
        /// When the lock expires
        until: DateTime<Utc>,
    },
}

/// Failure-threshold lockout policy
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    threshold: u32,
    lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FAILURE_THRESHOLD,
            lock_duration: Duration::seconds(DEFAULT_LOCK_DURATION_SECS),
        }
    }
}

impl LockoutPolicy {
    /// Policy with an explicit threshold and lock duration
    #[must_use]
    pub const fn new(threshold: u32, lock_duration: Duration) -> Self {
        Self {
            threshold,
            lock_duration,
        }
    }

    /// Current lock state; an elapsed lock reads as unlocked
    #[must_use]
    pub fn status(&self, account: &AdminAccount, now: DateTime<Utc>) -> LockStatus {
        match account.lock_expires_at {
            Some(until) if until > now => LockStatus::Locked { until },
            _ => LockStatus::Unlocked,
        }
    }

    /// Record a failed authentication attempt
    ///
    /// Clears an elapsed lock, increments the failure counter, and on
    /// crossing the threshold locks the account and resets the counter.
    /// Returns the resulting state; the caller persists the account.
    pub fn register_failure(&self, account: &mut AdminAccount, now: DateTime<Utc>) -> LockStatus {
        if account
            .lock_expires_at
            .is_some_and(|until| until <= now)
        {
            account.lock_expires_at = None;
        }

        account.failed_login_count += 1;
        if account.failed_login_count >= self.threshold {
            let until = now + self.lock_duration;
            account.lock_expires_at = Some(until);
            account.failed_login_count = 0;
            tracing::warn!(
                admin_id = %account.id,
                %until,
                "Account locked after repeated authentication failures"
            );
            return LockStatus::Locked { until };
        }

        LockStatus::Unlocked
    }

    /// Record a successful authentication
    ///
    /// Resets the failure counter, clears any lock, and stamps the last
    /// login time. Returns nothing; the caller persists the account.
    pub fn register_success(&self, account: &mut AdminAccount, now: DateTime<Utc>) {
        account.failed_login_count = 0;
        account.lock_expires_at = None;
        account.last_login_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::models::AdminRole;

    fn account() -> AdminAccount {
        AdminAccount::new(
            "ops".into(),
            "ops@example.com".into(),
            "hash".into(),
            AdminRole::Manager,
        )
    }

    #[test]
    fn test_threshold_locks_and_resets_counter() {
        let policy = LockoutPolicy::new(5, Duration::minutes(15));
        let mut acct = account();
        let now = Utc::now();

        for _ in 0..4 {
            assert_eq!(policy.register_failure(&mut acct, now), LockStatus::Unlocked);
        }
        assert_eq!(acct.failed_login_count, 4);

        let status = policy.register_failure(&mut acct, now);
        assert!(matches!(status, LockStatus::Locked { until } if until == now + Duration::minutes(15)));
        assert_eq!(acct.failed_login_count, 0);
    }

    #[test]
    fn test_elapsed_lock_reads_unlocked_and_is_cleared() {
        let policy = LockoutPolicy::default();
        let mut acct = account();
        let now = Utc::now();
        acct.lock_expires_at = Some(now - Duration::seconds(1));

        assert_eq!(policy.status(&acct, now), LockStatus::Unlocked);

        policy.register_failure(&mut acct, now);
        assert!(acct.lock_expires_at.is_none());
        assert_eq!(acct.failed_login_count, 1);
    }

    #[test]
    fn test_active_lock_blocks() {
        let policy = LockoutPolicy::default();
        let mut acct = account();
        let now = Utc::now();
        let until = now + Duration::minutes(5);
        acct.lock_expires_at = Some(until);

        assert_eq!(policy.status(&acct, now), LockStatus::Locked { until });
    }

    #[test]
    fn test_success_clears_state_and_stamps_login() {
        let policy = LockoutPolicy::default();
        let mut acct = account();
        let now = Utc::now();
        acct.failed_login_count = 3;
        acct.lock_expires_at = Some(now - Duration::seconds(10));

        policy.register_success(&mut acct, now);
        assert_eq!(acct.failed_login_count, 0);
        assert!(acct.lock_expires_at.is_none());
        assert_eq!(acct.last_login_at, Some(now));
    }
}
