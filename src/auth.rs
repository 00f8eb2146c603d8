// ABOUTME: Login, admin registration, and password-change service for the admin console
// ABOUTME: bcrypt verification off the async executor; lockout paths persisted through the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Authentication Service
//!
//! Collaborator-facing operations that sit next to the gatekeeper: `login`
//! exchanges credentials for a session token, `register_admin` creates
//! accounts (top role only), and `change_password` rotates the password and
//! stamps `password_changed_at`, invalidating every previously issued token.
//!
//! Login returns the identical `InvalidCredentials` error whether or not the
//! username exists; for unknown identities a bcrypt hash of the presented
//! password is still computed so response timing does not leak existence.

use crate::admin::jwt::AdminJwtManager;
use crate::admin::lockout::{LockStatus, LockoutPolicy};
use crate::admin::models::{
    ActivityRecord, AdminAccount, AdminModule, AdminRole, PermissionSet,
};
use crate::errors::{AppError, AppResult};
use crate::permissions;
use crate::store::{ActivityLogger, CredentialStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub username_or_email: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Bearer session token
    pub token: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
    pub admin: AdminSummary,
}

/// Public-facing account summary returned on login
#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
}

impl From<&AdminAccount> for AdminSummary {
    fn from(account: &AdminAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

/// Admin registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: AdminRole,
    /// Explicit grants; role defaults apply when omitted
    pub permissions: Option<PermissionSet>,
}

/// Login, registration, and password management for admin accounts
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    activity: Arc<dyn ActivityLogger>,
    jwt: AdminJwtManager,
    lockout: LockoutPolicy,
}

impl AuthService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        activity: Arc<dyn ActivityLogger>,
        jwt: AdminJwtManager,
        lockout: LockoutPolicy,
    ) -> Self {
        Self {
            store,
            activity,
            jwt,
            lockout,
        }
    }

    /// Exchange credentials for a session token
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown identity or wrong password
    /// - `AccountDeactivated` for a deactivated account
    /// - `AccountLocked` while a lock is active; locked accounts are rejected
    ///   before password verification
    /// - `StoreError` / `InternalError` for collaborator failures
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        tracing::info!(identity = %request.username_or_email, "Admin login attempt");

        let account = self
            .store
            .find_by_username_or_email(&request.username_or_email)
            .await
            .map_err(|e| AppError::store(format!("Account lookup failed: {e}")))?;

        let Some(mut account) = account else {
            // Burn the same hashing cost as the known-identity path so the
            // response time does not reveal whether the username exists.
            let password = request.password;
            let _ = tokio::task::spawn_blocking(move || {
                bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            })
            .await;
            tracing::warn!(identity = %request.username_or_email, "Login for unknown identity");
            return Err(AppError::invalid_credentials());
        };

        if !account.is_active {
            tracing::warn!(admin_id = %account.id, "Login on deactivated account");
            return Err(AppError::account_deactivated());
        }

        let now = Utc::now();
        if let LockStatus::Locked { until } = self.lockout.status(&account, now) {
            tracing::warn!(admin_id = %account.id, %until, "Login on locked account");
            return Err(AppError::account_locked(
                until.signed_duration_since(now).num_seconds().max(0),
            ));
        }

        if !verify_password(&request.password, &account.password_hash).await? {
            self.lockout.register_failure(&mut account, now);
            self.store
                .save(&account)
                .await
                .map_err(|e| AppError::store(format!("Failed to persist failure count: {e}")))?;
            tracing::warn!(admin_id = %account.id, "Login with wrong password");
            return Err(AppError::invalid_credentials());
        }

        self.lockout.register_success(&mut account, now);
        self.store
            .save(&account)
            .await
            .map_err(|e| AppError::store(format!("Failed to persist login state: {e}")))?;

        let token = self.jwt.issue(account.id)?;
        self.record_activity(ActivityRecord::new(
            account.id,
            "login",
            AdminModule::Admins,
            None,
        ));
        tracing::info!(admin_id = %account.id, "Admin logged in");

        Ok(LoginResponse {
            token,
            expires_at: now + self.jwt.expiry(),
            admin: AdminSummary::from(&account),
        })
    }

    /// Register a new admin account; only the top-privilege role may do this
    ///
    /// # Errors
    /// - `RoleRequired` when the acting account is not a super admin
    /// - `InvalidInput` for a malformed email, weak password, or taken
    ///   username/email
    pub async fn register_admin(
        &self,
        acting: &AdminAccount,
        request: RegisterAdminRequest,
    ) -> AppResult<Uuid> {
        permissions::require_role(acting, &[AdminRole::SuperAdmin])?;

        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email address"));
        }
        if !is_valid_password(&request.password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters and mix letters and digits"
            )));
        }
        for taken in [&request.username, &request.email] {
            if self
                .store
                .find_by_username_or_email(taken)
                .await
                .map_err(|e| AppError::store(format!("Uniqueness check failed: {e}")))?
                .is_some()
            {
                return Err(AppError::invalid_input("Username or email already in use"));
            }
        }

        let password = request.password;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let mut account = AdminAccount::new(
            request.username,
            request.email,
            password_hash,
            request.role,
        );
        if let Some(grants) = request.permissions {
            account.permissions = grants;
        }

        self.store
            .save(&account)
            .await
            .map_err(|e| AppError::store(format!("Failed to persist account: {e}")))?;

        self.record_activity(ActivityRecord::new(
            acting.id,
            "register_admin",
            AdminModule::Admins,
            Some(account.id.to_string()),
        ));
        tracing::info!(admin_id = %account.id, role = %account.role, "Admin account registered");

        Ok(account.id)
    }

    /// Rotate an account's password after verifying the current one
    ///
    /// Stamps `password_changed_at`, which invalidates all tokens issued
    /// before this call.
    ///
    /// # Errors
    /// - `AccountNotFound` for an unknown id
    /// - `InvalidCredentials` when the current password does not verify
    /// - `InvalidInput` for a weak replacement password
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let mut account = self
            .store
            .find_by_id(account_id)
            .await
            .map_err(|e| AppError::store(format!("Account lookup failed: {e}")))?
            .ok_or_else(AppError::account_not_found)?;

        if !verify_password(current_password, &account.password_hash).await? {
            tracing::warn!(admin_id = %account.id, "Password change with wrong current password");
            return Err(AppError::invalid_credentials());
        }
        if !is_valid_password(new_password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters and mix letters and digits"
            )));
        }

        let new_password = new_password.to_owned();
        account.password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&new_password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        account.password_changed_at = Utc::now();

        self.store
            .save(&account)
            .await
            .map_err(|e| AppError::store(format!("Failed to persist password change: {e}")))?;

        self.record_activity(ActivityRecord::new(
            account.id,
            "password_change",
            AdminModule::Admins,
            None,
        ));
        tracing::info!(admin_id = %account.id, "Password changed; earlier tokens invalidated");

        Ok(())
    }

    fn record_activity(&self, entry: ActivityRecord) {
        let logger = Arc::clone(&self.activity);
        tokio::spawn(async move {
            if let Err(e) = logger.record(entry).await {
                tracing::warn!("Failed to record activity entry: {e}");
            }
        });
    }
}

/// bcrypt verification on a blocking thread; the comparison inside bcrypt is
/// constant-time
async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
        && password.chars().any(char::is_alphabetic)
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ops@example.com"));
        assert!(!is_valid_email("ops"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ops@nodot"));
        assert!(!is_valid_email("ops@example."));
    }

    #[test]
    fn test_password_validation() {
        assert!(is_valid_password("s3curepass"));
        assert!(!is_valid_password("short1"));
        assert!(!is_valid_password("lettersonly"));
        assert!(!is_valid_password("12345678"));
    }
}
