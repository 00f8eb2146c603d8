// ABOUTME: Session gatekeeper middleware verifying bearer tokens and attaching the admin identity
// ABOUTME: Runs the token/account/lockout/stale-password pipeline; first failing check is terminal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! # Session Gatekeeper
//!
//! Every protected route passes its request through [`AdminGatekeeper`]:
//!
//! 1. extract the bearer credential from the `Authorization` header
//! 2. verify it through the token codec
//! 3. load the subject account from the credential store
//! 4. reject deactivated accounts
//! 5. reject locked accounts
//! 6. reject tokens issued before the last password change
//! 7. attach the authenticated identity to the request
//!
//! The pipeline is stateless per request; no partial identity is ever
//! attached on failure. An optional-auth variant degrades to anonymous
//! instead of rejecting, for routes that merely behave differently for
//! authenticated callers.

use crate::admin::jwt::AdminJwtManager;
use crate::admin::lockout::{LockStatus, LockoutPolicy};
use crate::admin::models::{ActivityRecord, AdminAccount, AdminModule};
use crate::errors::{AppError, AppResult};
use crate::store::{ActivityLogger, CredentialStore};
use chrono::{DateTime, Utc};
use http::HeaderMap;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

/// Identity attached to a request after all checks pass
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    /// The verified account as currently stored
    pub account: AdminAccount,
    /// Issue time of the presented token
    pub token_issued_at: DateTime<Utc>,
}

/// Inbound request as seen by the gatekeeper: headers, client address, and
/// the mutable slot the authenticated identity is attached to
#[derive(Debug)]
pub struct GuardedRequest {
    headers: HeaderMap,
    client_addr: IpAddr,
    admin: Option<AuthenticatedAdmin>,
}

impl GuardedRequest {
    #[must_use]
    pub fn new(headers: HeaderMap, client_addr: IpAddr) -> Self {
        Self {
            headers,
            client_addr,
            admin: None,
        }
    }

    #[must_use]
    pub const fn client_addr(&self) -> IpAddr {
        self.client_addr
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The attached identity, if authentication succeeded
    #[must_use]
    pub const fn admin(&self) -> Option<&AuthenticatedAdmin> {
        self.admin.as_ref()
    }

    fn authorization(&self) -> Option<&str> {
        self.headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// Orchestrating middleware for per-request admin authentication
#[derive(Clone)]
pub struct AdminGatekeeper {
    store: Arc<dyn CredentialStore>,
    activity: Arc<dyn ActivityLogger>,
    jwt: AdminJwtManager,
    lockout: LockoutPolicy,
}

impl AdminGatekeeper {
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

    /// Authenticate the request and attach the identity on success
    ///
    /// # Errors
    /// The first failing pipeline step rejects with its distinct kind:
    /// `NoToken`, `InvalidToken`, `ExpiredToken`, `AccountNotFound`,
    /// `AccountDeactivated`, `AccountLocked`, or `StalePassword`.
    pub async fn authenticate(&self, request: &mut GuardedRequest) -> AppResult<()> {
        let admin = self.authenticate_header(request.authorization()).await?;
        tracing::debug!(
            admin_id = %admin.account.id,
            client = %request.client_addr(),
            "Request authenticated"
        );
        request.admin = Some(admin);
        Ok(())
    }

    /// Optional-auth variant: on any failure the request continues
    /// unauthenticated instead of being rejected
    pub async fn authenticate_optional(&self, request: &mut GuardedRequest) {
        match self.authenticate_header(request.authorization()).await {
            Ok(admin) => request.admin = Some(admin),
            Err(e) => {
                tracing::debug!(
                    client = %request.client_addr(),
                    "Continuing unauthenticated: {e}"
                );
            }
        }
    }

    /// Run the verification pipeline against a raw `Authorization` header
    ///
    /// # Errors
    /// See [`Self::authenticate`].
    pub async fn authenticate_header(
        &self,
        auth_header: Option<&str>,
    ) -> AppResult<AuthenticatedAdmin> {
        let token = extract_bearer_token(auth_header)?;
        let claims = self.jwt.verify(token)?;

        let account = self
            .store
            .find_by_id(claims.admin_id)
            .await
            .map_err(|e| AppError::store(format!("Account lookup failed: {e}")))?
            .ok_or_else(|| {
                tracing::warn!(admin_id = %claims.admin_id, "Token subject has no account");
                AppError::account_not_found()
            })?;

        if !account.is_active {
            tracing::warn!(admin_id = %account.id, "Rejected token for deactivated account");
            return Err(AppError::account_deactivated());
        }

        let now = Utc::now();
        if let LockStatus::Locked { until } = self.lockout.status(&account, now) {
            tracing::warn!(admin_id = %account.id, %until, "Rejected token for locked account");
            return Err(AppError::account_locked(
                until.signed_duration_since(now).num_seconds().max(0),
            ));
        }

        // Password changes invalidate every earlier token without a
        // revocation list: the issue time must not predate the change.
        if account.password_changed_at.timestamp() > claims.issued_at.timestamp() {
            tracing::warn!(admin_id = %account.id, "Rejected token issued before password change");
            return Err(AppError::stale_password());
        }

        Ok(AuthenticatedAdmin {
            account,
            token_issued_at: claims.issued_at,
        })
    }

    /// Record an activity entry after a successful authorized action
    ///
    /// Fire-and-forget: logging failures are traced and never propagate to
    /// the guarded request.
    pub fn log_activity(
        &self,
        actor_id: Uuid,
        action: impl Into<String>,
        module: AdminModule,
        detail: Option<String>,
    ) {
        let entry = ActivityRecord::new(actor_id, action, module, detail);
        let logger = Arc::clone(&self.activity);
        tokio::spawn(async move {
            if let Err(e) = logger.record(entry).await {
                tracing::warn!("Failed to record activity entry: {e}");
            }
        });
    }
}

/// Extract the bearer credential from an `Authorization` header value
///
/// # Errors
/// Returns `NoToken` when the header is absent, lacks the `Bearer ` scheme,
/// or carries an empty token.
fn extract_bearer_token(auth_header: Option<&str>) -> AppResult<&str> {
    let header = auth_header.ok_or_else(AppError::no_token)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(AppError::no_token)?
        .trim();
    if token.is_empty() {
        return Err(AppError::no_token());
    }
    Ok(token)
}
