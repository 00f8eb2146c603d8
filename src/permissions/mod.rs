// ABOUTME: Permission evaluator answering role and (module, action) authorization questions
// ABOUTME: Role is the coarse gate, the permission set the fine gate; both check independently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! Permission Evaluation
//!
//! Two independent gates protect admin routes: `has_role` answers whether a
//! principal may reach a subsystem at all, `has_permission` whether it may
//! perform a specific (module, action) pair. The top-privilege role passes
//! every permission check unconditionally via its enum flag; there is no
//! string comparison anywhere in the gate.

use crate::admin::models::{AdminAccount, AdminAction, AdminModule, AdminRole};
use crate::errors::{AppError, AppResult};

/// True iff the account may perform `action` on `module`
#[must_use]
pub fn has_permission(account: &AdminAccount, module: AdminModule, action: AdminAction) -> bool {
    account.role.bypasses_permission_checks() || account.permissions.allows(module, action)
}

/// True iff the account's role is in the allowed set
#[must_use]
pub fn has_role(account: &AdminAccount, allowed: &[AdminRole]) -> bool {
    allowed.contains(&account.role)
}

/// Route-guard form of [`has_permission`]
///
/// # Errors
/// Returns `PermissionDenied` (HTTP 403) when the grant is absent
pub fn require_permission(
    account: &AdminAccount,
    module: AdminModule,
    action: AdminAction,
) -> AppResult<()> {
    if has_permission(account, module, action) {
        Ok(())
    } else {
        tracing::warn!(
            admin_id = %account.id,
            %module,
            %action,
            "Permission denied"
        );
        Err(AppError::permission_denied(format!(
            "Not permitted to {action} on {module}"
        )))
    }
}

/// Route-guard form of [`has_role`]
///
/// # Errors
/// Returns `RoleRequired` (HTTP 403) when the role is not in the allowed set
pub fn require_role(account: &AdminAccount, allowed: &[AdminRole]) -> AppResult<()> {
    if has_role(account, allowed) {
        Ok(())
    } else {
        tracing::warn!(
            admin_id = %account.id,
            role = %account.role,
            "Role not permitted for this route"
        );
        Err(AppError::role_required(format!(
            "Role {} is not permitted here",
            account.role
        )))
    }
}
