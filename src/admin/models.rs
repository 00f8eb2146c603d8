// ABOUTME: Data models for admin accounts, roles, permission grants, and activity records
// ABOUTME: Strong closed enums for roles/modules/actions so no string-literal checks exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

//! Admin Account Models
//!
//! Strong Rust types for the admin authentication system. Roles are a closed
//! enumeration with an explicit top-role bypass flag; modules and actions are
//! closed enumerations so permission grants cannot drift through typos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Admin account record as persisted by the credential store
///
/// Lock state and failure counters live here (not in process memory) so
/// lockout survives restarts and is consistent across instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    /// Unique account identifier
    pub id: Uuid,
    /// Login name, unique
    pub username: String,
    /// Contact email, unique, also accepted at login
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Coarse-grained role
    pub role: AdminRole,
    /// Fine-grained module/action grants
    pub permissions: PermissionSet,
    /// Deactivated accounts cannot authenticate; accounts are never deleted
    pub is_active: bool,
    /// Consecutive failed login attempts since the last success
    pub failed_login_count: u32,
    /// When set and in the future, the account cannot authenticate
    pub lock_expires_at: Option<DateTime<Utc>>,
    /// Tokens issued before this instant are rejected as stale
    pub password_changed_at: DateTime<Utc>,
    /// Last successful login
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    /// Create a new active account with role-default permissions
    #[must_use]
    pub fn new(username: String, email: String, password_hash: String, role: AdminRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            role,
            permissions: PermissionSet::default_for(role),
            is_active: true,
            failed_login_count: 0,
            lock_expires_at: None,
            password_changed_at: now,
            last_login_at: None,
            created_at: now,
        }
    }
}

/// Closed role enumeration for the admin console
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Top-privilege role; bypasses all permission-set checks
    SuperAdmin,
    /// Day-to-day fleet and content management
    Manager,
    /// Read-mostly customer support role
    Support,
}

impl AdminRole {
    /// Whether this role passes every permission check unconditionally
    #[must_use]
    pub const fn bypasses_permission_checks(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Manager => write!(f, "manager"),
            Self::Support => write!(f, "support"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "manager" => Ok(Self::Manager),
            "support" => Ok(Self::Support),
            _ => Err(format!("Unknown admin role: {s}")),
        }
    }
}

/// Functional modules of the rental backend that grants are scoped to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdminModule {
    /// Fleet and vehicle catalog
    Cars,
    /// Customer bookings
    Bookings,
    /// News and blog content
    News,
    /// Admin account management
    Admins,
    /// Activity log viewing
    Activity,
}

impl std::fmt::Display for AdminModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cars => write!(f, "cars"),
            Self::Bookings => write!(f, "bookings"),
            Self::News => write!(f, "news"),
            Self::Admins => write!(f, "admins"),
            Self::Activity => write!(f, "activity"),
        }
    }
}

impl std::str::FromStr for AdminModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cars" => Ok(Self::Cars),
            "bookings" => Ok(Self::Bookings),
            "news" => Ok(Self::News),
            "admins" => Ok(Self::Admins),
            "activity" => Ok(Self::Activity),
            _ => Err(format!("Unknown admin module: {s}")),
        }
    }
}

/// Actions a grant can allow on a module
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    View,
    Create,
    Update,
    Delete,
}

impl AdminAction {
    /// All actions, for full-access grants
    pub const ALL: [Self; 4] = [Self::View, Self::Create, Self::Update, Self::Delete];
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for AdminAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(format!("Unknown admin action: {s}")),
        }
    }
}

/// Fine-grained grants: module name to the set of allowed actions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionSet {
    grants: HashMap<AdminModule, HashSet<AdminAction>>,
}

impl PermissionSet {
    /// Empty grant set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Role-default grants for newly registered accounts
    #[must_use]
    pub fn default_for(role: AdminRole) -> Self {
        match role {
            // Super admins bypass checks; an empty set documents that nothing
            // is granted through this mechanism.
            AdminRole::SuperAdmin => Self::new(),
            AdminRole::Manager => {
                let mut set = Self::new();
                for module in [AdminModule::Cars, AdminModule::Bookings, AdminModule::News] {
                    for action in AdminAction::ALL {
                        set.grant(module, action);
                    }
                }
                set.grant(AdminModule::Activity, AdminAction::View);
                set
            }
            AdminRole::Support => {
                let mut set = Self::new();
                set.grant(AdminModule::Cars, AdminAction::View);
                set.grant(AdminModule::Bookings, AdminAction::View);
                set.grant(AdminModule::Bookings, AdminAction::Update);
                set
            }
        }
    }

    /// Add a grant
    pub fn grant(&mut self, module: AdminModule, action: AdminAction) -> bool {
        self.grants.entry(module).or_default().insert(action)
    }

    /// Remove a grant; empty modules are dropped from the set
    pub fn revoke(&mut self, module: AdminModule, action: AdminAction) -> bool {
        match self.grants.get_mut(&module) {
            Some(actions) => {
                let removed = actions.remove(&action);
                if actions.is_empty() {
                    self.grants.remove(&module);
                }
                removed
            }
            None => false,
        }
    }

    /// True iff the module is present and the action is in its allowed set
    #[must_use]
    pub fn allows(&self, module: AdminModule, action: AdminAction) -> bool {
        self.grants
            .get(&module)
            .is_some_and(|actions| actions.contains(&action))
    }

    /// Modules with at least one grant
    #[must_use]
    pub fn modules(&self) -> Vec<AdminModule> {
        self.grants.keys().copied().collect()
    }

    /// Serialize for database storage
    ///
    /// # Errors
    /// Returns `serde_json::Error` if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from database storage
    ///
    /// # Errors
    /// Returns `serde_json::Error` if deserialization fails
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Append-only activity log entry recorded after successful authorized actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Storage-assigned identifier
    pub id: Option<i64>,
    /// Admin who performed the action
    pub actor_id: Uuid,
    /// Action performed, e.g. "login" or "update"
    pub action: String,
    /// Module the action targeted
    pub module: AdminModule,
    /// Contextual detail, e.g. the affected resource id
    pub detail: Option<String>,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
}

impl ActivityRecord {
    /// New record stamped with the current time
    #[must_use]
    pub fn new(
        actor_id: Uuid,
        action: impl Into<String>,
        module: AdminModule,
        detail: Option<String>,
    ) -> Self {
        Self {
            id: None,
            actor_id,
            action: action.into(),
            module,
            detail,
            timestamp: Utc::now(),
        }
    }
}
