// ABOUTME: In-memory credential store and activity logger for tests and local development
// ABOUTME: Backed by tokio RwLocks; accounts keyed by id, activity kept append-only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 FleetGate Mobility

use crate::admin::models::{ActivityRecord, AdminAccount};
use crate::store::{ActivityLogger, CredentialStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory [`CredentialStore`] and [`ActivityLogger`]
#[derive(Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<Uuid, AdminAccount>>,
    activity: RwLock<Vec<ActivityRecord>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly, bypassing registration
    pub async fn insert_account(&self, account: AdminAccount) {
        self.accounts.write().await.insert(account.id, account);
    }

    /// Snapshot of the activity trail, oldest first
    pub async fn activity_log(&self) -> Vec<ActivityRecord> {
        self.activity.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_username_or_email(&self, value: &str) -> Result<Option<AdminAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.username == value || a.email == value)
            .cloned())
    }

    async fn save(&self, account: &AdminAccount) -> Result<()> {
        self.accounts
            .write()
            .await
            .insert(account.id, account.clone());
        Ok(())
    }
}

#[async_trait]
impl ActivityLogger for InMemoryStore {
    async fn record(&self, entry: ActivityRecord) -> Result<()> {
        self.activity.write().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::models::{AdminModule, AdminRole};

    #[tokio::test]
    async fn test_lookup_by_username_and_email() {
        let store = InMemoryStore::new();
        let account = AdminAccount::new(
            "ops".into(),
            "ops@example.com".into(),
            "hash".into(),
            AdminRole::Manager,
        );
        let id = account.id;
        store.insert_account(account).await;

        assert!(store.find_by_id(id).await.unwrap().is_some());
        assert!(store
            .find_by_username_or_email("ops")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_username_or_email("ops@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_username_or_email("nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_activity_is_append_only() {
        let store = InMemoryStore::new();
        let actor = Uuid::new_v4();
        store
            .record(ActivityRecord::new(actor, "login", AdminModule::Admins, None))
            .await
            .unwrap();
        store
            .record(ActivityRecord::new(
                actor,
                "update",
                AdminModule::Cars,
                Some("car-42".into()),
            ))
            .await
            .unwrap();

        let log = store.activity_log().await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, "login");
        assert_eq!(log[1].detail.as_deref(), Some("car-42"));
    }
}
