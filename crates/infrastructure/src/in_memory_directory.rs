use std::collections::HashMap;

use async_trait::async_trait;
use dealdesk_application::{EmployeeDirectory, PortalUserDirectory, RoleDirectory};
use dealdesk_core::{AppError, AppResult, Identity};
use dealdesk_domain::{EmployeeId, EmployeeRecord, PortalUserRecord, RoleId, RoleRecord};
use tokio::sync::RwLock;

/// In-memory directory implementation backing the `memory` provider and
/// tests.
///
/// Portal users are stored as a plain list so duplicate identities can be
/// represented and surfaced as data-integrity errors at lookup time, the same
/// way the relational store behaves without a uniqueness constraint.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    portal_users: RwLock<Vec<PortalUserRecord>>,
    roles: RwLock<HashMap<RoleId, RoleRecord>>,
    employees: RwLock<HashMap<EmployeeId, EmployeeRecord>>,
}

impl InMemoryDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a portal-user record.
    pub async fn insert_portal_user(&self, record: PortalUserRecord) {
        self.portal_users.write().await.push(record);
    }

    /// Adds a role record.
    pub async fn insert_role(&self, record: RoleRecord) {
        self.roles.write().await.insert(record.id, record);
    }

    /// Adds an employee record.
    pub async fn insert_employee(&self, record: EmployeeRecord) {
        self.employees.write().await.insert(record.id, record);
    }
}

#[async_trait]
impl PortalUserDirectory for InMemoryDirectory {
    async fn find_by_identity(&self, identity: &Identity) -> AppResult<Option<PortalUserRecord>> {
        let portal_users = self.portal_users.read().await;
        let mut matches = portal_users
            .iter()
            .filter(|record| record.identity == *identity);
        let first = matches.next().cloned();

        if matches.next().is_some() {
            return Err(AppError::Ambiguous(format!(
                "multiple portal users match identity '{identity}'"
            )));
        }

        Ok(first)
    }
}

#[async_trait]
impl RoleDirectory for InMemoryDirectory {
    async fn find_by_id(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        Ok(self.roles.read().await.get(&role_id).cloned())
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>> {
        Ok(self.employees.read().await.get(&employee_id).cloned())
    }

    async fn list_active_reports(&self, manager_id: EmployeeId) -> AppResult<Vec<EmployeeRecord>> {
        let employees = self.employees.read().await;
        let mut reports: Vec<EmployeeRecord> = employees
            .values()
            .filter(|employee| employee.manager_id == Some(manager_id) && employee.is_active)
            .cloned()
            .collect();
        reports.sort_by(|left, right| left.full_name.cmp(&right.full_name));

        Ok(reports)
    }
}
