//! Read-only directory ports consumed by the scope resolver.
//!
//! The directories are passive stores owned elsewhere; the resolver never
//! writes through these ports.

use async_trait::async_trait;
use dealdesk_core::{AppResult, Identity};
use dealdesk_domain::{EmployeeId, EmployeeRecord, PortalUserRecord, RoleId, RoleRecord};

/// Port for portal-user lookups keyed by identity.
#[async_trait]
pub trait PortalUserDirectory: Send + Sync {
    /// Finds the portal-user record for an identity.
    ///
    /// At most one record may exist per identity. Implementations must
    /// surface multiple matches as an ambiguous-lookup error rather than
    /// silently resolving to the first row.
    async fn find_by_identity(&self, identity: &Identity) -> AppResult<Option<PortalUserRecord>>;
}

/// Port for role lookups. Consulted only when a portal user carries a role
/// reference.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Finds a role record by id.
    async fn find_by_id(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>>;
}

/// Port for employee lookups. Both operations are read-only and idempotent.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Finds an employee record by id.
    async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>>;

    /// Lists active employees reporting directly to a manager, ordered by
    /// full name. Returns an empty list when the manager has no reports.
    async fn list_active_reports(&self, manager_id: EmployeeId) -> AppResult<Vec<EmployeeRecord>>;
}
