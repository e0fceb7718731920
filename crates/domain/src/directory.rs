//! Records and identifiers served by the read-only directory stores.

use dealdesk_core::Identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AccessScope, Module};

/// Unique identifier for a portal-user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalUserId(Uuid);

impl PortalUserId {
    /// Creates a new random portal-user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a portal-user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PortalUserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PortalUserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Creates a new random employee identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an employee identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Portal-user record keyed by identity. At most one active record exists per
/// identity; the directory surfaces duplicates as a data-integrity error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalUserRecord {
    /// Unique record identifier.
    pub id: PortalUserId,
    /// Identity key this record belongs to.
    pub identity: Identity,
    /// Display name shown in the dashboard shell.
    pub display_name: String,
    /// Assigned role, if any.
    pub role_id: Option<RoleId>,
    /// Salesperson name this user is linked to, used as the own-name fallback
    /// when no employee record resolves.
    pub linked_name: Option<String>,
    /// Employee record this user is linked to, the preferred own-name source
    /// and the hierarchy anchor for team visibility.
    pub linked_employee_id: Option<EmployeeId>,
    /// Per-user module override; takes precedence over the role's modules.
    pub module_overrides: Option<Vec<Module>>,
    /// Per-user scope override; takes precedence over the role's scope.
    pub scope_override: Option<AccessScope>,
    /// Whether the account is active. Inactive accounts resolve to no access.
    pub is_active: bool,
}

/// Role record referenced by zero or more portal users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Unique record identifier.
    pub id: RoleId,
    /// Role display name.
    pub name: String,
    /// Modules granted by this role.
    pub modules: Vec<Module>,
    /// Record scope granted by this role.
    pub scope: AccessScope,
}

/// Employee record. Forms a tree via the manager reference; the resolver uses
/// it only to materialize salesperson names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    /// Unique record identifier.
    pub id: EmployeeId,
    /// Full salesperson name as it appears on deal records.
    pub full_name: String,
    /// Direct manager, if any.
    pub manager_id: Option<EmployeeId>,
    /// Whether the employee is active. Inactive employees are excluded from
    /// team visibility.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::{EmployeeId, PortalUserId, RoleId};

    #[test]
    fn identifiers_format_as_uuid() {
        assert_eq!(PortalUserId::new().to_string().len(), 36);
        assert_eq!(RoleId::new().to_string().len(), 36);
        assert_eq!(EmployeeId::new().to_string().len(), 36);
    }
}
