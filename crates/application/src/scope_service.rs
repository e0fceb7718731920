//! Data-scope resolution engine.
//!
//! Derives, for one authenticated identity, the functional modules that
//! identity may use and the set of salesperson names whose records it may
//! see. Missing data never widens access: an unknown identity, an absent
//! scope, or an unresolvable own-name all collapse to the most restrictive
//! outcome.

use std::collections::BTreeSet;
use std::sync::Arc;

use dealdesk_core::{AppResult, Identity};
use dealdesk_domain::{AccessScope, Module, PortalUserRecord, VisibilitySet};

use crate::{EmployeeDirectory, PortalUserDirectory, RoleDirectory};

/// Final authorization derived for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccess {
    /// Effective record scope after override-first precedence.
    pub scope: AccessScope,
    /// Effective module list after override-first precedence.
    pub modules: Vec<Module>,
    /// Materialized owner-name filter for record queries.
    pub visibility: VisibilitySet,
}

impl ResolvedAccess {
    /// The terminal no-access value: scope `none`, no modules, nothing
    /// visible.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            scope: AccessScope::None,
            modules: Vec::new(),
            visibility: VisibilitySet::Empty,
        }
    }

    /// Returns whether a module is usable under this authorization.
    #[must_use]
    pub fn allows_module(&self, module: Module) -> bool {
        self.modules.contains(&module)
    }
}

/// Application service deriving record scope and module access for an
/// identity from the portal-user, role, and employee directories.
#[derive(Clone)]
pub struct ScopeService {
    portal_users: Arc<dyn PortalUserDirectory>,
    roles: Arc<dyn RoleDirectory>,
    employees: Arc<dyn EmployeeDirectory>,
}

impl ScopeService {
    /// Creates a scope service from directory implementations.
    #[must_use]
    pub fn new(
        portal_users: Arc<dyn PortalUserDirectory>,
        roles: Arc<dyn RoleDirectory>,
        employees: Arc<dyn EmployeeDirectory>,
    ) -> Self {
        Self {
            portal_users,
            roles,
            employees,
        }
    }

    /// Resolves the authorization for one identity.
    ///
    /// An unknown or deactivated identity resolves to [`ResolvedAccess::denied`];
    /// that is an expected outcome, not an error. Directory failures
    /// propagate unchanged so callers can distinguish "allowed to see
    /// nothing" from "could not determine what may be seen".
    pub async fn resolve(&self, identity: &Identity) -> AppResult<ResolvedAccess> {
        let Some(portal_user) = self.portal_users.find_by_identity(identity).await? else {
            return Ok(ResolvedAccess::denied());
        };

        if !portal_user.is_active {
            return Ok(ResolvedAccess::denied());
        }

        // A dangling role reference degrades to "no role", which the
        // precedence table fails closed to scope `none`.
        let role = match portal_user.role_id {
            Some(role_id) => self.roles.find_by_id(role_id).await?,
            None => None,
        };

        let scope = AccessScope::effective(
            portal_user.scope_override,
            role.as_ref().map(|role| role.scope),
        );
        let modules = Module::effective(
            portal_user.module_overrides.clone(),
            role.map(|role| role.modules),
        );
        let visibility = self.resolve_visibility(scope, &portal_user).await?;

        Ok(ResolvedAccess {
            scope,
            modules,
            visibility,
        })
    }

    async fn resolve_visibility(
        &self,
        scope: AccessScope,
        portal_user: &PortalUserRecord,
    ) -> AppResult<VisibilitySet> {
        match scope {
            AccessScope::All => Ok(VisibilitySet::Unrestricted),
            AccessScope::None => Ok(VisibilitySet::Empty),
            AccessScope::Own => Ok(match self.resolve_own_name(portal_user).await? {
                Some(own_name) => VisibilitySet::from_names([own_name]),
                None => VisibilitySet::Empty,
            }),
            AccessScope::Team => {
                let Some(own_name) = self.resolve_own_name(portal_user).await? else {
                    return Ok(VisibilitySet::Empty);
                };

                let mut names = BTreeSet::from([own_name]);
                // Reports can only be enumerated from a hierarchy anchor;
                // without a linked employee the team collapses to the user
                // themselves.
                if let Some(manager_id) = portal_user.linked_employee_id {
                    for report in self.employees.list_active_reports(manager_id).await? {
                        names.insert(report.full_name);
                    }
                }

                Ok(VisibilitySet::Names(names))
            }
        }
    }

    /// Own-name precedence: the linked employee's full name wins; the stored
    /// linked name is only a fallback when no employee record resolves.
    async fn resolve_own_name(&self, portal_user: &PortalUserRecord) -> AppResult<Option<String>> {
        if let Some(employee_id) = portal_user.linked_employee_id
            && let Some(employee) = self.employees.find_by_id(employee_id).await?
        {
            return Ok(Some(employee.full_name));
        }

        Ok(portal_user.linked_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use dealdesk_core::{AppError, AppResult, Identity};
    use dealdesk_domain::{
        AccessScope, EmployeeId, EmployeeRecord, Module, PortalUserId, PortalUserRecord, RoleId,
        RoleRecord, VisibilitySet,
    };

    use super::{
        EmployeeDirectory, PortalUserDirectory, ResolvedAccess, RoleDirectory, ScopeService,
    };

    #[derive(Default)]
    struct FakeDirectory {
        portal_users: Vec<PortalUserRecord>,
        roles: HashMap<RoleId, RoleRecord>,
        employees: HashMap<EmployeeId, EmployeeRecord>,
        fail_portal_lookup: bool,
    }

    #[async_trait]
    impl PortalUserDirectory for FakeDirectory {
        async fn find_by_identity(
            &self,
            identity: &Identity,
        ) -> AppResult<Option<PortalUserRecord>> {
            if self.fail_portal_lookup {
                return Err(AppError::Transport("portal-user store unreachable".to_owned()));
            }

            let mut matches = self
                .portal_users
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
    impl RoleDirectory for FakeDirectory {
        async fn find_by_id(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
            Ok(self.roles.get(&role_id).cloned())
        }
    }

    #[async_trait]
    impl EmployeeDirectory for FakeDirectory {
        async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>> {
            Ok(self.employees.get(&employee_id).cloned())
        }

        async fn list_active_reports(
            &self,
            manager_id: EmployeeId,
        ) -> AppResult<Vec<EmployeeRecord>> {
            let mut reports: Vec<EmployeeRecord> = self
                .employees
                .values()
                .filter(|employee| employee.manager_id == Some(manager_id) && employee.is_active)
                .cloned()
                .collect();
            reports.sort_by(|left, right| left.full_name.cmp(&right.full_name));
            Ok(reports)
        }
    }

    fn service(directory: FakeDirectory) -> ScopeService {
        let directory = Arc::new(directory);
        ScopeService::new(directory.clone(), directory.clone(), directory)
    }

    fn identity(value: &str) -> Identity {
        match Identity::new(value) {
            Ok(identity) => identity,
            Err(error) => panic!("test identity '{value}' is invalid: {error}"),
        }
    }

    fn portal_user(identity_value: &str) -> PortalUserRecord {
        PortalUserRecord {
            id: PortalUserId::new(),
            identity: identity(identity_value),
            display_name: "Portal User".to_owned(),
            role_id: None,
            linked_name: None,
            linked_employee_id: None,
            module_overrides: None,
            scope_override: None,
            is_active: true,
        }
    }

    fn employee(full_name: &str, manager_id: Option<EmployeeId>, is_active: bool) -> EmployeeRecord {
        EmployeeRecord {
            id: EmployeeId::new(),
            full_name: full_name.to_owned(),
            manager_id,
            is_active,
        }
    }

    async fn resolve(service: &ScopeService, identity_value: &str) -> ResolvedAccess {
        match service.resolve(&identity(identity_value)).await {
            Ok(access) => access,
            Err(error) => panic!("resolution failed: {error}"),
        }
    }

    #[tokio::test]
    async fn role_scope_and_modules_apply_without_overrides() {
        let role_id = RoleId::new();
        let mut user = portal_user("jane@corp.example");
        user.role_id = Some(role_id);
        user.linked_name = Some("Jane Doe".to_owned());

        let directory = FakeDirectory {
            portal_users: vec![user],
            roles: HashMap::from([(
                role_id,
                RoleRecord {
                    id: role_id,
                    name: "Sales Rep".to_owned(),
                    modules: vec![Module::Deals],
                    scope: AccessScope::Own,
                },
            )]),
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "jane@corp.example").await;
        assert_eq!(access.scope, AccessScope::Own);
        assert_eq!(access.modules, vec![Module::Deals]);
        assert_eq!(
            access.visibility,
            VisibilitySet::from_names(["Jane Doe".to_owned()])
        );
    }

    #[tokio::test]
    async fn missing_employee_without_linked_name_fails_closed() {
        let mut user = portal_user("rep@corp.example");
        user.scope_override = Some(AccessScope::Own);
        user.linked_employee_id = Some(EmployeeId::new());

        let directory = FakeDirectory {
            portal_users: vec![user],
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "rep@corp.example").await;
        assert_eq!(access.visibility, VisibilitySet::Empty);
    }

    #[tokio::test]
    async fn team_scope_includes_self_and_active_reports_only() {
        let manager_employee = employee("Sam", None, true);
        let manager_id = manager_employee.id;
        let mut user = portal_user("sam@corp.example");
        user.scope_override = Some(AccessScope::Team);
        user.linked_employee_id = Some(manager_id);

        let mut employees = HashMap::from([(manager_id, manager_employee)]);
        for record in [
            employee("Alex", Some(manager_id), true),
            employee("Rae", Some(manager_id), true),
            employee("Lee", Some(manager_id), false),
        ] {
            employees.insert(record.id, record);
        }

        let directory = FakeDirectory {
            portal_users: vec![user],
            employees,
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "sam@corp.example").await;
        assert_eq!(
            access.visibility,
            VisibilitySet::from_names(
                ["Sam", "Alex", "Rae"].map(str::to_owned)
            )
        );
    }

    #[tokio::test]
    async fn team_scope_without_reports_still_contains_own_name() {
        let manager_employee = employee("Morgan", None, true);
        let manager_id = manager_employee.id;
        let mut user = portal_user("morgan@corp.example");
        user.scope_override = Some(AccessScope::Team);
        user.linked_employee_id = Some(manager_id);

        let directory = FakeDirectory {
            portal_users: vec![user],
            employees: HashMap::from([(manager_id, manager_employee)]),
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "morgan@corp.example").await;
        assert!(access.visibility.allows("Morgan"));
    }

    #[tokio::test]
    async fn team_scope_without_hierarchy_anchor_is_own_name_only() {
        let mut user = portal_user("solo@corp.example");
        user.scope_override = Some(AccessScope::Team);
        user.linked_name = Some("Solo Seller".to_owned());

        let directory = FakeDirectory {
            portal_users: vec![user],
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "solo@corp.example").await;
        assert_eq!(
            access.visibility,
            VisibilitySet::from_names(["Solo Seller".to_owned()])
        );
    }

    #[tokio::test]
    async fn all_override_is_unrestricted_regardless_of_names() {
        let role_id = RoleId::new();
        let mut user = portal_user("lead@corp.example");
        user.scope_override = Some(AccessScope::All);
        user.role_id = Some(role_id);
        user.linked_employee_id = Some(EmployeeId::new());

        let directory = FakeDirectory {
            portal_users: vec![user],
            roles: HashMap::from([(
                role_id,
                RoleRecord {
                    id: role_id,
                    name: "Sales Rep".to_owned(),
                    modules: vec![Module::Deals],
                    scope: AccessScope::None,
                },
            )]),
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "lead@corp.example").await;
        assert_eq!(access.scope, AccessScope::All);
        assert!(access.visibility.is_unrestricted());
    }

    #[tokio::test]
    async fn role_scope_none_yields_empty_visibility() {
        let role_id = RoleId::new();
        let mut user = portal_user("viewer@corp.example");
        user.role_id = Some(role_id);
        user.linked_name = Some("Viewer".to_owned());

        let directory = FakeDirectory {
            portal_users: vec![user],
            roles: HashMap::from([(
                role_id,
                RoleRecord {
                    id: role_id,
                    name: "No Access".to_owned(),
                    modules: Vec::new(),
                    scope: AccessScope::None,
                },
            )]),
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "viewer@corp.example").await;
        assert_eq!(access.scope, AccessScope::None);
        assert_eq!(access.visibility, VisibilitySet::Empty);
    }

    #[tokio::test]
    async fn employee_name_wins_over_linked_name() {
        let linked = employee("Directory Name", None, true);
        let linked_id = linked.id;
        let mut user = portal_user("named@corp.example");
        user.scope_override = Some(AccessScope::Own);
        user.linked_employee_id = Some(linked_id);
        user.linked_name = Some("Stale Name".to_owned());

        let directory = FakeDirectory {
            portal_users: vec![user],
            employees: HashMap::from([(linked_id, linked)]),
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "named@corp.example").await;
        assert_eq!(
            access.visibility,
            VisibilitySet::from_names(["Directory Name".to_owned()])
        );
    }

    #[tokio::test]
    async fn unknown_identity_resolves_to_denied_not_error() {
        let directory = FakeDirectory::default();
        let access = resolve(&service(directory), "nobody@corp.example").await;
        assert_eq!(access, ResolvedAccess::denied());
    }

    #[tokio::test]
    async fn inactive_portal_user_resolves_to_denied() {
        let mut user = portal_user("gone@corp.example");
        user.scope_override = Some(AccessScope::All);
        user.is_active = false;

        let directory = FakeDirectory {
            portal_users: vec![user],
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "gone@corp.example").await;
        assert_eq!(access, ResolvedAccess::denied());
    }

    #[tokio::test]
    async fn dangling_role_reference_fails_closed() {
        let mut user = portal_user("orphan@corp.example");
        user.role_id = Some(RoleId::new());
        user.linked_name = Some("Orphan".to_owned());

        let directory = FakeDirectory {
            portal_users: vec![user],
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "orphan@corp.example").await;
        assert_eq!(access.scope, AccessScope::None);
        assert_eq!(access.visibility, VisibilitySet::Empty);
    }

    #[tokio::test]
    async fn transport_failure_propagates_instead_of_denying() {
        let directory = FakeDirectory {
            fail_portal_lookup: true,
            ..FakeDirectory::default()
        };

        let result = service(directory)
            .resolve(&identity("anyone@corp.example"))
            .await;
        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn duplicate_portal_users_surface_as_ambiguous() {
        let directory = FakeDirectory {
            portal_users: vec![
                portal_user("twice@corp.example"),
                portal_user("twice@corp.example"),
            ],
            ..FakeDirectory::default()
        };

        let result = service(directory)
            .resolve(&identity("twice@corp.example"))
            .await;
        assert!(matches!(result, Err(AppError::Ambiguous(_))));
    }

    #[tokio::test]
    async fn resolution_is_idempotent_for_unchanged_data() {
        let role_id = RoleId::new();
        let manager_employee = employee("Sam", None, true);
        let manager_id = manager_employee.id;
        let mut user = portal_user("sam@corp.example");
        user.role_id = Some(role_id);
        user.scope_override = Some(AccessScope::Team);
        user.linked_employee_id = Some(manager_id);

        let mut employees = HashMap::from([(manager_id, manager_employee)]);
        let report = employee("Alex", Some(manager_id), true);
        employees.insert(report.id, report);

        let directory = FakeDirectory {
            portal_users: vec![user],
            roles: HashMap::from([(
                role_id,
                RoleRecord {
                    id: role_id,
                    name: "Manager".to_owned(),
                    modules: vec![Module::Deals, Module::Reports],
                    scope: AccessScope::Team,
                },
            )]),
            employees,
            ..FakeDirectory::default()
        };

        let service = service(directory);
        let first = resolve(&service, "sam@corp.example").await;
        let second = resolve(&service, "sam@corp.example").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn module_override_gates_feature_access() {
        let role_id = RoleId::new();
        let mut user = portal_user("ops@corp.example");
        user.role_id = Some(role_id);
        user.module_overrides = Some(vec![Module::Reports]);
        user.linked_name = Some("Ops".to_owned());

        let directory = FakeDirectory {
            portal_users: vec![user],
            roles: HashMap::from([(
                role_id,
                RoleRecord {
                    id: role_id,
                    name: "Sales Rep".to_owned(),
                    modules: vec![Module::Deals],
                    scope: AccessScope::Own,
                },
            )]),
            ..FakeDirectory::default()
        };

        let access = resolve(&service(directory), "ops@corp.example").await;
        assert!(access.allows_module(Module::Reports));
        assert!(!access.allows_module(Module::Deals));
    }
}
