//! Demo directory seed for the in-memory provider.

use dealdesk_core::{AppResult, Identity};
use dealdesk_domain::{
    AccessScope, EmployeeId, EmployeeRecord, Module, PortalUserId, PortalUserRecord, RoleId,
    RoleRecord,
};
use dealdesk_infrastructure::InMemoryDirectory;
use tracing::info;

/// Seeds a small sales team so the API answers scope queries without a
/// database: an unrestricted sales lead, a team-scoped manager with two
/// active reports and one inactive one, and an own-scoped rep.
pub async fn seed_demo_directory(directory: &InMemoryDirectory) -> AppResult<()> {
    let rep_role = RoleRecord {
        id: RoleId::new(),
        name: "Sales Rep".to_owned(),
        modules: vec![Module::Deals],
        scope: AccessScope::Own,
    };
    let manager_role = RoleRecord {
        id: RoleId::new(),
        name: "Sales Manager".to_owned(),
        modules: vec![Module::Deals, Module::Reports],
        scope: AccessScope::Team,
    };
    let lead_role = RoleRecord {
        id: RoleId::new(),
        name: "Sales Lead".to_owned(),
        modules: vec![Module::Deals, Module::OrgChart, Module::Reports, Module::Admin],
        scope: AccessScope::All,
    };

    let manager = EmployeeRecord {
        id: EmployeeId::new(),
        full_name: "Morgan Hale".to_owned(),
        manager_id: None,
        is_active: true,
    };
    let reports = [
        ("Alex Kim", true),
        ("Rae Salas", true),
        ("Lee Byrne", false),
    ]
    .map(|(full_name, is_active)| EmployeeRecord {
        id: EmployeeId::new(),
        full_name: full_name.to_owned(),
        manager_id: Some(manager.id),
        is_active,
    });
    let rep = EmployeeRecord {
        id: EmployeeId::new(),
        full_name: "Jordan Fox".to_owned(),
        manager_id: Some(manager.id),
        is_active: true,
    };

    let portal_users = [
        portal_user("lead@dealdesk.example", "Dana Reyes", lead_role.id, None, None),
        portal_user(
            "manager@dealdesk.example",
            "Morgan Hale",
            manager_role.id,
            Some(manager.id),
            None,
        ),
        portal_user(
            "rep@dealdesk.example",
            "Jordan Fox",
            rep_role.id,
            Some(rep.id),
            Some("Jordan Fox".to_owned()),
        ),
    ];

    for role in [rep_role, manager_role, lead_role] {
        directory.insert_role(role).await;
    }
    for employee in reports.into_iter().chain([manager, rep]) {
        directory.insert_employee(employee).await;
    }
    for record in portal_users {
        directory.insert_portal_user(record?).await;
    }

    info!("seeded demo directory records");
    Ok(())
}

fn portal_user(
    identity: &str,
    display_name: &str,
    role_id: RoleId,
    linked_employee_id: Option<EmployeeId>,
    linked_name: Option<String>,
) -> AppResult<PortalUserRecord> {
    Ok(PortalUserRecord {
        id: PortalUserId::new(),
        identity: Identity::new(identity)?,
        display_name: display_name.to_owned(),
        role_id: Some(role_id),
        linked_name,
        linked_employee_id,
        module_overrides: None,
        scope_override: None,
        is_active: true,
    })
}
