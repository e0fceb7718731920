//! PostgreSQL-backed portal-user directory.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use dealdesk_application::PortalUserDirectory;
use dealdesk_core::{AppError, AppResult, Identity};
use dealdesk_domain::{AccessScope, EmployeeId, Module, PortalUserId, PortalUserRecord, RoleId};

/// PostgreSQL implementation of the portal-user directory port.
#[derive(Clone)]
pub struct PostgresPortalUserDirectory {
    pool: PgPool,
}

impl PostgresPortalUserDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PortalUserRow {
    id: uuid::Uuid,
    identity: String,
    display_name: String,
    role_id: Option<uuid::Uuid>,
    linked_name: Option<String>,
    linked_employee_id: Option<uuid::Uuid>,
    module_overrides: Option<Vec<String>>,
    scope_override: Option<String>,
    is_active: bool,
}

impl TryFrom<PortalUserRow> for PortalUserRecord {
    type Error = AppError;

    fn try_from(row: PortalUserRow) -> Result<Self, Self::Error> {
        let identity = Identity::new(row.identity.as_str()).map_err(|error| {
            AppError::Transport(format!(
                "malformed identity in portal-user row '{}': {error}",
                row.id
            ))
        })?;

        let scope_override = row
            .scope_override
            .as_deref()
            .map(AccessScope::from_str)
            .transpose()
            .map_err(|error| {
                AppError::Transport(format!(
                    "malformed scope override in portal-user row '{}': {error}",
                    row.id
                ))
            })?;

        let module_overrides = row
            .module_overrides
            .map(|values| {
                values
                    .iter()
                    .map(|value| Module::from_str(value))
                    .collect::<Result<Vec<Module>, AppError>>()
            })
            .transpose()
            .map_err(|error| {
                AppError::Transport(format!(
                    "malformed module override in portal-user row '{}': {error}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: PortalUserId::from_uuid(row.id),
            identity,
            display_name: row.display_name,
            role_id: row.role_id.map(RoleId::from_uuid),
            linked_name: row.linked_name,
            linked_employee_id: row.linked_employee_id.map(EmployeeId::from_uuid),
            module_overrides,
            scope_override,
            is_active: row.is_active,
        })
    }
}

#[async_trait]
impl PortalUserDirectory for PostgresPortalUserDirectory {
    async fn find_by_identity(&self, identity: &Identity) -> AppResult<Option<PortalUserRecord>> {
        // LIMIT 2 is enough to detect a uniqueness violation without
        // scanning every duplicate.
        let rows = sqlx::query_as::<_, PortalUserRow>(
            r#"
            SELECT id, identity, display_name, role_id, linked_name,
                   linked_employee_id, module_overrides, scope_override, is_active
            FROM portal_users
            WHERE LOWER(identity) = $1
            LIMIT 2
            "#,
        )
        .bind(identity.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Transport(format!("failed to find portal user by identity: {error}"))
        })?;

        if rows.len() > 1 {
            warn!(%identity, "portal-user identity matched multiple rows");
            return Err(AppError::Ambiguous(format!(
                "multiple portal users match identity '{identity}'"
            )));
        }

        rows.into_iter()
            .next()
            .map(PortalUserRecord::try_from)
            .transpose()
    }
}
