//! PostgreSQL-backed role directory.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use dealdesk_application::RoleDirectory;
use dealdesk_core::{AppError, AppResult};
use dealdesk_domain::{AccessScope, Module, RoleId, RoleRecord};

/// PostgreSQL implementation of the role directory port.
#[derive(Clone)]
pub struct PostgresRoleDirectory {
    pool: PgPool,
}

impl PostgresRoleDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    modules: Vec<String>,
    scope: String,
}

impl TryFrom<RoleRow> for RoleRecord {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let scope = AccessScope::from_str(row.scope.as_str()).map_err(|error| {
            AppError::Transport(format!("malformed scope in role row '{}': {error}", row.id))
        })?;

        let modules = row
            .modules
            .iter()
            .map(|value| Module::from_str(value))
            .collect::<Result<Vec<Module>, AppError>>()
            .map_err(|error| {
                AppError::Transport(format!("malformed module in role row '{}': {error}", row.id))
            })?;

        Ok(Self {
            id: RoleId::from_uuid(row.id),
            name: row.name,
            modules,
            scope,
        })
    }
}

#[async_trait]
impl RoleDirectory for PostgresRoleDirectory {
    async fn find_by_id(&self, role_id: RoleId) -> AppResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, modules, scope
            FROM roles
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Transport(format!("failed to find role by id: {error}")))?;

        row.map(RoleRecord::try_from).transpose()
    }
}
