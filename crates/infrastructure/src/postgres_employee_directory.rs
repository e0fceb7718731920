//! PostgreSQL-backed employee directory.

use async_trait::async_trait;
use sqlx::PgPool;

use dealdesk_application::EmployeeDirectory;
use dealdesk_core::{AppError, AppResult};
use dealdesk_domain::{EmployeeId, EmployeeRecord};

/// PostgreSQL implementation of the employee directory port.
#[derive(Clone)]
pub struct PostgresEmployeeDirectory {
    pool: PgPool,
}

impl PostgresEmployeeDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: uuid::Uuid,
    full_name: String,
    manager_id: Option<uuid::Uuid>,
    is_active: bool,
}

impl From<EmployeeRow> for EmployeeRecord {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::from_uuid(row.id),
            full_name: row.full_name,
            manager_id: row.manager_id.map(EmployeeId::from_uuid),
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl EmployeeDirectory for PostgresEmployeeDirectory {
    async fn find_by_id(&self, employee_id: EmployeeId) -> AppResult<Option<EmployeeRecord>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, full_name, manager_id, is_active
            FROM employees
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(employee_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Transport(format!("failed to find employee by id: {error}")))?;

        Ok(row.map(EmployeeRecord::from))
    }

    async fn list_active_reports(&self, manager_id: EmployeeId) -> AppResult<Vec<EmployeeRecord>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, full_name, manager_id, is_active
            FROM employees
            WHERE manager_id = $1 AND is_active
            ORDER BY full_name
            "#,
        )
        .bind(manager_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Transport(format!("failed to list reports for manager: {error}"))
        })?;

        Ok(rows.into_iter().map(EmployeeRecord::from).collect())
    }
}
