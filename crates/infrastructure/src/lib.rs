//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_directory;
mod postgres_employee_directory;
mod postgres_portal_user_directory;
mod postgres_role_directory;

pub use in_memory_directory::InMemoryDirectory;
pub use postgres_employee_directory::PostgresEmployeeDirectory;
pub use postgres_portal_user_directory::PostgresPortalUserDirectory;
pub use postgres_role_directory::PostgresRoleDirectory;
