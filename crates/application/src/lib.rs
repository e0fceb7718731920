//! Application services and ports.

#![forbid(unsafe_code)]

mod directory_ports;
mod scope_service;
mod scope_session;

pub use directory_ports::{EmployeeDirectory, PortalUserDirectory, RoleDirectory};
pub use scope_service::{ResolvedAccess, ScopeService};
pub use scope_session::{ResolutionState, ScopeSession};
