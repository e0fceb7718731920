//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod directory;
mod module;
mod scope;

pub use directory::{
    EmployeeId, EmployeeRecord, PortalUserId, PortalUserRecord, RoleId, RoleRecord,
};
pub use module::Module;
pub use scope::{AccessScope, VisibilitySet};
