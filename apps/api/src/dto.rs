//! Response payloads for the scope API.

use dealdesk_application::ResolvedAccess;
use dealdesk_domain::{AccessScope, Module, VisibilitySet};
use serde::Serialize;

/// Resolved authorization returned to dashboard consumers.
#[derive(Debug, Serialize)]
pub struct ScopeResponse {
    /// Effective record scope.
    pub scope: AccessScope,
    /// Effective module list.
    pub modules: Vec<Module>,
    /// Owner-name visibility filter.
    pub visibility: VisibilityDto,
}

/// Wire shape of the visibility filter.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibilityDto {
    /// No name filter applies.
    Unrestricted,
    /// No records are visible.
    Empty,
    /// Only the listed owner names are visible.
    Names {
        /// Permitted owner names, sorted.
        names: Vec<String>,
    },
}

impl From<VisibilitySet> for VisibilityDto {
    fn from(value: VisibilitySet) -> Self {
        match value {
            VisibilitySet::Unrestricted => Self::Unrestricted,
            VisibilitySet::Empty => Self::Empty,
            VisibilitySet::Names(names) => Self::Names {
                names: names.into_iter().collect(),
            },
        }
    }
}

impl From<ResolvedAccess> for ScopeResponse {
    fn from(value: ResolvedAccess) -> Self {
        Self {
            scope: value.scope,
            modules: value.modules,
            visibility: VisibilityDto::from(value.visibility),
        }
    }
}
