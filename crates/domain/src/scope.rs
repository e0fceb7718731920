use std::collections::BTreeSet;
use std::str::FromStr;

use dealdesk_core::AppError;
use serde::{Deserialize, Serialize};

/// Authorization breadth resolved for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// No record restriction.
    All,
    /// Records owned by the user only.
    Own,
    /// Records owned by the user and their direct active reports.
    Team,
    /// No records at all.
    None,
}

impl AccessScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Own => "own",
            Self::Team => "team",
            Self::None => "none",
        }
    }

    /// Returns all known scopes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessScope] = &[
            AccessScope::All,
            AccessScope::Own,
            AccessScope::Team,
            AccessScope::None,
        ];

        ALL
    }

    /// Resolves the effective scope from the ordered precedence table:
    /// portal-user override first, then the role default, then fail-closed
    /// `none` when neither is set.
    #[must_use]
    pub fn effective(scope_override: Option<Self>, role_scope: Option<Self>) -> Self {
        scope_override.or(role_scope).unwrap_or(Self::None)
    }
}

impl FromStr for AccessScope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "own" => Ok(Self::Own),
            "team" => Ok(Self::Team),
            "none" => Ok(Self::None),
            _ => Err(AppError::Validation(format!(
                "unknown access scope value '{value}'"
            ))),
        }
    }
}

/// Materialized record filter derived from an effective scope.
///
/// Consumers restrict owner-name predicates with this value: skip the
/// predicate when unrestricted, return nothing when empty, otherwise filter
/// to the listed names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilitySet {
    /// No name filter applies.
    Unrestricted,
    /// No records are visible.
    Empty,
    /// Only records owned by one of these names are visible.
    Names(BTreeSet<String>),
}

impl VisibilitySet {
    /// Builds a visibility set from owner names, collapsing an empty
    /// collection to the empty sentinel.
    #[must_use]
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let names: BTreeSet<String> = names.into_iter().collect();
        if names.is_empty() {
            Self::Empty
        } else {
            Self::Names(names)
        }
    }

    /// Returns whether a record owned by `owner_name` is visible.
    #[must_use]
    pub fn allows(&self, owner_name: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Empty => false,
            Self::Names(names) => names.contains(owner_name),
        }
    }

    /// Returns whether no name filter applies.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Returns whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{AccessScope, VisibilitySet};

    #[test]
    fn scope_roundtrips_storage_value() {
        for scope in AccessScope::all() {
            let restored = AccessScope::from_str(scope.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(AccessScope::None), *scope);
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        assert!(AccessScope::from_str("everything").is_err());
    }

    #[test]
    fn empty_name_collection_collapses_to_empty_sentinel() {
        let set = VisibilitySet::from_names(Vec::new());
        assert!(set.is_empty());
        assert!(!set.allows("Jane Doe"));
    }

    #[test]
    fn named_set_allows_only_listed_owners() {
        let set = VisibilitySet::from_names(["Jane Doe".to_owned()]);
        assert!(set.allows("Jane Doe"));
        assert!(!set.allows("Sam"));
    }

    #[test]
    fn unrestricted_set_allows_any_owner() {
        assert!(VisibilitySet::Unrestricted.allows("anyone at all"));
    }

    fn scope_strategy() -> impl Strategy<Value = AccessScope> {
        proptest::sample::select(AccessScope::all().to_vec())
    }

    proptest! {
        #[test]
        fn effective_scope_prefers_override_then_role_then_none(
            scope_override in proptest::option::of(scope_strategy()),
            role_scope in proptest::option::of(scope_strategy()),
        ) {
            let effective = AccessScope::effective(scope_override, role_scope);
            match (scope_override, role_scope) {
                (Some(value), _) => prop_assert_eq!(effective, value),
                (None, Some(value)) => prop_assert_eq!(effective, value),
                (None, None) => prop_assert_eq!(effective, AccessScope::None),
            }
        }

        #[test]
        fn only_known_scope_strings_parse(value in "[a-z]{1,8}") {
            let known = AccessScope::all().iter().any(|scope| scope.as_str() == value);
            prop_assert_eq!(AccessScope::from_str(&value).is_ok(), known);
        }
    }
}
