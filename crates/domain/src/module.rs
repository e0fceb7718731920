use std::str::FromStr;

use dealdesk_core::AppError;
use serde::{Deserialize, Serialize};

/// Functional dashboard modules gated by the resolved authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Deal listing, filtering, and entry.
    Deals,
    /// Department and position chart maintenance.
    OrgChart,
    /// Aggregated sales reports and KPIs.
    Reports,
    /// Portal-user administration.
    Admin,
}

impl Module {
    /// Returns a stable storage value for this module.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deals => "deals",
            Self::OrgChart => "org_chart",
            Self::Reports => "reports",
            Self::Admin => "admin",
        }
    }

    /// Returns all known modules.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Module] = &[
            Module::Deals,
            Module::OrgChart,
            Module::Reports,
            Module::Admin,
        ];

        ALL
    }

    /// Resolves the effective module list from the ordered precedence table:
    /// portal-user override first, then the role default, then no modules.
    #[must_use]
    pub fn effective(
        module_overrides: Option<Vec<Self>>,
        role_modules: Option<Vec<Self>>,
    ) -> Vec<Self> {
        module_overrides.or(role_modules).unwrap_or_default()
    }
}

impl FromStr for Module {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "deals" => Ok(Self::Deals),
            "org_chart" => Ok(Self::OrgChart),
            "reports" => Ok(Self::Reports),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!(
                "unknown module value '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Module;

    #[test]
    fn module_roundtrips_storage_value() {
        for module in Module::all() {
            let restored = Module::from_str(module.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Module::Deals), *module);
        }
    }

    #[test]
    fn unknown_module_is_rejected() {
        assert!(Module::from_str("invoices").is_err());
    }

    #[test]
    fn effective_modules_prefer_override() {
        let effective = Module::effective(
            Some(vec![Module::Deals]),
            Some(vec![Module::Deals, Module::Reports]),
        );
        assert_eq!(effective, vec![Module::Deals]);
    }

    #[test]
    fn effective_modules_default_to_empty() {
        assert!(Module::effective(None, None).is_empty());
    }
}
