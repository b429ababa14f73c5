use serde::{Deserialize, Serialize};

/// Capability tokens a plugin may request, fixed v1 vocabulary.
/// Unknown tokens never parse; they are handled at the manifest boundary
/// as raw strings so typos cannot alias a real grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    // UI tokens - available to every tier
    #[serde(rename = "ui:filter:nav")]
    UiFilterNav,
    #[serde(rename = "ui:menu:items")]
    UiMenuItems,
    #[serde(rename = "ui:widgets:dashboard")]
    UiWidgetsDashboard,
    #[serde(rename = "ui:badge:counts")]
    UiBadgeCounts,

    // App tokens - imply route/database/authorization access, Tier B only
    #[serde(rename = "app:routes")]
    AppRoutes,
    #[serde(rename = "app:db:read")]
    AppDbRead,
    #[serde(rename = "app:db:write")]
    AppDbWrite,
    #[serde(rename = "app:authz:namespace")]
    AppAuthzNamespace,
    #[serde(rename = "app:jobs:schedule")]
    AppJobsSchedule,

    // Design-ownership tokens - reserved for the single design-owner plugin
    #[serde(rename = "design:nav:baseline")]
    DesignNavBaseline,
    #[serde(rename = "design:nav:reserved")]
    DesignNavReserved,
}

/// Every capability in the vocabulary, in declaration order
pub const ALL_CAPABILITIES: &[Capability] = &[
    Capability::UiFilterNav,
    Capability::UiMenuItems,
    Capability::UiWidgetsDashboard,
    Capability::UiBadgeCounts,
    Capability::AppRoutes,
    Capability::AppDbRead,
    Capability::AppDbWrite,
    Capability::AppAuthzNamespace,
    Capability::AppJobsSchedule,
    Capability::DesignNavBaseline,
    Capability::DesignNavReserved,
];

impl Capability {
    /// Wire token for this capability
    pub fn token(&self) -> &'static str {
        match self {
            Capability::UiFilterNav => "ui:filter:nav",
            Capability::UiMenuItems => "ui:menu:items",
            Capability::UiWidgetsDashboard => "ui:widgets:dashboard",
            Capability::UiBadgeCounts => "ui:badge:counts",
            Capability::AppRoutes => "app:routes",
            Capability::AppDbRead => "app:db:read",
            Capability::AppDbWrite => "app:db:write",
            Capability::AppAuthzNamespace => "app:authz:namespace",
            Capability::AppJobsSchedule => "app:jobs:schedule",
            Capability::DesignNavBaseline => "design:nav:baseline",
            Capability::DesignNavReserved => "design:nav:reserved",
        }
    }

    /// Parse a raw token against the vocabulary. Returns None for anything
    /// outside it - callers treat that as an unknown-capability denial.
    pub fn parse(token: &str) -> Option<Self> {
        ALL_CAPABILITIES.iter().copied().find(|c| c.token() == token)
    }

    /// UI-only tokens carry no route/database/authorization reach
    pub fn is_ui(&self) -> bool {
        matches!(
            self,
            Capability::UiFilterNav
                | Capability::UiMenuItems
                | Capability::UiWidgetsDashboard
                | Capability::UiBadgeCounts
        )
    }

    /// Design-ownership tokens only the design-owner tier may hold
    pub fn is_design(&self) -> bool {
        matches!(self, Capability::DesignNavBaseline | Capability::DesignNavReserved)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Plugin trust tiers. A tier bounds which capabilities a plugin may ever be
/// granted; the tier is declared in the manifest and never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginTier {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "design-owner")]
    DesignOwner,
}

impl PluginTier {
    /// Tier membership table. Tier B's allow-list is a strict superset of
    /// Tier A's; the design-owner gets Tier A's UI tokens plus the
    /// design-ownership tokens and nothing else.
    pub fn allows(&self, capability: Capability) -> bool {
        match self {
            PluginTier::A => capability.is_ui(),
            PluginTier::B => capability.is_ui() || !capability.is_design(),
            PluginTier::DesignOwner => capability.is_ui() || capability.is_design(),
        }
    }

    /// All capabilities this tier may be granted
    pub fn allow_list(&self) -> Vec<Capability> {
        ALL_CAPABILITIES.iter().copied().filter(|c| self.allows(*c)).collect()
    }
}

impl std::fmt::Display for PluginTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginTier::A => write!(f, "A"),
            PluginTier::B => write!(f, "B"),
            PluginTier::DesignOwner => write!(f, "design-owner"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_round_trips_through_parse() {
        for cap in ALL_CAPABILITIES {
            assert_eq!(Capability::parse(cap.token()), Some(*cap));
        }
    }

    #[test]
    fn unknown_tokens_do_not_parse() {
        assert_eq!(Capability::parse("ui:filter:navv"), None);
        assert_eq!(Capability::parse(""), None);
        assert_eq!(Capability::parse("app:db:drop"), None);
    }

    #[test]
    fn tier_b_allow_list_is_strict_superset_of_tier_a() {
        let a = PluginTier::A.allow_list();
        let b = PluginTier::B.allow_list();
        for cap in &a {
            assert!(b.contains(cap), "tier B missing tier A capability {}", cap);
        }
        assert!(b.len() > a.len());
    }

    #[test]
    fn design_tokens_are_exclusive_to_design_owner() {
        for cap in [Capability::DesignNavBaseline, Capability::DesignNavReserved] {
            assert!(!PluginTier::A.allows(cap));
            assert!(!PluginTier::B.allows(cap));
            assert!(PluginTier::DesignOwner.allows(cap));
        }
    }

    #[test]
    fn design_owner_cannot_request_app_tokens() {
        assert!(!PluginTier::DesignOwner.allows(Capability::AppRoutes));
        assert!(!PluginTier::DesignOwner.allows(Capability::AppDbWrite));
    }
}
