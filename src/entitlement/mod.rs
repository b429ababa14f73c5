// Entitlement contexts: the per-request facts navigation is filtered by,
// and the boot-time coverage generator that manufactures synthetic ones

pub mod coverage;

pub use coverage::*;

use std::collections::BTreeSet;
use uuid::Uuid;

/// The set of facts used to filter navigation by permission. Assembled by
/// the auth/tenant layer for real requests, or synthesized by the boot
/// validator. Ephemeral - one per navigation build, discarded after use.
#[derive(Debug, Clone)]
pub struct EntitlementContext {
    pub user_id: Uuid,
    pub role: String,
    pub entitlements: BTreeSet<String>,
    pub tenant_id: String,
    pub tier_level: u8,
    pub has_multiple_tenants: bool,
}

impl EntitlementContext {
    pub fn new(
        user_id: Uuid,
        role: impl Into<String>,
        entitlements: BTreeSet<String>,
        tenant_id: impl Into<String>,
        tier_level: u8,
        has_multiple_tenants: bool,
    ) -> Self {
        Self {
            user_id,
            role: role.into(),
            entitlements,
            tenant_id: tenant_id.into(),
            tier_level,
            has_multiple_tenants,
        }
    }

    /// Synthetic context for boot verification. Only the entitlement set
    /// matters there - permission filtering is skipped during verification,
    /// so the remaining fields carry harmless placeholder values.
    pub fn synthetic(entitlements: BTreeSet<String>) -> Self {
        Self {
            user_id: Uuid::nil(),
            role: "verifier".to_string(),
            entitlements,
            tenant_id: "boot-verification".to_string(),
            tier_level: 0,
            has_multiple_tenants: false,
        }
    }

    pub fn has_entitlement(&self, token: &str) -> bool {
        self.entitlements.contains(token)
    }
}
