use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::capability::vocabulary::Capability;
use crate::plugin::manifest::PluginManifest;

/// Outcome of a capability check. This is the structured decision object
/// handed back to callers; they map it to their own error-response
/// convention. Denial is expected and recoverable, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityCheck {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_capabilities: Vec<String>,
}

impl CapabilityCheck {
    fn allowed() -> Self {
        Self { allowed: true, reason: None, missing_capabilities: Vec::new() }
    }

    fn denied(reason: String, missing: Vec<String>) -> Self {
        Self { allowed: false, reason: Some(reason), missing_capabilities: missing }
    }
}

/// Grant decision for one plugin manifest. Derived deterministically from
/// (tier, requested capabilities); recomputed whenever requested, never
/// partially cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantDecision {
    pub plugin_id: String,
    pub granted: BTreeSet<Capability>,
    pub denied: BTreeSet<String>,
    pub reasons: BTreeMap<String, String>,
}

impl GrantDecision {
    pub fn is_granted(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}

/// Manifest validation result - fails if any requested capability would be
/// denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check a single capability token against a granted set. Fail-closed: an
/// empty granted set denies everything, and a token outside the vocabulary
/// is always denied with the distinct unknown-capability reason even if a
/// matching string somehow ended up in the grant set.
pub fn check(plugin_id: &str, token: &str, granted: &BTreeSet<Capability>) -> CapabilityCheck {
    let capability = match Capability::parse(token) {
        Some(cap) => cap,
        None => {
            tracing::warn!("Capability check for plugin '{}' hit unknown token '{}'", plugin_id, token);
            return CapabilityCheck::denied(
                format!("unknown capability '{}'", token),
                vec![token.to_string()],
            );
        }
    };

    if granted.contains(&capability) {
        CapabilityCheck::allowed()
    } else {
        CapabilityCheck::denied(
            format!("plugin '{}' does not have capability '{}'", plugin_id, token),
            vec![token.to_string()],
        )
    }
}

/// Check every required capability, collecting the full missing list rather
/// than stopping at the first denial.
pub fn check_all(plugin_id: &str, required: &[&str], granted: &BTreeSet<Capability>) -> CapabilityCheck {
    let mut missing = Vec::new();

    for token in required {
        let result = check(plugin_id, token, granted);
        if !result.allowed {
            missing.extend(result.missing_capabilities);
        }
    }

    if missing.is_empty() {
        CapabilityCheck::allowed()
    } else {
        CapabilityCheck::denied(
            format!("plugin '{}' is missing {} required capabilities", plugin_id, missing.len()),
            missing,
        )
    }
}

/// Decide grants for a manifest. Pure function of (tier, requested
/// capabilities): each requested token is granted iff it is in the known
/// vocabulary and the plugin's declared tier allows it; everything else is
/// denied with a reason naming the defect.
pub fn decide_grants(manifest: &PluginManifest) -> GrantDecision {
    let mut granted = BTreeSet::new();
    let mut denied = BTreeSet::new();
    let mut reasons = BTreeMap::new();

    for request in &manifest.requested_capabilities {
        let token = request.capability.as_str();

        let capability = match Capability::parse(token) {
            Some(cap) => cap,
            None => {
                tracing::warn!(
                    "Plugin '{}' manifest requests unknown capability '{}'",
                    manifest.plugin_id, token
                );
                denied.insert(token.to_string());
                reasons.insert(token.to_string(), format!("unknown capability '{}'", token));
                continue;
            }
        };

        if manifest.tier.allows(capability) {
            granted.insert(capability);
            reasons.insert(token.to_string(), format!("granted to tier {}", manifest.tier));
        } else {
            denied.insert(token.to_string());
            reasons.insert(
                token.to_string(),
                format!("tier {} cannot request capability '{}'", manifest.tier, token),
            );
        }
    }

    tracing::debug!(
        "Grant decision for plugin '{}': {} granted, {} denied",
        manifest.plugin_id, granted.len(), denied.len()
    );

    GrantDecision { plugin_id: manifest.plugin_id.clone(), granted, denied, reasons }
}

/// Convenience wrapper: a manifest is valid only if every requested
/// capability would be granted.
pub fn validate_manifest_capabilities(manifest: &PluginManifest) -> ManifestValidation {
    let decision = decide_grants(manifest);

    let errors: Vec<String> = decision
        .denied
        .iter()
        .map(|token| {
            decision
                .reasons
                .get(token)
                .cloned()
                .unwrap_or_else(|| format!("capability '{}' denied", token))
        })
        .collect();

    ManifestValidation { valid: errors.is_empty(), errors }
}
