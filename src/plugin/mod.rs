// Plugin system: manifests, the Plugin trait, and the capability-gated
// registration facade plugins go through during boot

pub mod core;
pub mod manifest;

pub use manifest::*;

use std::sync::Arc;
use thiserror::Error;

use crate::capability::{Capability, CapabilityError, GrantDecision};
use crate::config;
use crate::hooks::registry::HookRegistry;
use crate::hooks::traits::{NavAction, NavFilter};
use crate::hooks::RegistryError;
use crate::nav::model::{NavArea, NavModel, NAV_COMPOSED_HOOK};

/// Registration-phase errors. Raised while a plugin wires itself into the
/// registry; always boot-fatal because they represent a packaging defect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// An installed extension module. Implementations are discovered by the
/// host application and handed to `boot()`; everything they may do at
/// runtime flows from the grant decision on their manifest.
pub trait Plugin: Send + Sync {
    /// The plugin's declared manifest. Loaded once at boot, never mutated.
    fn manifest(&self) -> PluginManifest;

    /// Baseline navigation model. Only the design-owner plugin provides
    /// one; everyone else composes through filters.
    fn baseline(&self) -> Option<NavModel> {
        None
    }

    /// Registration phase: wire hooks through the capability-gated
    /// registrar. Default registers nothing.
    fn register(&self, registrar: &mut PluginRegistrar<'_>) -> Result<(), RegistrationError> {
        let _ = registrar;
        Ok(())
    }
}

/// Capability-gated facade over the hook registry, scoped to one plugin's
/// grant decision. Fail-closed: a hook registration without the covering
/// grant is refused, so hooks can only ever execute if their owning
/// plugin's grant covers them.
pub struct PluginRegistrar<'a> {
    registry: &'a mut HookRegistry,
    plugin_id: String,
    decision: &'a GrantDecision,
}

impl<'a> PluginRegistrar<'a> {
    pub fn new(registry: &'a mut HookRegistry, decision: &'a GrantDecision) -> Self {
        Self { registry, plugin_id: decision.plugin_id.clone(), decision }
    }

    /// Register a navigation filter for one area. Requires `ui:filter:nav`.
    pub fn register_nav_filter(
        &mut self,
        area: NavArea,
        priority: Option<u8>,
        filter: Arc<dyn NavFilter>,
    ) -> Result<(), RegistrationError> {
        self.require(Capability::UiFilterNav)?;
        let priority = priority.unwrap_or(config::config().registry.default_priority);
        self.registry
            .register_filter(area.hook_name(), &self.plugin_id, Some(priority), filter)?;
        Ok(())
    }

    /// Register an action fired with the composed model after per-request
    /// builds. Requires `ui:filter:nav`.
    pub fn register_nav_action(
        &mut self,
        priority: Option<u8>,
        action: Arc<dyn NavAction>,
    ) -> Result<(), RegistrationError> {
        self.require(Capability::UiFilterNav)?;
        let priority = priority.unwrap_or(config::config().registry.default_priority);
        self.registry
            .register_action(NAV_COMPOSED_HOOK, &self.plugin_id, Some(priority), action)?;
        Ok(())
    }

    /// Claim an additional authorization namespace beyond the plugin's own
    /// id. Requires `app:authz:namespace`.
    pub fn claim_namespace(&mut self, namespace: &str) -> Result<(), RegistrationError> {
        self.require(Capability::AppAuthzNamespace)?;
        self.registry.claim_namespace(namespace, &self.plugin_id)?;
        Ok(())
    }

    fn require(&self, capability: Capability) -> Result<(), RegistrationError> {
        if self.decision.is_granted(capability) {
            Ok(())
        } else {
            tracing::warn!(
                "Plugin '{}' attempted registration without capability '{}'",
                self.plugin_id, capability
            );
            Err(CapabilityError::Denied {
                plugin_id: self.plugin_id.clone(),
                capability: capability.token().to_string(),
            }
            .into())
        }
    }
}

/// Plugins compiled into this build of the platform
pub fn builtin_plugins() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(core::CorePlugin)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{decide_grants, PluginTier};
    use crate::testing::manifest_for;

    #[test]
    fn registrar_gates_namespace_claims_on_the_authz_capability() {
        let mut registry = HookRegistry::new();

        let granted = decide_grants(&manifest_for("crm", PluginTier::B, &["app:authz:namespace"]));
        let mut registrar = PluginRegistrar::new(&mut registry, &granted);
        registrar.claim_namespace("exports").unwrap();

        let denied = decide_grants(&manifest_for("notes", PluginTier::A, &[]));
        let mut registrar = PluginRegistrar::new(&mut registry, &denied);
        let err = registrar.claim_namespace("anything").unwrap_err();
        assert!(matches!(err, RegistrationError::Capability(_)));
    }

    #[test]
    fn registrar_surfaces_namespace_conflicts_from_the_registry() {
        let mut registry = HookRegistry::new();

        let crm = decide_grants(&manifest_for("crm", PluginTier::B, &["app:authz:namespace"]));
        PluginRegistrar::new(&mut registry, &crm).claim_namespace("exports").unwrap();

        let notes = decide_grants(&manifest_for("notes", PluginTier::B, &["app:authz:namespace"]));
        let err = PluginRegistrar::new(&mut registry, &notes)
            .claim_namespace("exports")
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Registry(RegistryError::NamespaceConflict { .. })));
    }
}
