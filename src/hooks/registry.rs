use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::hooks::error::RegistryError;
use crate::hooks::traits::{NavAction, NavFilter};

/// Default handler priority - mid-range so plugins can slot in before or
/// after without renumbering each other
pub const DEFAULT_PRIORITY: u8 = 50;

/// A registered callback with its ordering metadata. `registration_order`
/// is a monotonic counter assigned at registration time and is the stable
/// tie-break when priorities are equal.
pub struct HookHandler<T: ?Sized> {
    pub plugin_id: String,
    pub priority: u8,
    pub registration_order: u64,
    pub callback: Arc<T>,
}

impl<T: ?Sized> fmt::Debug for HookHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookHandler")
            .field("plugin_id", &self.plugin_id)
            .field("priority", &self.priority)
            .field("registration_order", &self.registration_order)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> Clone for HookHandler<T> {
    fn clone(&self) -> Self {
        Self {
            plugin_id: self.plugin_id.clone(),
            priority: self.priority,
            registration_order: self.registration_order,
            callback: Arc::clone(&self.callback),
        }
    }
}

pub type FilterHandler = HookHandler<dyn NavFilter>;
pub type ActionHandler = HookHandler<dyn NavAction>;

/// Ordered multi-map from hook name to registered callbacks, plus the
/// authorization-namespace claim table. Accumulates entries only during the
/// plugin-registration phase of boot; `freeze()` makes it read-only for the
/// rest of the process lifetime, enforced by the registration API rather
/// than by convention.
#[derive(Debug)]
pub struct HookRegistry {
    filters: HashMap<String, Vec<FilterHandler>>,
    actions: HashMap<String, Vec<ActionHandler>>,
    namespaces: HashMap<String, String>,
    next_order: u64,
    frozen: bool,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
            actions: HashMap::new(),
            namespaces: HashMap::new(),
            next_order: 0,
            frozen: false,
        }
    }

    /// Register a filter hook. Refused once the registry is frozen.
    pub fn register_filter(
        &mut self,
        hook: &str,
        plugin_id: &str,
        priority: Option<u8>,
        callback: Arc<dyn NavFilter>,
    ) -> Result<(), RegistryError> {
        self.ensure_writable(plugin_id, hook)?;

        let handler = FilterHandler {
            plugin_id: plugin_id.to_string(),
            priority: priority.unwrap_or(DEFAULT_PRIORITY),
            registration_order: self.take_order(),
            callback,
        };

        tracing::debug!(
            "Registered filter '{}' from plugin '{}' on hook '{}' (priority {})",
            handler.callback.name(), plugin_id, hook, handler.priority
        );

        self.filters.entry(hook.to_string()).or_default().push(handler);
        Ok(())
    }

    /// Register an action hook. Refused once the registry is frozen.
    pub fn register_action(
        &mut self,
        hook: &str,
        plugin_id: &str,
        priority: Option<u8>,
        callback: Arc<dyn NavAction>,
    ) -> Result<(), RegistryError> {
        self.ensure_writable(plugin_id, hook)?;

        let handler = ActionHandler {
            plugin_id: plugin_id.to_string(),
            priority: priority.unwrap_or(DEFAULT_PRIORITY),
            registration_order: self.take_order(),
            callback,
        };

        tracing::debug!(
            "Registered action '{}' from plugin '{}' on hook '{}' (priority {})",
            handler.callback.name(), plugin_id, hook, handler.priority
        );

        self.actions.entry(hook.to_string()).or_default().push(handler);
        Ok(())
    }

    /// Claim an authorization namespace for a plugin. Exactly one owner per
    /// namespace; a second claim is a packaging defect and aborts boot.
    pub fn claim_namespace(&mut self, namespace: &str, plugin_id: &str) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::Frozen {
                plugin_id: plugin_id.to_string(),
                hook: format!("namespace:{}", namespace),
            });
        }

        if let Some(claimed_by) = self.namespaces.get(namespace) {
            if claimed_by != plugin_id {
                return Err(RegistryError::NamespaceConflict {
                    namespace: namespace.to_string(),
                    claimed_by: claimed_by.clone(),
                    plugin_id: plugin_id.to_string(),
                });
            }
            return Ok(());
        }

        tracing::debug!("Plugin '{}' claimed namespace '{}'", plugin_id, namespace);
        self.namespaces.insert(namespace.to_string(), plugin_id.to_string());
        Ok(())
    }

    /// Namespaces owned by a plugin
    pub fn namespaces_of(&self, plugin_id: &str) -> Vec<&str> {
        let mut owned: Vec<&str> = self
            .namespaces
            .iter()
            .filter(|(_, owner)| owner.as_str() == plugin_id)
            .map(|(ns, _)| ns.as_str())
            .collect();
        owned.sort_unstable();
        owned
    }

    pub fn namespace_owner(&self, namespace: &str) -> Option<&str> {
        self.namespaces.get(namespace).map(|s| s.as_str())
    }

    /// Filters for a hook, sorted by (priority ascending, registration
    /// order ascending). The ordering is recomputed fresh on every read so
    /// priority always dominates insertion order.
    pub fn filters_for(&self, hook: &str) -> Vec<FilterHandler> {
        let mut handlers: Vec<FilterHandler> =
            self.filters.get(hook).map(|h| h.to_vec()).unwrap_or_default();
        handlers.sort_by_key(|h| (h.priority, h.registration_order));
        handlers
    }

    /// Actions for a hook, in the same total order as filters
    pub fn actions_for(&self, hook: &str) -> Vec<ActionHandler> {
        let mut handlers: Vec<ActionHandler> =
            self.actions.get(hook).map(|h| h.to_vec()).unwrap_or_default();
        handlers.sort_by_key(|h| (h.priority, h.registration_order));
        handlers
    }

    /// Freeze the registry at the end of boot's registration phase. Nothing
    /// at request time may register.
    pub fn freeze(&mut self) {
        self.frozen = true;
        tracing::info!(
            "Hook registry frozen: {} filter hooks, {} action hooks, {} namespaces",
            self.filters.len(), self.actions.len(), self.namespaces.len()
        );
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Reset to a pristine registry for test isolation
    pub fn clear(&mut self) {
        self.filters.clear();
        self.actions.clear();
        self.namespaces.clear();
        self.next_order = 0;
        self.frozen = false;
    }

    fn ensure_writable(&self, plugin_id: &str, hook: &str) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::Frozen {
                plugin_id: plugin_id.to_string(),
                hook: hook.to_string(),
            });
        }
        Ok(())
    }

    fn take_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::EntitlementContext;
    use crate::nav::model::NavSection;

    struct NamedFilter(&'static str);

    impl NavFilter for NamedFilter {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, sections: Vec<NavSection>, _ctx: &EntitlementContext) -> Vec<NavSection> {
            sections
        }
    }

    fn register(registry: &mut HookRegistry, plugin: &str, priority: Option<u8>, name: &'static str) {
        registry
            .register_filter("nav:main", plugin, priority, Arc::new(NamedFilter(name)))
            .unwrap();
    }

    #[test]
    fn priority_dominates_registration_order() {
        let mut registry = HookRegistry::new();
        register(&mut registry, "late-but-early", Some(10), "second");
        register(&mut registry, "first-registered", Some(90), "first");
        register(&mut registry, "default-priority", None, "third");

        let names: Vec<&str> =
            registry.filters_for("nav:main").iter().map(|h| h.callback.name()).collect();
        assert_eq!(names, vec!["second", "third", "first"]);
    }

    #[test]
    fn equal_priorities_tie_break_on_registration_order() {
        let mut registry = HookRegistry::new();
        register(&mut registry, "a", Some(50), "one");
        register(&mut registry, "b", Some(50), "two");
        register(&mut registry, "c", Some(50), "three");

        let names: Vec<&str> =
            registry.filters_for("nav:main").iter().map(|h| h.callback.name()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn ordering_is_stable_across_repeated_reads() {
        let mut registry = HookRegistry::new();
        register(&mut registry, "a", Some(20), "one");
        register(&mut registry, "b", Some(10), "two");

        let first: Vec<u64> =
            registry.filters_for("nav:main").iter().map(|h| h.registration_order).collect();
        let second: Vec<u64> =
            registry.filters_for("nav:main").iter().map(|h| h.registration_order).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn frozen_registry_refuses_writes() {
        let mut registry = HookRegistry::new();
        registry.freeze();

        let err = registry
            .register_filter("nav:main", "notes", None, Arc::new(NamedFilter("late")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Frozen { .. }));

        let err = registry.claim_namespace("notes", "notes").unwrap_err();
        assert!(matches!(err, RegistryError::Frozen { .. }));
    }

    #[test]
    fn namespace_double_claim_conflicts() {
        let mut registry = HookRegistry::new();
        registry.claim_namespace("notes", "notes").unwrap();

        // Re-claim by the same owner is idempotent
        registry.claim_namespace("notes", "notes").unwrap();

        let err = registry.claim_namespace("notes", "crm").unwrap_err();
        assert_eq!(
            err,
            RegistryError::NamespaceConflict {
                namespace: "notes".to_string(),
                claimed_by: "notes".to_string(),
                plugin_id: "crm".to_string(),
            }
        );
    }

    #[test]
    fn clear_resets_frozen_flag_and_counter() {
        let mut registry = HookRegistry::new();
        register(&mut registry, "a", None, "one");
        registry.freeze();

        registry.clear();
        assert!(!registry.is_frozen());
        assert!(registry.filters_for("nav:main").is_empty());

        register(&mut registry, "b", None, "fresh");
        assert_eq!(registry.filters_for("nav:main")[0].registration_order, 0);
    }
}
