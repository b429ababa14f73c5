use crate::capability::PluginTier;
use crate::nav::model::{NavItem, NavModel, NavSection};
use crate::plugin::manifest::{PluginManifest, RequestedCapability};
use crate::plugin::Plugin;

/// The design-owner plugin. Owns the reserved `core.*` namespace and the
/// well-known shell sections, and provides the baseline navigation model
/// every build starts from.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            plugin_id: "core".to_string(),
            package_name: "@atrium/core".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tier: PluginTier::DesignOwner,
            requested_capabilities: vec![
                RequestedCapability {
                    capability: "design:nav:baseline".to_string(),
                    reason: "provides the baseline navigation model".to_string(),
                },
                RequestedCapability {
                    capability: "design:nav:reserved".to_string(),
                    reason: "owns the core.* namespace and shell sections".to_string(),
                },
            ],
        }
    }

    fn baseline(&self) -> Option<NavModel> {
        let mut model = NavModel::default();

        model.main.push(
            NavSection::new("core.workspace", Some("Workspace"), 10)
                .with_item(NavItem::link("core.workspace.home", "Dashboard", "/", 10).with_icon("home"))
                .with_item(NavItem::link("core.workspace.activity", "Activity", "/activity", 20)),
        );

        model.admin.push(
            NavSection::new("core.admin", Some("Administration"), 10)
                .collapsible()
                .with_item(
                    NavItem::link("core.admin.tenants", "Tenants", "/admin/tenants", 10)
                        .require_entitlement("app:db:read"),
                )
                .with_item(
                    NavItem::link("core.admin.billing", "Billing", "/admin/billing", 20)
                        .require_entitlement("app:db:write"),
                )
                .with_item(
                    NavItem::link("core.admin.plugins", "Plugins", "/admin/plugins", 30)
                        .require_entitlement("app:routes"),
                ),
        );

        model.user_menu.push(
            NavSection::new("core.account", Some("Account"), 900)
                .with_item(NavItem::link("core.account.profile", "Profile", "/account", 10))
                .with_item(
                    NavItem::action("core.account.switch_tenant", "Switch tenant", "tenant.switch", 20)
                        .multi_tenant_only(),
                )
                .with_item(NavItem::action("core.account.logout", "Sign out", "auth.logout", 990)),
        );

        Some(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{decide_grants, Capability};

    #[test]
    fn core_manifest_is_fully_granted() {
        let decision = decide_grants(&CorePlugin.manifest());
        assert!(decision.is_granted(Capability::DesignNavBaseline));
        assert!(decision.is_granted(Capability::DesignNavReserved));
        assert!(decision.denied.is_empty());
    }

    #[test]
    fn baseline_ids_all_live_in_the_reserved_namespace() {
        let model = CorePlugin.baseline().unwrap();
        for id in model.all_ids() {
            assert!(id.starts_with("core."), "baseline id '{}' must be reserved", id);
        }
    }

    #[test]
    fn baseline_has_no_duplicate_ids() {
        let model = CorePlugin.baseline().unwrap();
        let ids = model.all_ids();
        let unique: std::collections::BTreeSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
