use std::collections::BTreeSet;

use crate::entitlement::EntitlementContext;
use crate::hooks::registry::{FilterHandler, HookRegistry};
use crate::nav::error::NavError;
use crate::nav::model::{
    id_namespace, is_reserved_id, NavItem, NavModel, NavSection, ALL_AREAS,
};

/// Navigation model builder: a fixed six-stage pipeline over a baseline
/// tree, the frozen hook registry, and one entitlement context.
///
/// The builder is deterministic - identical inputs produce identical output -
/// performs no I/O, and mutates no shared state, so per-request builds may
/// run concurrently and the boot validator may invoke it in a tight loop.
pub struct NavBuilder<'a> {
    registry: &'a HookRegistry,
    baseline: &'a NavModel,
    design_owner: &'a str,
}

impl<'a> NavBuilder<'a> {
    pub fn new(registry: &'a HookRegistry, baseline: &'a NavModel, design_owner: &'a str) -> Self {
        Self { registry, baseline, design_owner }
    }

    /// Full per-request build: all six stages including the permission
    /// filter. A collision here aborts the request rather than returning an
    /// inconsistent tree, even though boot verification should have made it
    /// impossible.
    pub fn build(&self, ctx: &EntitlementContext) -> Result<NavModel, NavError> {
        self.run(ctx, true)
    }

    /// Stages 1-5 only. Used by boot verification, where permission
    /// filtering is irrelevant to collision detection and skipping it keeps
    /// the sample loop cheap.
    pub fn build_unfiltered(&self, ctx: &EntitlementContext) -> Result<NavModel, NavError> {
        self.run(ctx, false)
    }

    fn run(&self, ctx: &EntitlementContext, apply_permission_filter: bool) -> Result<NavModel, NavError> {
        // Stage 1: design-owner baseline, no plugin input yet
        let mut model = self.baseline.clone();

        // Stage 2: thread each area's section list through that area's
        // filter chain in registry order, validating ownership and
        // reserved-id rules after every filter
        for area in ALL_AREAS {
            let handlers = self.registry.filters_for(area.hook_name());
            let mut sections = std::mem::take(model.area_mut(*area));

            for handler in &handlers {
                let before = snapshot_ids(&sections);
                sections = handler.callback.apply(sections, ctx);
                self.validate_filter_output(handler, &before, &sections)?;
            }

            *model.area_mut(*area) = sections;
        }

        // Stage 3: mandatory core entries, so navigation stays usable even
        // with every plugin disabled
        inject_mandatory_entries(&mut model);

        // Stage 4: stable sort by order; ties preserve stage 2-3 insertion
        // order
        for area in ALL_AREAS {
            let sections = model.area_mut(*area);
            sections.sort_by_key(|s| s.order);
            for section in sections.iter_mut() {
                section.items.sort_by_key(|i| i.order);
            }
        }

        // Stage 5: global id uniqueness across all three areas combined.
        // No recovery path.
        check_collisions(&model)?;

        // Stage 6: entitlement-dependent permission filter
        if apply_permission_filter {
            apply_permissions(&mut model, ctx);
        }

        Ok(model)
    }

    /// Validate one filter's output against its ownership: new reserved ids
    /// may only come from the design-owner, and ids outside the plugin's
    /// claimed namespaces must survive the filter.
    fn validate_filter_output(
        &self,
        handler: &FilterHandler,
        before: &BTreeSet<String>,
        after: &[NavSection],
    ) -> Result<(), NavError> {
        let after_ids = snapshot_ids(after);
        validate_reserved_ids(&handler.plugin_id, self.design_owner, before, &after_ids)?;

        for removed in before.difference(&after_ids) {
            let namespace = id_namespace(removed);
            let owns = self.registry.namespace_owner(namespace) == Some(handler.plugin_id.as_str());
            if !owns {
                tracing::error!(
                    "Filter '{}' from plugin '{}' removed foreign id '{}'",
                    handler.callback.name(), handler.plugin_id, removed
                );
                return Err(NavError::ForeignRemoval {
                    plugin_id: handler.plugin_id.clone(),
                    id: removed.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Reserved-id law: any id in the reserved namespace that first appears in
/// a filter's output must have been originated by the design-owner plugin.
/// Reports the offending plugin and id; never silently drops the entry.
pub fn validate_reserved_ids(
    plugin_id: &str,
    design_owner: &str,
    before: &BTreeSet<String>,
    after: &BTreeSet<String>,
) -> Result<(), NavError> {
    if plugin_id == design_owner {
        return Ok(());
    }

    for added in after.difference(before) {
        if is_reserved_id(added) {
            tracing::error!("Plugin '{}' attempted to originate reserved id '{}'", plugin_id, added);
            return Err(NavError::ReservedIdViolation {
                plugin_id: plugin_id.to_string(),
                id: added.clone(),
            });
        }
    }

    Ok(())
}

/// Section and item ids of one area, as a set
fn snapshot_ids(sections: &[NavSection]) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    for section in sections {
        ids.insert(section.id.clone());
        for item in &section.items {
            ids.insert(item.id.clone());
        }
    }
    ids
}

/// Stage 3: force-append the fixed core entries if not already present
fn inject_mandatory_entries(model: &mut NavModel) {
    if model.find_item("core.account.logout").is_some() {
        return;
    }

    let logout = NavItem::action("core.account.logout", "Sign out", "auth.logout", 990);

    if let Some(section) = model.user_menu.iter_mut().find(|s| s.id == "core.account") {
        section.items.push(logout);
    } else {
        model
            .user_menu
            .push(NavSection::new("core.account", Some("Account"), 900).with_item(logout));
    }
}

/// Stage 5: walk the assembled model and collect every id that appears more
/// than once, across section ids and item ids in all three areas
fn check_collisions(model: &NavModel) -> Result<(), NavError> {
    let all = model.all_ids();
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();

    for id in all {
        if !seen.insert(id) && !duplicates.iter().any(|d| d == id) {
            duplicates.push(id.to_string());
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(NavError::Collision { ids: duplicates })
    }
}

/// Stage 6: drop entries whose requirement the context does not satisfy,
/// then drop sections left with zero items
fn apply_permissions(model: &mut NavModel, ctx: &EntitlementContext) {
    for area in ALL_AREAS {
        let sections = model.area_mut(*area);

        sections.retain(|section| match &section.requires {
            Some(req) => req.satisfied_by(ctx),
            None => true,
        });

        for section in sections.iter_mut() {
            section.items.retain(|item| match &item.requires {
                Some(req) => req.satisfied_by(ctx),
                None => true,
            });
        }

        sections.retain(|section| !section.items.is_empty());
    }
}
