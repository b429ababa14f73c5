// Shared fixtures for plugin/boot integration tests
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use atrium_api::capability::PluginTier;
use atrium_api::entitlement::EntitlementContext;
use atrium_api::hooks::traits::NavFilter;
use atrium_api::nav::model::{NavArea, NavItem, NavSection};
use atrium_api::plugin::manifest::{PluginManifest, RequestedCapability};
use atrium_api::plugin::{Plugin, PluginRegistrar, RegistrationError};

pub fn entitlements(tokens: &[&str]) -> BTreeSet<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

pub fn synthetic_ctx(tokens: &[&str]) -> EntitlementContext {
    EntitlementContext::synthetic(entitlements(tokens))
}

pub fn manifest_for(id: &str, tier: PluginTier, tokens: &[&str]) -> PluginManifest {
    PluginManifest {
        plugin_id: id.to_string(),
        package_name: format!("@atrium/plugin-{}", id),
        version: "1.0.0".to_string(),
        tier,
        requested_capabilities: tokens
            .iter()
            .map(|t| RequestedCapability { capability: t.to_string(), reason: "test".to_string() })
            .collect(),
    }
}

/// Filter that appends one section with one item, unconditionally
struct AppendSection {
    section_id: String,
    section_order: i32,
    item: NavItem,
}

impl NavFilter for AppendSection {
    fn name(&self) -> &'static str {
        "append_section"
    }

    fn apply(&self, mut sections: Vec<NavSection>, _ctx: &EntitlementContext) -> Vec<NavSection> {
        sections.push(
            NavSection::new(self.section_id.clone(), None, self.section_order)
                .with_item(self.item.clone()),
        );
        sections
    }
}

/// Filter that appends an item only when the context holds an entitlement.
/// Used to prove boot verification explores entitlement-dependent branches.
struct ConditionalAppend {
    entitlement: String,
    section_id: String,
    item: NavItem,
}

impl NavFilter for ConditionalAppend {
    fn name(&self) -> &'static str {
        "conditional_append"
    }

    fn apply(&self, mut sections: Vec<NavSection>, ctx: &EntitlementContext) -> Vec<NavSection> {
        if ctx.has_entitlement(&self.entitlement) {
            sections.push(
                NavSection::new(self.section_id.clone(), None, 50).with_item(self.item.clone()),
            );
        }
        sections
    }
}

/// Plugin fixture that appends a fixed section/item to the main area
pub struct AppendPlugin {
    pub id: &'static str,
    pub tier: PluginTier,
    pub tokens: &'static [&'static str],
    pub section_id: String,
    pub item: NavItem,
}

impl AppendPlugin {
    pub fn tier_b(id: &'static str, section_id: &str, item: NavItem) -> Self {
        Self {
            id,
            tier: PluginTier::B,
            tokens: &["ui:filter:nav"],
            section_id: section_id.to_string(),
            item,
        }
    }
}

impl Plugin for AppendPlugin {
    fn manifest(&self) -> PluginManifest {
        manifest_for(self.id, self.tier, self.tokens)
    }

    fn register(&self, registrar: &mut PluginRegistrar<'_>) -> Result<(), RegistrationError> {
        registrar.register_nav_filter(
            NavArea::Main,
            None,
            Arc::new(AppendSection {
                section_id: self.section_id.clone(),
                section_order: 40,
                item: self.item.clone(),
            }),
        )
    }
}

/// Plugin fixture whose filter only fires under a given entitlement
pub struct ConditionalPlugin {
    pub id: &'static str,
    pub tokens: &'static [&'static str],
    pub entitlement: &'static str,
    pub section_id: String,
    pub item: NavItem,
}

impl Plugin for ConditionalPlugin {
    fn manifest(&self) -> PluginManifest {
        manifest_for(self.id, PluginTier::B, self.tokens)
    }

    fn register(&self, registrar: &mut PluginRegistrar<'_>) -> Result<(), RegistrationError> {
        registrar.register_nav_filter(
            NavArea::Main,
            None,
            Arc::new(ConditionalAppend {
                entitlement: self.entitlement.to_string(),
                section_id: self.section_id.clone(),
                item: self.item.clone(),
            }),
        )
    }
}
