use std::collections::BTreeSet;
use std::sync::Arc;

use crate::capability::PluginTier;
use crate::entitlement::EntitlementContext;
use crate::hooks::traits::NavFilter;
use crate::nav::model::{NavArea, NavItem, NavSection};
use crate::plugin::manifest::{PluginManifest, RequestedCapability};
use crate::plugin::{Plugin, PluginRegistrar, RegistrationError};

/// Entitlement token set from string literals
pub fn entitlements(tokens: &[&str]) -> BTreeSet<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Synthetic context carrying the given entitlement tokens
pub fn ctx_with(tokens: &[&str]) -> EntitlementContext {
    EntitlementContext::synthetic(entitlements(tokens))
}

/// Manifest fixture requesting the given raw tokens
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

/// Filter fixture that appends one section with one item to an area
pub struct SectionFilter {
    pub section_id: &'static str,
    pub section_order: i32,
    pub item: NavItem,
}

impl NavFilter for SectionFilter {
    fn name(&self) -> &'static str {
        "section_filter"
    }

    fn apply(&self, mut sections: Vec<NavSection>, _ctx: &EntitlementContext) -> Vec<NavSection> {
        sections.push(
            NavSection::new(self.section_id, None, self.section_order).with_item(self.item.clone()),
        );
        sections
    }
}

/// Configurable plugin fixture for registration and boot tests
pub struct TestPlugin {
    pub id: &'static str,
    pub tier: PluginTier,
    pub tokens: &'static [&'static str],
    pub filter_section: Option<&'static str>,
    pub filter_item: Option<NavItem>,
}

impl TestPlugin {
    /// Plugin that registers nothing
    pub fn inert(id: &'static str, tier: PluginTier) -> Self {
        Self { id, tier, tokens: &[], filter_section: None, filter_item: None }
    }

    /// Plugin whose filter appends `item` inside a section named after
    /// `section`
    pub fn with_filter(
        id: &'static str,
        tier: PluginTier,
        tokens: &'static [&'static str],
        section: &'static str,
        item: NavItem,
    ) -> Self {
        Self { id, tier, tokens, filter_section: Some(section), filter_item: Some(item) }
    }
}

impl Plugin for TestPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            plugin_id: self.id.to_string(),
            package_name: format!("@atrium/plugin-{}", self.id),
            version: "1.0.0".to_string(),
            tier: self.tier,
            requested_capabilities: self
                .tokens
                .iter()
                .map(|t| RequestedCapability { capability: t.to_string(), reason: "test".to_string() })
                .collect(),
        }
    }

    fn register(&self, registrar: &mut PluginRegistrar<'_>) -> Result<(), RegistrationError> {
        if let (Some(section_id), Some(item)) = (self.filter_section, self.filter_item.clone()) {
            registrar.register_nav_filter(
                NavArea::Main,
                None,
                Arc::new(SectionFilter { section_id, section_order: 40, item }),
            )?;
        }
        Ok(())
    }
}
