use serde::{Deserialize, Serialize};

use crate::entitlement::EntitlementContext;

/// Namespace only the design-owner plugin may originate ids under
pub const RESERVED_NAMESPACE: &str = "core";

/// Well-known bare section ids the application shell depends on. Reserved
/// alongside the `core.*` namespace; other plugins may append items into
/// these sections but never create or replace them.
pub const RESERVED_SECTION_IDS: &[&str] = &["account", "billing", "settings"];

/// True if only the design-owner may originate this id
pub fn is_reserved_id(id: &str) -> bool {
    id == RESERVED_NAMESPACE
        || id.starts_with("core.")
        || RESERVED_SECTION_IDS.contains(&id)
}

/// Leading `<namespace>` segment of a `<namespace>.<name>` id. Ids without
/// a dot are their own namespace.
pub fn id_namespace(id: &str) -> &str {
    id.split('.').next().unwrap_or(id)
}

/// The three independent navigation areas. Each has its own filter hook
/// name; id uniqueness is checked across all three combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavArea {
    Main,
    Admin,
    UserMenu,
}

/// All areas, in build order
pub const ALL_AREAS: &[NavArea] = &[NavArea::Main, NavArea::Admin, NavArea::UserMenu];

/// Action hook fired with the fully composed model after a per-request
/// build. Actions never run during boot verification builds.
pub const NAV_COMPOSED_HOOK: &str = "nav:composed";

impl NavArea {
    /// Filter hook name plugins register against for this area
    pub fn hook_name(&self) -> &'static str {
        match self {
            NavArea::Main => "nav:main",
            NavArea::Admin => "nav:admin",
            NavArea::UserMenu => "nav:user_menu",
        }
    }
}

impl std::fmt::Display for NavArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavArea::Main => write!(f, "main"),
            NavArea::Admin => write!(f, "admin"),
            NavArea::UserMenu => write!(f, "user_menu"),
        }
    }
}

/// Exactly one of a navigation href or an action reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavTarget {
    #[serde(rename = "href")]
    Href(String),
    #[serde(rename = "action")]
    Action(String),
}

/// Permission metadata attached to items/sections during composition and
/// evaluated against the entitlement context in the final pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavRequirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_tier_level: Option<u8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multi_tenant_only: bool,
}

impl NavRequirement {
    pub fn satisfied_by(&self, ctx: &EntitlementContext) -> bool {
        if let Some(token) = &self.entitlement {
            if !ctx.has_entitlement(token) {
                return false;
            }
        }
        if let Some(min) = self.min_tier_level {
            if ctx.tier_level < min {
                return false;
            }
        }
        if self.multi_tenant_only && !ctx.has_multiple_tenants {
            return false;
        }
        true
    }
}

/// A single navigation entry. Identity is the id (`<namespace>.<name>`);
/// nothing else participates in uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub target: NavTarget,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<NavRequirement>,
}

impl NavItem {
    pub fn link(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            target: NavTarget::Href(href.into()),
            order,
            icon: None,
            badge: None,
            requires: None,
        }
    }

    pub fn action(id: impl Into<String>, label: impl Into<String>, action: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            target: NavTarget::Action(action.into()),
            order,
            icon: None,
            badge: None,
            requires: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn require_entitlement(mut self, token: impl Into<String>) -> Self {
        self.requires.get_or_insert_with(NavRequirement::default).entitlement = Some(token.into());
        self
    }

    pub fn require_tier(mut self, min_tier_level: u8) -> Self {
        self.requires.get_or_insert_with(NavRequirement::default).min_tier_level = Some(min_tier_level);
        self
    }

    pub fn multi_tenant_only(mut self) -> Self {
        self.requires.get_or_insert_with(NavRequirement::default).multi_tenant_only = true;
        self
    }
}

/// An ordered group of navigation items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub collapsible: bool,
    pub items: Vec<NavItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<NavRequirement>,
}

impl NavSection {
    pub fn new(id: impl Into<String>, heading: Option<&str>, order: i32) -> Self {
        Self {
            id: id.into(),
            heading: heading.map(|h| h.to_string()),
            order,
            collapsible: false,
            items: Vec::new(),
            requires: None,
        }
    }

    pub fn collapsible(mut self) -> Self {
        self.collapsible = true;
        self
    }

    pub fn with_item(mut self, item: NavItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn require_entitlement(mut self, token: impl Into<String>) -> Self {
        self.requires.get_or_insert_with(NavRequirement::default).entitlement = Some(token.into());
        self
    }
}

/// The composed navigation tree: three independent areas, built fresh per
/// request (or per boot-verification sample) and never mutated afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavModel {
    pub main: Vec<NavSection>,
    pub admin: Vec<NavSection>,
    pub user_menu: Vec<NavSection>,
}

impl NavModel {
    pub fn area(&self, area: NavArea) -> &[NavSection] {
        match area {
            NavArea::Main => &self.main,
            NavArea::Admin => &self.admin,
            NavArea::UserMenu => &self.user_menu,
        }
    }

    pub fn area_mut(&mut self, area: NavArea) -> &mut Vec<NavSection> {
        match area {
            NavArea::Main => &mut self.main,
            NavArea::Admin => &mut self.admin,
            NavArea::UserMenu => &mut self.user_menu,
        }
    }

    /// Every section and item id across all three areas, in tree order
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for area in ALL_AREAS {
            for section in self.area(*area) {
                ids.push(section.id.as_str());
                for item in &section.items {
                    ids.push(item.id.as_str());
                }
            }
        }
        ids
    }

    /// Find an item anywhere in the model
    pub fn find_item(&self, id: &str) -> Option<&NavItem> {
        ALL_AREAS
            .iter()
            .flat_map(|area| self.area(*area))
            .flat_map(|section| &section.items)
            .find(|item| item.id == id)
    }

    /// Find a section anywhere in the model
    pub fn find_section(&self, id: &str) -> Option<&NavSection> {
        ALL_AREAS
            .iter()
            .flat_map(|area| self.area(*area))
            .find(|section| section.id == id)
    }
}
