mod common;

use std::collections::BTreeSet;

use atrium_api::capability::{
    check, check_all, decide_grants, validate_manifest_capabilities, Capability, PluginTier,
    ALL_CAPABILITIES,
};

// These tests pin the grant-decision surface: tier partitions, fail-closed
// checks, and the reasons attached to denials.

#[test]
fn notes_manifest_at_tier_b_is_fully_granted() {
    let manifest = common::manifest_for(
        "notes",
        PluginTier::B,
        &["app:routes", "ui:filter:nav", "app:db:write"],
    );
    let decision = decide_grants(&manifest);

    assert_eq!(decision.granted.len(), 3);
    for cap in [Capability::AppRoutes, Capability::UiFilterNav, Capability::AppDbWrite] {
        assert!(decision.is_granted(cap), "expected grant for '{}'", cap);
    }
    assert!(decision.denied.is_empty());
}

#[test]
fn same_manifest_at_tier_a_keeps_only_ui_tokens() {
    let manifest = common::manifest_for(
        "notes",
        PluginTier::A,
        &["app:routes", "ui:filter:nav", "app:db:write"],
    );
    let decision = decide_grants(&manifest);

    assert_eq!(decision.granted.len(), 1);
    assert!(decision.is_granted(Capability::UiFilterNav));

    for token in ["app:routes", "app:db:write"] {
        assert!(decision.denied.contains(token));
        let reason = &decision.reasons[token];
        assert!(reason.contains("tier A"), "reason must cite the tier mismatch: {}", reason);
    }
}

#[test]
fn empty_grant_set_denies_every_capability_for_any_plugin() {
    let granted = BTreeSet::new();

    for cap in ALL_CAPABILITIES {
        for plugin_id in ["notes", "crm", ""] {
            let result = check(plugin_id, cap.token(), &granted);
            assert!(!result.allowed, "'{}' must be denied for '{}'", cap, plugin_id);
            assert!(result.reason.is_some());
        }
    }
}

#[test]
fn unknown_tokens_are_denied_with_their_own_reason() {
    let mut granted = BTreeSet::new();
    granted.insert(Capability::UiFilterNav);
    granted.insert(Capability::AppRoutes);

    let result = check("notes", "app:route", &granted);
    assert!(!result.allowed);
    assert!(result.reason.unwrap().contains("unknown capability"));
}

#[test]
fn check_all_reports_every_missing_capability_not_just_the_first() {
    let mut granted = BTreeSet::new();
    granted.insert(Capability::UiMenuItems);

    let result = check_all(
        "crm",
        &["ui:menu:items", "app:routes", "app:db:read", "app:db:write"],
        &granted,
    );

    assert!(!result.allowed);
    assert_eq!(
        result.missing_capabilities,
        vec!["app:routes", "app:db:read", "app:db:write"]
    );
}

#[test]
fn manifest_validation_mirrors_the_grant_decision() {
    let good = common::manifest_for("notes", PluginTier::B, &["app:routes", "ui:filter:nav"]);
    assert!(validate_manifest_capabilities(&good).valid);

    let bad = common::manifest_for("notes", PluginTier::A, &["app:routes", "ui:filter:nav"]);
    let validation = validate_manifest_capabilities(&bad);
    assert!(!validation.valid);
    assert_eq!(validation.errors.len(), 1);
    assert!(validation.errors[0].contains("app:routes"));
}

#[test]
fn decisions_are_identical_across_recomputation() {
    let manifest = common::manifest_for(
        "notes",
        PluginTier::B,
        &["app:routes", "nonsense:token", "ui:filter:nav"],
    );

    let first = decide_grants(&manifest);
    let second = decide_grants(&manifest);
    assert_eq!(first, second);
}
