// Boot lifecycle: single-threaded registration phase, then the verification
// phase that proves navigation composition is collision-free across the
// generated entitlement sample before any traffic is accepted

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::capability::{self, decide_grants, Capability, CapabilityCheck, GrantDecision, PluginTier};
use crate::config;
use crate::entitlement::{generate_samples, CoverageLimits, EntitlementContext};
use crate::hooks::registry::HookRegistry;
use crate::nav::builder::NavBuilder;
use crate::nav::error::NavError;
use crate::nav::model::{NavModel, NAV_COMPOSED_HOOK, RESERVED_NAMESPACE, RESERVED_SECTION_IDS};
use crate::plugin::{Plugin, PluginManifest, PluginRegistrar, RegistrationError};

/// Boot failures. Every variant is an unrecoverable packaging or
/// composition defect; the process never starts serving after one.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("duplicate plugin id '{0}'")]
    DuplicatePluginId(String),

    #[error("no design-owner plugin present")]
    MissingDesignOwner,

    #[error("multiple design-owner plugins: '{first}' and '{second}'")]
    MultipleDesignOwners { first: String, second: String },

    #[error("design-owner plugin '{0}' did not provide a baseline navigation model")]
    MissingBaseline(String),

    #[error("plugin '{plugin_id}' failed to register: {source}")]
    Registration {
        plugin_id: String,
        #[source]
        source: RegistrationError,
    },

    #[error(
        "boot verification failed for entitlement sample '{sample}': {source}; \
         remediation: keep every plugin's navigation ids inside its own namespace \
         and re-run `atrium verify` before deploying"
    )]
    Verification {
        sample: String,
        #[source]
        source: NavError,
    },
}

/// Summary of a successful boot
#[derive(Debug, Clone)]
pub struct BootReport {
    pub plugins: usize,
    pub samples_checked: usize,
    pub elapsed: Duration,
}

/// The booted subsystem: frozen hook registry, baseline model, and the
/// per-plugin grant table, held for the process lifetime. Per-request
/// navigation builds share this read-only state and may run concurrently.
#[derive(Debug)]
pub struct Platform {
    registry: HookRegistry,
    baseline: NavModel,
    design_owner: String,
    grants: BTreeMap<String, GrantDecision>,
    report: BootReport,
}

impl Platform {
    /// Per-request navigation build: all six pipeline stages against the
    /// caller-supplied entitlement context, then any registered
    /// composed-model actions. A collision here aborts the request rather
    /// than returning an inconsistent tree.
    pub fn nav_for(&self, ctx: &EntitlementContext) -> Result<NavModel, NavError> {
        let model =
            NavBuilder::new(&self.registry, &self.baseline, &self.design_owner).build(ctx)?;

        for handler in self.registry.actions_for(NAV_COMPOSED_HOOK) {
            handler.callback.run(&model, ctx);
        }

        Ok(model)
    }

    /// Runtime capability decision for one token. Fail-closed: an unknown
    /// plugin id has an empty grant set.
    pub fn check(&self, plugin_id: &str, token: &str) -> CapabilityCheck {
        match self.grants.get(plugin_id) {
            Some(decision) => capability::check(plugin_id, token, &decision.granted),
            None => capability::check(plugin_id, token, &BTreeSet::new()),
        }
    }

    /// Runtime capability decision over a full required list
    pub fn check_all(&self, plugin_id: &str, required: &[&str]) -> CapabilityCheck {
        match self.grants.get(plugin_id) {
            Some(decision) => capability::check_all(plugin_id, required, &decision.granted),
            None => capability::check_all(plugin_id, required, &BTreeSet::new()),
        }
    }

    pub fn grant_for(&self, plugin_id: &str) -> Option<&GrantDecision> {
        self.grants.get(plugin_id)
    }

    pub fn grants(&self) -> &BTreeMap<String, GrantDecision> {
        &self.grants
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }
}

/// Boot with the verifier limits from application config
pub fn boot(plugins: &[Box<dyn Plugin>]) -> Result<Platform, BootError> {
    boot_with_limits(plugins, config::config().verifier.limits())
}

/// Full boot sequence with explicit verifier limits. Runs single-threaded
/// and to completion; there is exactly one writer and no concurrent readers
/// until this returns.
pub fn boot_with_limits(
    plugins: &[Box<dyn Plugin>],
    limits: CoverageLimits,
) -> Result<Platform, BootError> {
    let start = Instant::now();

    let manifests: Vec<PluginManifest> = plugins.iter().map(|p| p.manifest()).collect();
    let owner_index = select_design_owner(&manifests)?;
    let owner_id = manifests[owner_index].plugin_id.clone();

    // Capability decisions, one per manifest
    let mut grants: BTreeMap<String, GrantDecision> = BTreeMap::new();
    for manifest in &manifests {
        let decision = decide_grants(manifest);
        tracing::info!(
            "Plugin '{}' (tier {}): {} capabilities granted, {} denied",
            manifest.plugin_id, manifest.tier, decision.granted.len(), decision.denied.len()
        );
        grants.insert(manifest.plugin_id.clone(), decision);
    }

    // Registration phase
    let mut registry = HookRegistry::new();
    for (plugin, manifest) in plugins.iter().zip(&manifests) {
        let decision = &grants[&manifest.plugin_id];
        register_plugin(&mut registry, plugin.as_ref(), manifest, decision)?;
    }
    registry.freeze();

    // Baseline comes from the design owner, gated on its own grant
    let baseline = match &grants[&owner_id] {
        decision if decision.is_granted(Capability::DesignNavBaseline) => {
            plugins[owner_index].baseline()
        }
        _ => None,
    }
    .ok_or_else(|| BootError::MissingBaseline(owner_id.clone()))?;

    // Verification phase: every generated entitlement sample must compose
    // without a collision before the process may serve
    let granted_sets: BTreeMap<String, BTreeSet<Capability>> = grants
        .iter()
        .map(|(id, decision)| (id.clone(), decision.granted.clone()))
        .collect();
    let samples = generate_samples(&granted_sets, &limits);

    let builder = NavBuilder::new(&registry, &baseline, &owner_id);
    for sample in &samples {
        tracing::debug!("Verifying navigation composition for sample '{}'", sample.label);
        let ctx = EntitlementContext::synthetic(sample.tokens.clone());
        builder.build_unfiltered(&ctx).map_err(|source| {
            tracing::error!(
                "Boot verification failed for sample '{}': {}",
                sample.label, source
            );
            BootError::Verification { sample: sample.label.clone(), source }
        })?;
    }

    let report = BootReport {
        plugins: plugins.len(),
        samples_checked: samples.len(),
        elapsed: start.elapsed(),
    };

    tracing::info!(
        "Boot verification passed: {} plugins, {} entitlement samples in {:?}",
        report.plugins, report.samples_checked, report.elapsed
    );

    Ok(Platform { registry, baseline, design_owner: owner_id, grants, report })
}

fn select_design_owner(manifests: &[PluginManifest]) -> Result<usize, BootError> {
    let mut seen = BTreeSet::new();
    let mut owner: Option<usize> = None;

    for (index, manifest) in manifests.iter().enumerate() {
        if !seen.insert(manifest.plugin_id.clone()) {
            return Err(BootError::DuplicatePluginId(manifest.plugin_id.clone()));
        }
        if manifest.tier == PluginTier::DesignOwner {
            if let Some(first) = owner {
                return Err(BootError::MultipleDesignOwners {
                    first: manifests[first].plugin_id.clone(),
                    second: manifest.plugin_id.clone(),
                });
            }
            owner = Some(index);
        }
    }

    owner.ok_or(BootError::MissingDesignOwner)
}

fn register_plugin(
    registry: &mut HookRegistry,
    plugin: &dyn Plugin,
    manifest: &PluginManifest,
    decision: &GrantDecision,
) -> Result<(), BootError> {
    let fail = |source: RegistrationError| BootError::Registration {
        plugin_id: manifest.plugin_id.clone(),
        source,
    };

    // Every plugin owns the namespace matching its own id
    registry
        .claim_namespace(&manifest.plugin_id, &manifest.plugin_id)
        .map_err(|e| fail(e.into()))?;

    // The design owner additionally owns the reserved shell namespaces
    if decision.is_granted(Capability::DesignNavReserved) {
        registry
            .claim_namespace(RESERVED_NAMESPACE, &manifest.plugin_id)
            .map_err(|e| fail(e.into()))?;
        for section_id in RESERVED_SECTION_IDS {
            registry
                .claim_namespace(section_id, &manifest.plugin_id)
                .map_err(|e| fail(e.into()))?;
        }
    }

    let mut registrar = PluginRegistrar::new(registry, decision);
    plugin.register(&mut registrar).map_err(fail)
}
