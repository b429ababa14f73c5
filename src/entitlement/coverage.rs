//! Entitlement coverage generation for boot verification.
//!
//! Collision-freedom must hold for every entitlement context a deployment
//! could present, which is an unbounded space. This module manufactures a
//! bounded, representative sample of entitlement sets from the capabilities
//! actually granted across all plugins, targeting the collision classes seen
//! in practice: nothing granted, everything granted, single capabilities,
//! whole-plugin bundles, and capability pairs, plus the full power set while
//! it stays cheap.
//!
//! This is a best-effort sampling strategy, not a soundness proof: pairwise
//! plus bundle sampling can miss collisions that need three or more
//! simultaneously granted capabilities once the count exceeds the power-set
//! threshold. An exact SAT/BDD reachability analysis would close that gap
//! and remains an open question.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::capability::{Capability, PluginTier};

/// Bounds on the generator's own cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageLimits {
    /// Maximum number of pairwise combinations to emit
    pub pair_cap: usize,
    /// Full power-set generation only at or below this many distinct
    /// granted capabilities (2^8 - 1 = 255 subsets is cheap; growth beyond
    /// that is not)
    pub powerset_threshold: usize,
}

impl Default for CoverageLimits {
    fn default() -> Self {
        Self { pair_cap: 512, powerset_threshold: 8 }
    }
}

/// One synthetic entitlement set, labelled by how it was produced so boot
/// diagnostics can cite the triggering sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitlementSample {
    pub label: String,
    pub tokens: BTreeSet<String>,
}

/// The fixed administrator baseline: every UI token plus the route and
/// database reach a tenant administrator typically holds
pub fn admin_baseline() -> BTreeSet<Capability> {
    let mut set: BTreeSet<Capability> = PluginTier::A.allow_list().into_iter().collect();
    set.insert(Capability::AppRoutes);
    set.insert(Capability::AppDbRead);
    set.insert(Capability::AppDbWrite);
    set
}

/// Generate the verification sample from the per-plugin granted capability
/// sets. All candidates are deduplicated by canonical key (sorted, joined)
/// so the boot validator never repeats work. Output is deterministic for
/// identical inputs.
pub fn generate_samples(
    grants: &BTreeMap<String, BTreeSet<Capability>>,
    limits: &CoverageLimits,
) -> Vec<EntitlementSample> {
    let union: BTreeSet<Capability> = grants.values().flatten().copied().collect();
    let caps: Vec<Capability> = union.iter().copied().collect();

    let mut samples = Vec::new();
    let mut seen = BTreeSet::new();

    // The empty set: no capabilities granted to anyone
    push_sample(&mut samples, &mut seen, "empty", BTreeSet::new());

    // The fixed administrator baseline
    push_sample(&mut samples, &mut seen, "admin-baseline", tokens_of(admin_baseline().iter()));

    // The full union of every granted capability
    push_sample(&mut samples, &mut seen, "full-union", tokens_of(caps.iter()));

    // One singleton per distinct granted capability
    for cap in &caps {
        push_sample(
            &mut samples,
            &mut seen,
            &format!("singleton:{}", cap),
            tokens_of(std::iter::once(cap)),
        );
    }

    // One bundle per plugin
    for (plugin_id, bundle) in grants {
        push_sample(
            &mut samples,
            &mut seen,
            &format!("plugin:{}", plugin_id),
            tokens_of(bundle.iter()),
        );
    }

    // Pairwise combinations, capped
    let mut pairs = 0usize;
    'pairs: for i in 0..caps.len() {
        for j in (i + 1)..caps.len() {
            if pairs >= limits.pair_cap {
                tracing::debug!(
                    "Pair generation capped at {} of {} possible pairs",
                    limits.pair_cap,
                    caps.len() * caps.len().saturating_sub(1) / 2
                );
                break 'pairs;
            }
            pairs += 1;
            push_sample(
                &mut samples,
                &mut seen,
                &format!("pair:{}+{}", caps[i], caps[j]),
                tokens_of([caps[i], caps[j]].iter()),
            );
        }
    }

    // The full power set, only while it stays cheap
    if !caps.is_empty() && caps.len() <= limits.powerset_threshold {
        for mask in 1u32..(1u32 << caps.len()) {
            let subset: BTreeSet<String> = caps
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, cap)| cap.token().to_string())
                .collect();
            let label = format!("powerset:{}", canonical_key(&subset));
            push_sample(&mut samples, &mut seen, &label, subset);
        }
    }

    tracing::info!(
        "Generated {} entitlement samples from {} distinct granted capabilities across {} plugins",
        samples.len(), caps.len(), grants.len()
    );

    samples
}

fn tokens_of<'a>(caps: impl Iterator<Item = &'a Capability>) -> BTreeSet<String> {
    caps.map(|c| c.token().to_string()).collect()
}

/// Canonical dedup key: sorted tokens joined. BTreeSet iteration is already
/// sorted.
fn canonical_key(tokens: &BTreeSet<String>) -> String {
    tokens.iter().cloned().collect::<Vec<_>>().join("+")
}

fn push_sample(
    samples: &mut Vec<EntitlementSample>,
    seen: &mut BTreeSet<String>,
    label: &str,
    tokens: BTreeSet<String>,
) {
    if seen.insert(canonical_key(&tokens)) {
        samples.push(EntitlementSample { label: label.to_string(), tokens });
    }
}
