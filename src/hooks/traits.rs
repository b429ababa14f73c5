use crate::entitlement::EntitlementContext;
use crate::nav::model::{NavModel, NavSection};

/// Filter hook: receives a value and returns it, composing sequentially -
/// each filter's output becomes the next filter's input. Navigation filters
/// are expected to be pure and idempotent for the same input and context;
/// the builder validates their output against ownership and reserved-id
/// rules after every invocation.
pub trait NavFilter: Send + Sync {
    /// Filter name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Transform one area's section list. May add, reorder, or annotate
    /// sections and items; must not remove ids outside its own namespace.
    fn apply(&self, sections: Vec<NavSection>, ctx: &EntitlementContext) -> Vec<NavSection>;
}

/// Action hook: receives a value and performs a side effect, no return.
/// Kept structurally separate from filters so the builder never has to
/// trust plugin discipline about purity.
pub trait NavAction: Send + Sync {
    /// Action name for logging and diagnostics
    fn name(&self) -> &'static str;

    fn run(&self, model: &NavModel, ctx: &EntitlementContext);
}
