//! The collaborator seam between resolution and the analysis platform.

use infercon_core::{Contract, Expr, MethodBody, MethodDef, MethodId};

/// Supplies the body snapshot of the method being analyzed.
///
/// May be called several times during one resolution pass and must return the
/// same snapshot each time. `None` means the body is unavailable, which
/// resolves to no contracts.
pub type BodyAccessor<'b> = dyn Fn() -> Option<&'b MethodBody> + 'b;

/// Facts about other methods and expressions that resolution depends on.
pub trait InferenceContext {
    /// The declaration of `id`, if the method is known.
    fn method(&self, id: MethodId) -> Option<&MethodDef>;

    /// The already-resolved contracts of `id`; empty when none are known.
    fn method_contracts(&self, id: MethodId) -> Vec<Contract>;

    /// Returns `true` if `id` is annotated or proven to never return null.
    fn is_never_null(&self, id: MethodId) -> bool;

    /// Returns `true` if evaluating `expr` may have observable side effects.
    /// Implementations must answer `true` when unsure.
    fn may_have_side_effects(&self, expr: &Expr) -> bool;
}

/// Configuration for a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Maximum pre-contract nesting depth. Deeper descriptors resolve to
    /// nothing. Default: 64.
    pub max_depth: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig { max_depth: 64 }
    }
}
