//! Turns [`PreContract`]s into concrete contracts.
//!
//! Every step degrades to "no contracts" instead of failing: an expression
//! that cannot be located, a call that does not resolve, a guarded expression
//! with side effects or a normalization conflict all attenuate the result.

use tracing::{debug, trace, warn};

use infercon_core::{Contract, ContractReturnValue, Expr, ExpressionRange, MethodDef, ParameterConstraints};

use crate::context::{BodyAccessor, InferenceContext, ResolveConfig};
use crate::delegation;
use crate::normalize::to_non_intersecting;
use crate::precontract::PreContract;

/// Resolves pre-contracts against one [`InferenceContext`].
///
/// Holds no mutable state; one resolver may serve any number of methods.
pub struct Resolver<'c, C: InferenceContext + ?Sized> {
    ctx: &'c C,
    config: ResolveConfig,
}

impl<'c, C: InferenceContext + ?Sized> Resolver<'c, C> {
    pub fn new(ctx: &'c C) -> Self {
        Resolver::with_config(ctx, ResolveConfig::default())
    }

    pub fn with_config(ctx: &'c C, config: ResolveConfig) -> Self {
        Resolver { ctx, config }
    }

    /// Resolves a single descriptor for `method`.
    pub fn resolve(&self, pre: &PreContract, method: &MethodDef, body: &BodyAccessor<'_>) -> Vec<Contract> {
        self.resolve_at(pre, method, body, 0)
    }

    /// Resolves all descriptors recorded for `method`, in order, and
    /// normalizes the combined list. A conflict between descriptors yields no
    /// contracts at all.
    pub fn infer(&self, method: &MethodDef, pre_contracts: &[PreContract], body: &BodyAccessor<'_>) -> Vec<Contract> {
        let all: Vec<Contract> = pre_contracts
            .iter()
            .flat_map(|pre| self.resolve(pre, method, body))
            .collect();
        match to_non_intersecting(all) {
            Some(contracts) => contracts,
            None => {
                debug!(method = %method.name, "conflicting inferred contracts, dropping all");
                Vec::new()
            }
        }
    }

    fn resolve_at(&self, pre: &PreContract, method: &MethodDef, body: &BodyAccessor<'_>, depth: usize) -> Vec<Contract> {
        if depth > self.config.max_depth {
            warn!(
                method = %method.name,
                limit = self.config.max_depth,
                "pre-contract nesting exceeds depth limit"
            );
            return Vec::new();
        }

        match pre {
            PreContract::Known(contract) => vec![contract.clone()],
            PreContract::Delegation { call, negated } => {
                delegation::resolve_delegation(self.ctx, method, body, *call, *negated)
            }
            PreContract::SideEffectFilter { guarded, contracts } => {
                if self.any_side_effects(guarded, method, body) {
                    return Vec::new();
                }
                contracts
                    .iter()
                    .flat_map(|inner| self.resolve_at(inner, method, body, depth + 1))
                    .collect()
            }
            PreContract::Negating(inner) => self
                .resolve_at(inner, method, body, depth + 1)
                .iter()
                .filter_map(Contract::negate)
                .collect(),
            PreContract::MethodCall { call, states } => self.resolve_method_call(*call, states, method, body),
        }
    }

    /// An unlocatable guarded expression counts as side-effecting.
    fn any_side_effects(&self, guarded: &[ExpressionRange], method: &MethodDef, body: &BodyAccessor<'_>) -> bool {
        if guarded.is_empty() {
            return false;
        }
        let Some(snapshot) = body() else {
            debug!(method = %method.name, "body unavailable for side-effect check");
            return true;
        };
        guarded.iter().any(|range| match range.restore(snapshot) {
            Some(expr) if !self.ctx.may_have_side_effects(expr) => false,
            Some(_) => {
                debug!(method = %method.name, %range, "guarded expression has side effects");
                true
            }
            None => {
                debug!(method = %method.name, %range, "guarded expression not found");
                true
            }
        })
    }

    fn resolve_method_call(
        &self,
        call: ExpressionRange,
        states: &[ParameterConstraints],
        method: &MethodDef,
        body: &BodyAccessor<'_>,
    ) -> Vec<Contract> {
        let target = body()
            .and_then(|snapshot| call.restore(snapshot))
            .and_then(Expr::as_call)
            .and_then(|c| c.target);
        let Some(target) = target else {
            trace!(method = %method.name, range = %call, "call not resolved");
            return Vec::new();
        };
        if target == method.id {
            trace!(method = %method.name, "self call excluded");
            return Vec::new();
        }
        if !self.ctx.is_never_null(target) {
            return Vec::new();
        }
        states
            .iter()
            .filter(|state| state.len() == method.arity())
            .map(|state| Contract::new(state.clone(), ContractReturnValue::NotNull))
            .collect()
    }
}
