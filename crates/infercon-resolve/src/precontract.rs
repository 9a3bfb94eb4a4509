//! Lazily resolvable contract descriptors.
//!
//! A [`PreContract`] is produced once by the body scanner and never mutated.
//! It only becomes a list of contracts when resolved against a body snapshot
//! and an [`InferenceContext`].

use serde::{Deserialize, Serialize};

use infercon_core::{Contract, ExpressionRange, MethodDef, ParameterConstraints};

use crate::context::{BodyAccessor, InferenceContext};
use crate::resolver::Resolver;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreContract {
    /// A contract stated literally in the source. Always resolves to itself.
    Known(Contract),

    /// The method returns the result of the call at `call`, negated if
    /// `negated` is set.
    Delegation {
        call: ExpressionRange,
        #[serde(default)]
        negated: bool,
    },

    /// `contracts` only hold if none of the `guarded` expressions has side
    /// effects.
    SideEffectFilter {
        guarded: Vec<ExpressionRange>,
        contracts: Vec<PreContract>,
    },

    /// Every boolean outcome of the inner descriptor, flipped.
    Negating(Box<PreContract>),

    /// Each of `states` implies a non-null return if the method called at
    /// `call` never returns null.
    MethodCall {
        call: ExpressionRange,
        states: Vec<ParameterConstraints>,
    },
}

impl PreContract {
    pub fn delegation(call: ExpressionRange, negated: bool) -> Self {
        PreContract::Delegation { call, negated }
    }

    pub fn side_effect_filter(guarded: Vec<ExpressionRange>, contracts: Vec<PreContract>) -> Self {
        PreContract::SideEffectFilter { guarded, contracts }
    }

    pub fn negating(inner: PreContract) -> Self {
        PreContract::Negating(Box::new(inner))
    }

    /// The descriptor for the logical negation of this one, or `None` when no
    /// contract it could produce has a boolean outcome.
    pub fn negate(&self) -> Option<PreContract> {
        match self {
            PreContract::Known(contract) => contract.negate().map(PreContract::Known),
            PreContract::MethodCall { .. } => None,
            PreContract::SideEffectFilter { guarded, contracts } => {
                let negated: Vec<PreContract> = contracts.iter().filter_map(PreContract::negate).collect();
                if negated.is_empty() {
                    None
                } else {
                    Some(PreContract::side_effect_filter(guarded.clone(), negated))
                }
            }
            PreContract::Delegation { .. } | PreContract::Negating(_) => {
                Some(PreContract::negating(self.clone()))
            }
        }
    }

    /// Resolves with the default [`ResolveConfig`](crate::ResolveConfig).
    pub fn resolve<C>(&self, method: &MethodDef, body: &BodyAccessor<'_>, ctx: &C) -> Vec<Contract>
    where
        C: InferenceContext + ?Sized,
    {
        Resolver::new(ctx).resolve(self, method, body)
    }
}
