//! Delegation: mapping a callee's contracts through a call's arguments into
//! the caller's parameter space.

use std::iter;

use tracing::{debug, trace};

use infercon_core::{
    CallExpr, Contract, ContractReturnValue, Expr, ExprKind, ExpressionRange, Literal, MethodDef,
    ParameterConstraints, ValueConstraint,
};

use crate::context::{BodyAccessor, InferenceContext};
use crate::normalize::to_non_intersecting;

/// Resolves a delegation descriptor: the caller returns (possibly negated)
/// whatever the call at `call_range` returns.
pub(crate) fn resolve_delegation<C>(
    ctx: &C,
    method: &MethodDef,
    body: &BodyAccessor<'_>,
    call_range: ExpressionRange,
    negated: bool,
) -> Vec<Contract>
where
    C: InferenceContext + ?Sized,
{
    let Some(call) = body()
        .and_then(|snapshot| call_range.restore(snapshot))
        .and_then(Expr::as_call)
    else {
        debug!(method = %method.name, range = %call_range, "delegating call not found");
        return Vec::new();
    };
    let Some(target) = call.target.and_then(|id| ctx.method(id)) else {
        debug!(method = %method.name, call = %call.name, "delegating call target not resolved");
        return Vec::new();
    };
    if target.id == method.id {
        trace!(method = %method.name, "self delegation excluded");
        return Vec::new();
    }
    let Some(target_contracts) = to_non_intersecting(ctx.method_contracts(target.id)) else {
        debug!(callee = %target.name, "target contracts intersect");
        return Vec::new();
    };
    if target_contracts.is_empty() {
        return Vec::new();
    }

    let var_arg_call = target.is_var_arg_call(call);
    let mut from_delegate: Vec<Contract> = target_contracts
        .iter()
        .filter_map(|contract| {
            let translated = translate_contract(method, target, call, var_arg_call, negated, contract);
            if translated.is_none() {
                trace!(callee = %target.name, %contract, "target contract not translatable");
            }
            translated
        })
        .collect();

    if ctx.is_never_null(target.id) {
        from_delegate = from_delegate
            .into_iter()
            .map(return_not_null)
            .chain(iter::once(Contract::unconditional(
                method.arity(),
                ContractReturnValue::NotNull,
            )))
            .collect();
    }

    to_non_intersecting(from_delegate).unwrap_or_else(|| {
        debug!(method = %method.name, callee = %target.name, "delegated contracts conflict");
        Vec::new()
    })
}

/// Rewrites one target contract in terms of the caller's parameters.
///
/// Returns `None` when the call has fewer arguments than the contract has
/// slots, when some constrained argument is neither a caller parameter nor a
/// literal matching the constraint, when two requirements on one caller
/// parameter contradict, or when a variadic slot must be null.
pub fn translate_contract(
    caller: &MethodDef,
    target: &MethodDef,
    call: &CallExpr,
    var_arg_call: bool,
    negated: bool,
    target_contract: &Contract,
) -> Option<Contract> {
    let mut answer = ParameterConstraints::unconstrained(caller.arity());
    for (i, constraint) in target_contract.constraints().iter().enumerate() {
        // Slots and arguments advance in lockstep, even unconstrained ones.
        let argument = call.arguments.get(i)?;
        if constraint.is_any() {
            continue;
        }
        if var_arg_call && i + 1 >= target.arity() {
            // A variadic expansion always passes a non-null array.
            if constraint == ValueConstraint::NullValue {
                return None;
            }
            break;
        }

        let argument = argument.skip_parenthesized();
        if let Some(index) = argument.parameter_index(caller.id) {
            answer = answer.with_constraint(index, constraint)?;
        } else if literal_constraint(argument) != Some(constraint) {
            return None;
        }
    }

    let mut return_value = target_contract.return_value();
    if negated {
        if let Some(flipped) = return_value.negate() {
            return_value = flipped;
        }
    }
    Some(Contract::new(answer, return_value))
}

/// The constraint an argument expression satisfies on its own, if any.
pub fn literal_constraint(argument: &Expr) -> Option<ValueConstraint> {
    match &argument.kind {
        ExprKind::Literal(Literal::Null) => Some(ValueConstraint::NullValue),
        ExprKind::Literal(Literal::Bool(true)) => Some(ValueConstraint::TrueValue),
        ExprKind::Literal(Literal::Bool(false)) => Some(ValueConstraint::FalseValue),
        ExprKind::Literal(_) => Some(ValueConstraint::NotNullValue),
        ExprKind::New { .. } | ExprKind::Polyadic { .. } | ExprKind::Function => {
            Some(ValueConstraint::NotNullValue)
        }
        _ => None,
    }
}

fn return_not_null(contract: Contract) -> Contract {
    if contract.return_value().is_fail() {
        contract
    } else {
        contract.with_return_value(ContractReturnValue::NotNull)
    }
}
