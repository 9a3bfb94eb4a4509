//! Normalization of an ordered contract list into a non-intersecting set.
//!
//! Contract lists are ordered: when two clauses match the same arguments the
//! earlier one wins. Normalization keeps that meaning while removing the
//! overlaps a consumer would otherwise have to arbitrate.

use infercon_core::{Contract, ValueConstraint};

/// Normalizes `contracts`, processed in order.
///
/// - An exact duplicate, or a clause whose domain an earlier clause already
///   covers, is dropped.
/// - Overlapping clauses with the same outcome are both kept.
/// - A later clause with a different outcome whose domain strictly contains an
///   earlier one and differs from it in a single null/not-null slot is
///   narrowed to the complement of that slot.
/// - Any other overlap with a different outcome, or clauses of different
///   arity, is a conflict and yields `None`.
pub fn to_non_intersecting(contracts: Vec<Contract>) -> Option<Vec<Contract>> {
    let mut result: Vec<Contract> = Vec::with_capacity(contracts.len());

    'next: for mut contract in contracts {
        if result
            .first()
            .is_some_and(|first| first.parameter_count() != contract.parameter_count())
        {
            return None;
        }

        let mut i = 0;
        while i < result.len() {
            let earlier = &result[i];
            if !earlier.intersects(&contract) {
                i += 1;
                continue;
            }
            if earlier.constraints().covers(contract.constraints()) {
                continue 'next;
            }
            if earlier.return_value() == contract.return_value() {
                i += 1;
                continue;
            }
            contract = carve(&contract, earlier)?;
            // The narrowed clause must be checked against everything again.
            i = 0;
        }
        result.push(contract);
    }

    Some(result)
}

/// `later` minus the domain of `earlier`, when that is a single clause.
fn carve(later: &Contract, earlier: &Contract) -> Option<Contract> {
    if !later.constraints().covers(earlier.constraints()) {
        return None;
    }
    let mut differing = later
        .constraints()
        .iter()
        .zip(earlier.constraints().iter())
        .enumerate()
        .filter(|(_, (l, e))| l != e);
    let (slot, (_, excluded)) = differing.next()?;
    if differing.next().is_some() {
        return None;
    }
    match excluded {
        ValueConstraint::NullValue | ValueConstraint::NotNullValue => {
            let narrowed = later.constraints().replaced(slot, excluded.negate())?;
            Some(Contract::new(narrowed, later.return_value()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infercon_core::format_contracts;

    fn contracts(text: &str) -> Vec<Contract> {
        text.split(';').map(|c| c.parse().unwrap()).collect()
    }

    fn normalized(text: &str) -> Option<String> {
        to_non_intersecting(contracts(text)).map(|c| format_contracts(&c))
    }

    #[test]
    fn empty_and_single_lists_pass_through() {
        assert_eq!(to_non_intersecting(vec![]), Some(vec![]));
        assert_eq!(normalized("null -> fail").as_deref(), Some("null -> fail"));
    }

    #[test]
    fn disjoint_clauses_are_kept() {
        assert_eq!(
            normalized("null -> false; !null -> true").as_deref(),
            Some("null -> false; !null -> true")
        );
    }

    #[test]
    fn duplicates_and_shadowed_clauses_are_dropped() {
        assert_eq!(
            normalized("null -> fail; null -> fail").as_deref(),
            Some("null -> fail")
        );
        assert_eq!(
            normalized("_, null -> fail; !null, null -> true").as_deref(),
            Some("_, null -> fail")
        );
    }

    #[test]
    fn overlapping_clauses_with_same_outcome_are_kept() {
        assert_eq!(
            normalized("!null -> !null; _ -> !null").as_deref(),
            Some("!null -> !null; _ -> !null")
        );
    }

    #[test]
    fn broader_clause_after_null_check_is_narrowed() {
        assert_eq!(
            normalized("null -> fail; _ -> !null").as_deref(),
            Some("null -> fail; !null -> !null")
        );
        assert_eq!(
            normalized("_, !null -> false; _, _ -> true").as_deref(),
            Some("_, !null -> false; _, null -> true")
        );
    }

    #[test]
    fn narrowed_clause_is_rechecked() {
        // `_ -> !null` narrows to `!null -> !null`, which the second clause shadows.
        assert_eq!(
            normalized("null -> fail; !null -> !null; _ -> !null").as_deref(),
            Some("null -> fail; !null -> !null")
        );
    }

    #[test]
    fn partial_overlap_with_different_outcome_conflicts() {
        assert_eq!(normalized("null, _ -> fail; _, null -> true"), None);
    }

    #[test]
    fn uncarvable_containment_conflicts() {
        assert_eq!(normalized("null, null -> fail; _, _ -> !null"), None);
        assert_eq!(normalized("true -> false; _ -> true"), None);
    }

    #[test]
    fn mixed_arity_conflicts() {
        assert_eq!(normalized("null -> fail; _, _ -> !null"), None);
    }

    #[test]
    fn result_is_pairwise_non_intersecting_or_agreeing() {
        let out = to_non_intersecting(contracts(
            "null, _ -> fail; _, null -> fail; _, _ -> !null",
        ));
        // The last clause differs from each earlier one in one slot but cannot
        // be narrowed against both without a second clause.
        assert_eq!(out, None);

        let out = to_non_intersecting(contracts("null, _ -> fail; !null, null -> true; !null, !null -> false")).unwrap();
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                assert!(!a.intersects(b) || a.return_value() == b.return_value());
            }
        }
        assert_eq!(out.len(), 3);
    }
}
