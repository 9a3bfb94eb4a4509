//! The value-constraint lattice and per-method parameter constraint arrays.
//!
//! [`ValueConstraint`] classifies the state of a single parameter. The domain
//! ordering is: `AnyValue` contains everything, `NotNullValue` contains
//! `TrueValue` and `FalseValue`, and `NullValue` is disjoint from every other
//! non-`AnyValue` state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::CoreError;

/// A classification of a parameter value imposed by a contract clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueConstraint {
    /// No restriction (`_`).
    AnyValue,
    /// The value is null (`null`).
    NullValue,
    /// The value is not null (`!null`).
    NotNullValue,
    /// The value is boolean `true`.
    TrueValue,
    /// The value is boolean `false`.
    FalseValue,
}

impl ValueConstraint {
    /// The complementary constraint. `AnyValue` has no complement and maps to
    /// itself.
    pub fn negate(self) -> Self {
        match self {
            ValueConstraint::AnyValue => ValueConstraint::AnyValue,
            ValueConstraint::NullValue => ValueConstraint::NotNullValue,
            ValueConstraint::NotNullValue => ValueConstraint::NullValue,
            ValueConstraint::TrueValue => ValueConstraint::FalseValue,
            ValueConstraint::FalseValue => ValueConstraint::TrueValue,
        }
    }

    /// Combines two requirements placed on the same parameter.
    ///
    /// Returns `None` when no value satisfies both.
    pub fn meet(self, other: Self) -> Option<Self> {
        use ValueConstraint::*;
        match (self, other) {
            (a, b) if a == b => Some(a),
            (AnyValue, x) | (x, AnyValue) => Some(x),
            (NotNullValue, x @ (TrueValue | FalseValue))
            | (x @ (TrueValue | FalseValue), NotNullValue) => Some(x),
            _ => None,
        }
    }

    /// Returns `true` if every value admitted by `other` is admitted by `self`.
    pub fn covers(self, other: Self) -> bool {
        self.meet(other) == Some(other)
    }

    /// Returns `true` for `AnyValue`.
    pub fn is_any(self) -> bool {
        self == ValueConstraint::AnyValue
    }

    fn token(self) -> &'static str {
        match self {
            ValueConstraint::AnyValue => "_",
            ValueConstraint::NullValue => "null",
            ValueConstraint::NotNullValue => "!null",
            ValueConstraint::TrueValue => "true",
            ValueConstraint::FalseValue => "false",
        }
    }
}

impl fmt::Display for ValueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ValueConstraint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "_" => Ok(ValueConstraint::AnyValue),
            "null" => Ok(ValueConstraint::NullValue),
            "!null" => Ok(ValueConstraint::NotNullValue),
            "true" => Ok(ValueConstraint::TrueValue),
            "false" => Ok(ValueConstraint::FalseValue),
            other => Err(CoreError::UnknownConstraint {
                token: other.to_string(),
            }),
        }
    }
}

/// One [`ValueConstraint`] per declared parameter, in declaration order.
///
/// Immutable once built: every combining operation returns a new array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterConstraints(SmallVec<[ValueConstraint; 4]>);

impl ParameterConstraints {
    /// An array of `count` `AnyValue` slots.
    pub fn unconstrained(count: usize) -> Self {
        ParameterConstraints(SmallVec::from_elem(ValueConstraint::AnyValue, count))
    }

    /// Number of slots (the method's parameter count).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a parameterless method.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The constraint at `index`, if the slot exists.
    pub fn get(&self, index: usize) -> Option<ValueConstraint> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ValueConstraint> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ValueConstraint] {
        &self.0
    }

    /// Returns `true` if every slot is `AnyValue`.
    pub fn is_unconstrained(&self) -> bool {
        self.0.iter().all(|c| c.is_any())
    }

    /// Adds a requirement on one slot, merging with whatever the slot already
    /// holds. Returns `None` on contradiction or an out-of-range index.
    pub fn with_constraint(&self, index: usize, constraint: ValueConstraint) -> Option<Self> {
        let current = self.get(index)?;
        let merged = current.meet(constraint)?;
        if merged == current {
            return Some(self.clone());
        }
        let mut copy = self.0.clone();
        copy[index] = merged;
        Some(ParameterConstraints(copy))
    }

    /// Overwrites one slot without merging.
    pub fn replaced(&self, index: usize, constraint: ValueConstraint) -> Option<Self> {
        let mut copy = self.0.clone();
        *copy.get_mut(index)? = constraint;
        Some(ParameterConstraints(copy))
    }

    /// The slot-wise meet of two arrays of equal length, or `None` when the
    /// domains are disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if self.len() != other.len() {
            return None;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.meet(*b))
            .collect::<Option<SmallVec<[ValueConstraint; 4]>>>()
            .map(ParameterConstraints)
    }

    /// Returns `true` if the two domains share at least one argument tuple.
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }

    /// Returns `true` if this domain contains every argument tuple of `other`.
    pub fn covers(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a.covers(*b))
    }
}

impl From<Vec<ValueConstraint>> for ParameterConstraints {
    fn from(v: Vec<ValueConstraint>) -> Self {
        ParameterConstraints(SmallVec::from_vec(v))
    }
}

impl FromIterator<ValueConstraint> for ParameterConstraints {
    fn from_iter<I: IntoIterator<Item = ValueConstraint>>(iter: I) -> Self {
        ParameterConstraints(iter.into_iter().collect())
    }
}

impl fmt::Display for ParameterConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
