//! Method contracts: parameter constraints paired with a guaranteed outcome.
//!
//! Contracts render in the conventional annotation syntax, one clause per
//! contract and clauses separated by `;`:
//!
//! ```text
//! null, _ -> fail; !null, true -> !null
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constraint::{ParameterConstraints, ValueConstraint};
use crate::error::CoreError;

/// What a method is guaranteed to do when a contract's constraints hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractReturnValue {
    /// The method throws (`fail`).
    Fail,
    /// The method returns a non-null value (`!null`).
    NotNull,
    /// The method returns null (`null`).
    Null,
    /// The method returns its receiver (`this`).
    This,
    /// The method returns the parameter at this zero-based index (`paramN`,
    /// one-based in text).
    Parameter(usize),
    /// The method returns this boolean constant.
    Boolean(bool),
}

impl ContractReturnValue {
    pub fn is_fail(self) -> bool {
        self == ContractReturnValue::Fail
    }

    /// Flips a boolean outcome. Every other outcome is not negatable.
    pub fn negate(self) -> Option<Self> {
        match self {
            ContractReturnValue::Boolean(b) => Some(ContractReturnValue::Boolean(!b)),
            _ => None,
        }
    }
}

impl fmt::Display for ContractReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractReturnValue::Fail => f.write_str("fail"),
            ContractReturnValue::NotNull => f.write_str("!null"),
            ContractReturnValue::Null => f.write_str("null"),
            ContractReturnValue::This => f.write_str("this"),
            ContractReturnValue::Parameter(index) => write!(f, "param{}", index + 1),
            ContractReturnValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl FromStr for ContractReturnValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token {
            "fail" => Ok(ContractReturnValue::Fail),
            "!null" => Ok(ContractReturnValue::NotNull),
            "null" => Ok(ContractReturnValue::Null),
            "this" => Ok(ContractReturnValue::This),
            "true" => Ok(ContractReturnValue::Boolean(true)),
            "false" => Ok(ContractReturnValue::Boolean(false)),
            _ => match token.strip_prefix("param").map(str::parse::<usize>) {
                Some(Ok(n)) if n > 0 => Ok(ContractReturnValue::Parameter(n - 1)),
                _ => Err(CoreError::UnknownReturnValue {
                    token: token.to_string(),
                }),
            },
        }
    }
}

/// A single contract clause.
///
/// Contracts are transient values: built during resolution and handed to the
/// caller, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    constraints: ParameterConstraints,
    return_value: ContractReturnValue,
}

impl Contract {
    pub fn new(constraints: ParameterConstraints, return_value: ContractReturnValue) -> Self {
        Contract {
            constraints,
            return_value,
        }
    }

    /// A contract that holds for any arguments of a `parameter_count`-ary method.
    pub fn unconditional(parameter_count: usize, return_value: ContractReturnValue) -> Self {
        Contract::new(ParameterConstraints::unconstrained(parameter_count), return_value)
    }

    pub fn constraints(&self) -> &ParameterConstraints {
        &self.constraints
    }

    pub fn return_value(&self) -> ContractReturnValue {
        self.return_value
    }

    pub fn parameter_count(&self) -> usize {
        self.constraints.len()
    }

    /// The constraint on parameter `index`, `AnyValue` past the end.
    pub fn parameter_constraint(&self, index: usize) -> ValueConstraint {
        self.constraints.get(index).unwrap_or(ValueConstraint::AnyValue)
    }

    pub fn with_return_value(&self, return_value: ContractReturnValue) -> Self {
        Contract::new(self.constraints.clone(), return_value)
    }

    /// The same constraints with the boolean outcome flipped, or `None` for a
    /// non-boolean outcome.
    pub fn negate(&self) -> Option<Self> {
        self.return_value
            .negate()
            .map(|rv| self.with_return_value(rv))
    }

    /// Returns `true` if some argument tuple satisfies both contracts.
    pub fn intersects(&self, other: &Contract) -> bool {
        self.constraints.intersects(&other.constraints)
    }

    /// Parses `;`-separated annotation text for a method with
    /// `parameter_count` parameters.
    ///
    /// Blank text yields no contracts.
    pub fn parse_clauses(text: &str, parameter_count: usize) -> Result<Vec<Contract>, CoreError> {
        text.split(';')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(|clause| -> Result<Contract, CoreError> {
                let contract: Contract = clause.parse()?;
                if contract.parameter_count() != parameter_count {
                    return Err(CoreError::ArityMismatch {
                        clause: clause.to_string(),
                        expected: parameter_count,
                        actual: contract.parameter_count(),
                    });
                }
                if let ContractReturnValue::Parameter(index) = contract.return_value {
                    if index >= parameter_count {
                        return Err(CoreError::ParameterOutOfRange {
                            index: index + 1,
                            count: parameter_count,
                        });
                    }
                }
                Ok(contract)
            })
            .collect()
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            write!(f, "-> {}", self.return_value)
        } else {
            write!(f, "{} -> {}", self.constraints, self.return_value)
        }
    }
}

impl FromStr for Contract {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lhs, rhs) = s.split_once("->").ok_or_else(|| CoreError::MalformedClause {
            clause: s.trim().to_string(),
            reason: "missing '->'".into(),
        })?;
        if rhs.trim().is_empty() {
            return Err(CoreError::MalformedClause {
                clause: s.trim().to_string(),
                reason: "missing return value".into(),
            });
        }
        let constraints = if lhs.trim().is_empty() {
            ParameterConstraints::unconstrained(0)
        } else {
            lhs.split(',')
                .map(str::parse::<ValueConstraint>)
                .collect::<Result<ParameterConstraints, _>>()?
        };
        Ok(Contract::new(constraints, rhs.parse()?))
    }
}

/// Renders a contract list in annotation syntax.
pub fn format_contracts(contracts: &[Contract]) -> String {
    contracts
        .iter()
        .map(Contract::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
