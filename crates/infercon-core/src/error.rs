//! Core error types for infercon-core.
//!
//! Uses `thiserror` for structured, matchable error variants. These only cover
//! the surfaces that read external input (contract text, signatures); the
//! resolution engine itself never fails, it produces fewer contracts.

use thiserror::Error;

/// Core errors produced by the infercon-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A constraint token in contract text was not recognized.
    #[error("unknown value constraint: '{token}'")]
    UnknownConstraint { token: String },

    /// A return-value token in contract text was not recognized.
    #[error("unknown contract return value: '{token}'")]
    UnknownReturnValue { token: String },

    /// A contract clause is missing its `->` separator or has an empty side.
    #[error("malformed contract clause '{clause}': {reason}")]
    MalformedClause { clause: String, reason: String },

    /// A contract clause constrains a different number of parameters than
    /// the method declares.
    #[error("contract '{clause}' has {actual} parameter constraint(s), method declares {expected}")]
    ArityMismatch {
        clause: String,
        expected: usize,
        actual: usize,
    },

    /// A `paramN` return value refers to a parameter the method does not have.
    #[error("return value refers to parameter {index}, method declares {count}")]
    ParameterOutOfRange { index: usize, count: usize },
}
