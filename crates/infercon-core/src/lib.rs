pub mod constraint;
pub mod contract;
pub mod error;
pub mod expr;
pub mod id;
pub mod method;

// Re-export commonly used types
pub use constraint::{ParameterConstraints, ValueConstraint};
pub use contract::{format_contracts, Contract, ContractReturnValue};
pub use error::CoreError;
pub use expr::{CallExpr, Expr, ExprKind, ExpressionRange, Literal, MethodBody, Symbol, TextRange};
pub use id::MethodId;
pub use method::MethodDef;
