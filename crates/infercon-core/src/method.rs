//! Method signatures as seen by contract inference.
//!
//! Only the shape matters here: parameter count and whether the last
//! parameter is variadic. Types and annotations stay with the front end.

use serde::{Deserialize, Serialize};

use crate::expr::CallExpr;
use crate::id::MethodId;

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Unique identity for this method.
    pub id: MethodId,
    /// Method name.
    pub name: String,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// `true` if the last parameter is variadic.
    #[serde(default)]
    pub varargs: bool,
}

impl MethodDef {
    pub fn new(id: MethodId, name: impl Into<String>, params: Vec<String>) -> Self {
        MethodDef {
            id,
            name: name.into(),
            params,
            varargs: false,
        }
    }

    /// Marks the last parameter as variadic.
    pub fn variadic(mut self) -> Self {
        self.varargs = !self.params.is_empty();
        self
    }

    /// Returns the number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if `call` passes its trailing arguments through this
    /// method's variadic expansion.
    ///
    /// The front end flags expansions it has proven from argument types; a
    /// variadic target called with a different argument count than its
    /// parameter count is always an expansion.
    pub fn is_var_arg_call(&self, call: &CallExpr) -> bool {
        self.varargs && (call.var_args || call.arguments.len() != self.params.len())
    }
}
