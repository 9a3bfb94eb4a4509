//! A minimal syntactic expression model and range-based expression locator.
//!
//! The front end hands contract inference a [`MethodBody`] snapshot. Every
//! node carries the [`TextRange`] it was parsed from; an [`ExpressionRange`]
//! remembers a range and finds the node again in a later snapshot of the same
//! body. Nothing here evaluates expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::MethodId;

/// Half-open byte range `[start, end)` in the method's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub const fn new(start: u32, end: u32) -> Self {
        TextRange { start, end }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A locator for one expression node, stable across body snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpressionRange(TextRange);

impl ExpressionRange {
    pub const fn new(start: u32, end: u32) -> Self {
        ExpressionRange(TextRange::new(start, end))
    }

    pub fn of(expr: &Expr) -> Self {
        ExpressionRange(expr.range)
    }

    pub fn range(&self) -> TextRange {
        self.0
    }

    /// Finds the node with exactly this range in `body`.
    pub fn restore<'b>(&self, body: &'b MethodBody) -> Option<&'b Expr> {
        body.find(self.0)
    }
}

impl fmt::Display for ExpressionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A literal token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
}

/// What a simple name resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// The parameter at `index` of `method`.
    Parameter { method: MethodId, index: usize },
    Local(String),
    Field(String),
}

/// A method call. `target` is `None` when the front end could not resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub name: String,
    #[serde(default)]
    pub target: Option<MethodId>,
    #[serde(default)]
    pub receiver: Option<Box<Expr>>,
    #[serde(default)]
    pub arguments: Vec<Expr>,
    /// Set when the front end proved the trailing arguments go through
    /// variadic expansion.
    #[serde(default)]
    pub var_args: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    Literal(Literal),
    Reference {
        name: String,
        #[serde(default)]
        qualifier: Option<Box<Expr>>,
        #[serde(default)]
        symbol: Option<Symbol>,
    },
    Parenthesized(Box<Expr>),
    Call(CallExpr),
    /// Object or array construction.
    New {
        #[serde(default)]
        arguments: Vec<Expr>,
    },
    /// Binary and polyadic operator chains, string concatenation included.
    Polyadic {
        operator: String,
        operands: Vec<Expr>,
    },
    /// Lambda or method reference.
    Function,
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Anything else the front end does not model.
    Other {
        #[serde(default)]
        children: Vec<Expr>,
    },
}

/// One expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub range: TextRange,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(range: TextRange, kind: ExprKind) -> Self {
        Expr { range, kind }
    }

    pub fn literal(range: TextRange, literal: Literal) -> Self {
        Expr::new(range, ExprKind::Literal(literal))
    }

    /// An unqualified reference to parameter `index` of `method`.
    pub fn parameter(range: TextRange, name: impl Into<String>, method: MethodId, index: usize) -> Self {
        Expr::new(
            range,
            ExprKind::Reference {
                name: name.into(),
                qualifier: None,
                symbol: Some(Symbol::Parameter { method, index }),
            },
        )
    }

    pub fn parenthesized(range: TextRange, inner: Expr) -> Self {
        Expr::new(range, ExprKind::Parenthesized(Box::new(inner)))
    }

    pub fn call(range: TextRange, call: CallExpr) -> Self {
        Expr::new(range, ExprKind::Call(call))
    }

    /// Direct subexpressions in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Function => Vec::new(),
            ExprKind::Reference { qualifier, .. } => qualifier.iter().map(|q| q.as_ref()).collect(),
            ExprKind::Parenthesized(inner) => vec![inner.as_ref()],
            ExprKind::Call(call) => call
                .receiver
                .iter()
                .map(|r| r.as_ref())
                .chain(call.arguments.iter())
                .collect(),
            ExprKind::New { arguments } => arguments.iter().collect(),
            ExprKind::Polyadic { operands, .. } => operands.iter().collect(),
            ExprKind::Assignment { target, value } => vec![target.as_ref(), value.as_ref()],
            ExprKind::Other { children } => children.iter().collect(),
        }
    }

    /// Depth-first, pre-order search for the node with exactly `range`.
    pub fn find(&self, range: TextRange) -> Option<&Expr> {
        if self.range == range {
            return Some(self);
        }
        if range.start < self.range.start || range.end > self.range.end {
            return None;
        }
        self.children().into_iter().find_map(|child| child.find(range))
    }

    /// Unwraps one level of parentheses, if present.
    pub fn skip_parenthesized(&self) -> &Expr {
        match &self.kind {
            ExprKind::Parenthesized(inner) => inner.as_ref(),
            _ => self,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// The parameter index this expression names, if it is a bare, unqualified
    /// reference to a parameter of `method`.
    pub fn parameter_index(&self, method: MethodId) -> Option<usize> {
        match &self.kind {
            ExprKind::Reference {
                qualifier: None,
                symbol: Some(Symbol::Parameter { method: owner, index }),
                ..
            } if *owner == method => Some(*index),
            _ => None,
        }
    }
}

/// A snapshot of one method's body: its top-level expressions in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodBody {
    #[serde(default)]
    pub expressions: Vec<Expr>,
}

impl MethodBody {
    pub fn new(expressions: Vec<Expr>) -> Self {
        MethodBody { expressions }
    }

    /// The first node, in source order, whose range is exactly `range`.
    pub fn find(&self, range: TextRange) -> Option<&Expr> {
        self.expressions.iter().find_map(|e| e.find(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: u32, end: u32) -> TextRange {
        TextRange::new(start, end)
    }

    /// `return target((x));` with the call spanning 7..18.
    fn sample_body() -> MethodBody {
        let arg = Expr::parenthesized(r(14, 17), Expr::parameter(r(15, 16), "x", MethodId(1), 0));
        let call = CallExpr {
            name: "target".into(),
            target: Some(MethodId(2)),
            receiver: None,
            arguments: vec![arg],
            var_args: false,
        };
        MethodBody::new(vec![Expr::call(r(7, 18), call)])
    }

    #[test]
    fn restore_finds_nested_nodes() {
        let body = sample_body();
        let call = ExpressionRange::new(7, 18).restore(&body).unwrap();
        assert_eq!(call.as_call().unwrap().name, "target");

        let param = ExpressionRange::new(15, 16).restore(&body).unwrap();
        assert_eq!(param.parameter_index(MethodId(1)), Some(0));
    }

    #[test]
    fn restore_misses_unknown_range() {
        let body = sample_body();
        assert!(ExpressionRange::new(7, 17).restore(&body).is_none());
        assert!(ExpressionRange::new(30, 40).restore(&body).is_none());
        assert!(ExpressionRange::new(0, 1).restore(&MethodBody::default()).is_none());
    }

    #[test]
    fn skip_parenthesized_unwraps_one_level() {
        let inner = Expr::literal(r(2, 6), Literal::Null);
        let twice = Expr::parenthesized(r(0, 8), Expr::parenthesized(r(1, 7), inner.clone()));
        let once = twice.skip_parenthesized();
        assert_eq!(once.range, r(1, 7));
        assert_eq!(once.skip_parenthesized(), &inner);
    }

    #[test]
    fn parameter_index_requires_owner_and_no_qualifier() {
        let own = Expr::parameter(r(0, 1), "x", MethodId(1), 0);
        assert_eq!(own.parameter_index(MethodId(1)), Some(0));
        assert_eq!(own.parameter_index(MethodId(9)), None);

        let qualified = Expr::new(
            r(0, 6),
            ExprKind::Reference {
                name: "x".into(),
                qualifier: Some(Box::new(Expr::new(r(0, 4), ExprKind::Other { children: vec![] }))),
                symbol: Some(Symbol::Parameter { method: MethodId(1), index: 0 }),
            },
        );
        assert_eq!(qualified.parameter_index(MethodId(1)), None);
    }

    #[test]
    fn body_deserializes_from_json() {
        let json = serde_json::json!({
            "expressions": [{
                "range": {"start": 0, "end": 9},
                "kind": {"call": {
                    "name": "check",
                    "target": 4,
                    "arguments": [
                        {"range": {"start": 6, "end": 8}, "kind": {"literal": "null"}}
                    ]
                }}
            }]
        });
        let body: MethodBody = serde_json::from_value(json).unwrap();
        let call = body.expressions[0].as_call().unwrap();
        assert_eq!(call.target, Some(MethodId(4)));
        assert_eq!(call.arguments[0].kind, ExprKind::Literal(Literal::Null));
        assert!(!call.var_args);
    }
}
