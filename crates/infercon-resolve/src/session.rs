//! An in-memory inference session loadable from JSON.
//!
//! A session is a flat list of methods: their signatures, declared contract
//! text, nullability and purity facts, and for methods with a body, the
//! descriptors the body scanner recorded. [`InferenceSession::infer_all`]
//! resolves methods in declaration order, so a method can only delegate to
//! methods declared before it. Declared contracts always take precedence over
//! inferred ones.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use infercon_core::{Contract, Expr, ExprKind, MethodBody, MethodDef, MethodId};

use crate::context::{InferenceContext, ResolveConfig};
use crate::error::SessionError;
use crate::precontract::PreContract;
use crate::resolver::Resolver;

/// One method as written in a session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntry {
    #[serde(flatten)]
    pub def: MethodDef,
    /// Declared contract text, e.g. `"null -> fail; _ -> !null"`.
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default)]
    pub never_null: bool,
    /// The method has no observable side effects.
    #[serde(default)]
    pub pure: bool,
    #[serde(default)]
    pub body: Option<MethodBody>,
    #[serde(default)]
    pub pre_contracts: Vec<PreContract>,
}

#[derive(Debug, Deserialize)]
struct SessionFile {
    methods: Vec<MethodEntry>,
}

/// Methods keyed by id, in declaration order, with declared contracts parsed.
#[derive(Debug, Clone, Default)]
pub struct InferenceSession {
    methods: IndexMap<MethodId, MethodEntry>,
    declared: IndexMap<MethodId, Vec<Contract>>,
}

impl InferenceSession {
    /// Builds a session, parsing and validating declared contract text.
    pub fn new(entries: Vec<MethodEntry>) -> Result<Self, SessionError> {
        let mut session = InferenceSession::default();
        for entry in entries {
            let id = entry.def.id;
            if session.methods.contains_key(&id) {
                return Err(SessionError::DuplicateMethod { id });
            }
            if let Some(text) = &entry.contract {
                let contracts = Contract::parse_clauses(text, entry.def.arity()).map_err(|source| {
                    SessionError::InvalidContract {
                        method: entry.def.name.clone(),
                        source,
                    }
                })?;
                session.declared.insert(id, contracts);
            }
            session.methods.insert(id, entry);
        }
        Ok(session)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let file: SessionFile = serde_json::from_str(json)?;
        InferenceSession::new(file.methods)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        InferenceSession::from_json(&json)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodEntry> {
        self.methods.values()
    }

    pub fn method_by_name(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.values().find(|entry| entry.def.name == name)
    }

    /// Contracts for every method, in declaration order.
    ///
    /// A method gets its declared contracts if it has any, otherwise the
    /// contracts inferred from its body, otherwise none.
    pub fn infer_all(&self, config: ResolveConfig) -> IndexMap<MethodId, Vec<Contract>> {
        let mut resolved: IndexMap<MethodId, Vec<Contract>> = IndexMap::new();
        for (id, entry) in &self.methods {
            let contracts = match (self.declared.get(id), &entry.body) {
                (Some(declared), _) => declared.clone(),
                (None, Some(body)) => {
                    let view = SessionView {
                        session: self,
                        resolved: &resolved,
                    };
                    let accessor = || Some(body);
                    let inferred = Resolver::with_config(&view, config).infer(&entry.def, &entry.pre_contracts, &accessor);
                    debug!(method = %entry.def.name, count = inferred.len(), "inferred contracts");
                    inferred
                }
                (None, None) => Vec::new(),
            };
            resolved.insert(*id, contracts);
        }
        resolved
    }

    fn may_have_side_effects(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Function => false,
            ExprKind::Reference { qualifier, .. } => qualifier
                .as_deref()
                .is_some_and(|q| self.may_have_side_effects(q)),
            ExprKind::Assignment { .. } | ExprKind::New { .. } => true,
            ExprKind::Call(call) => {
                let pure = call
                    .target
                    .and_then(|id| self.methods.get(&id))
                    .is_some_and(|entry| entry.pure);
                !pure || expr.children().into_iter().any(|child| self.may_have_side_effects(child))
            }
            ExprKind::Parenthesized(_) | ExprKind::Polyadic { .. } | ExprKind::Other { .. } => {
                expr.children().into_iter().any(|child| self.may_have_side_effects(child))
            }
        }
    }
}

/// The session as seen while inferring one method: registry lookups only see
/// declared contracts and methods already resolved.
struct SessionView<'s> {
    session: &'s InferenceSession,
    resolved: &'s IndexMap<MethodId, Vec<Contract>>,
}

impl InferenceContext for SessionView<'_> {
    fn method(&self, id: MethodId) -> Option<&MethodDef> {
        self.session.methods.get(&id).map(|entry| &entry.def)
    }

    fn method_contracts(&self, id: MethodId) -> Vec<Contract> {
        self.session
            .declared
            .get(&id)
            .or_else(|| self.resolved.get(&id))
            .cloned()
            .unwrap_or_default()
    }

    fn is_never_null(&self, id: MethodId) -> bool {
        self.session.methods.get(&id).is_some_and(|entry| entry.never_null)
    }

    fn may_have_side_effects(&self, expr: &Expr) -> bool {
        self.session.may_have_side_effects(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infercon_core::{CallExpr, TextRange};

    fn entry(id: u32, name: &str, params: &[&str]) -> MethodEntry {
        MethodEntry {
            def: MethodDef::new(MethodId(id), name, params.iter().map(|p| p.to_string()).collect()),
            contract: None,
            never_null: false,
            pure: false,
            body: None,
            pre_contracts: Vec::new(),
        }
    }

    fn call_expr(target: Option<u32>, arguments: Vec<Expr>) -> Expr {
        Expr::call(
            TextRange::new(0, 10),
            CallExpr {
                name: "f".into(),
                target: target.map(MethodId),
                receiver: None,
                arguments,
                var_args: false,
            },
        )
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = InferenceSession::new(vec![entry(1, "a", &[]), entry(1, "b", &[])]).unwrap_err();
        assert!(matches!(err, SessionError::DuplicateMethod { id: MethodId(1) }));
    }

    #[test]
    fn invalid_declared_contract_is_rejected() {
        let mut bad = entry(1, "check", &["x"]);
        bad.contract = Some("null, null -> fail".into());
        let err = InferenceSession::new(vec![bad]).unwrap_err();
        assert!(matches!(err, SessionError::InvalidContract { ref method, .. } if method == "check"));
    }

    #[test]
    fn side_effects_follow_purity() {
        let mut pure = entry(1, "len", &["s"]);
        pure.pure = true;
        let session = InferenceSession::new(vec![pure, entry(2, "log", &["s"])]).unwrap();
        let arg = Expr::literal(TextRange::new(2, 4), infercon_core::Literal::Int(1));

        assert!(!session.may_have_side_effects(&call_expr(Some(1), vec![arg.clone()])));
        assert!(session.may_have_side_effects(&call_expr(Some(2), vec![arg.clone()])));
        assert!(session.may_have_side_effects(&call_expr(None, vec![arg.clone()])));
        assert!(session.may_have_side_effects(&call_expr(Some(1), vec![call_expr(Some(2), vec![])])));
        assert!(!session.may_have_side_effects(&arg));
        assert!(session.may_have_side_effects(&Expr::new(TextRange::new(0, 3), ExprKind::New { arguments: vec![] })));
    }

    #[test]
    fn declared_contracts_take_precedence() {
        let mut m = entry(1, "m", &["x"]);
        m.contract = Some("null -> fail".into());
        m.body = Some(MethodBody::default());
        m.pre_contracts = vec![PreContract::Known("_ -> !null".parse().unwrap())];
        let session = InferenceSession::new(vec![m]).unwrap();
        let all = session.infer_all(ResolveConfig::default());
        assert_eq!(all[&MethodId(1)], vec!["null -> fail".parse::<Contract>().unwrap()]);
    }

    #[test]
    fn from_json_reads_flattened_signature() {
        let json = r#"{
            "methods": [
                {"id": 1, "name": "requireNonNull", "params": ["obj"], "contract": "null -> fail", "never_null": true},
                {"id": 2, "name": "format", "params": ["fmt", "args"], "varargs": true}
            ]
        }"#;
        let session = InferenceSession::from_json(json).unwrap();
        let format = session.method_by_name("format").unwrap();
        assert!(format.def.varargs);
        assert!(session.method_by_name("requireNonNull").unwrap().never_null);
        assert_eq!(session.methods().count(), 2);
    }
}
