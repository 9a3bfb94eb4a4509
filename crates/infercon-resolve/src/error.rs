//! Errors raised while loading an inference session.
//!
//! Resolution itself has no error type; see the crate docs.

use infercon_core::{CoreError, MethodId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session JSON is malformed.
    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two methods share an id.
    #[error("duplicate method id {id}")]
    DuplicateMethod { id: MethodId },

    /// A method's declared contract text does not parse or fit its signature.
    #[error("invalid contract on method '{method}': {source}")]
    InvalidContract {
        method: String,
        #[source]
        source: CoreError,
    },
}
