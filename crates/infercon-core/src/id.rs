//! Stable ID newtypes for analyzed entities.
//!
//! Methods are identified by a `u32` newtype so that a method identity cannot be
//! confused with a parameter index or a text offset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Method identity within an inference session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodId(pub u32);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
