//! Resolution of pre-contracts into concrete method contracts.
//!
//! The body scanner (external) records [`PreContract`] descriptors while it
//! walks a method. Later, given the method body and the contracts of already
//! analyzed callees, a [`Resolver`] turns each descriptor into zero or more
//! [`Contract`](infercon_core::Contract)s. Resolution never fails: anything
//! unresolvable, ambiguous or side-effecting simply yields fewer contracts.

pub mod context;
pub mod delegation;
pub mod error;
pub mod normalize;
pub mod precontract;
pub mod resolver;
pub mod session;

pub use context::{BodyAccessor, InferenceContext, ResolveConfig};
pub use error::SessionError;
pub use normalize::to_non_intersecting;
pub use precontract::PreContract;
pub use resolver::Resolver;
pub use session::InferenceSession;
