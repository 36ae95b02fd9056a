//! fc-core: stable foundation for the fuzzy car controller.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - ids (typed arena handles for variables, terms and rule blocks)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FcError, FcResult};
pub use ids::*;
pub use numeric::*;
