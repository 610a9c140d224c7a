//! ff-core: numeric foundation for filmflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for flow nodes and legs)
//! - tdma (tridiagonal linear solver)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod tdma;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FfError, FfResult, LinalgError, LinalgResult};
pub use ids::*;
pub use numeric::*;
pub use tdma::{TdmaSolver, solve_tridiagonal};
pub use units::*;
