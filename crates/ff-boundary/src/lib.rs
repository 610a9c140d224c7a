//! ff-boundary: interphase heat and mass transfer at a flow node.
//!
//! Two strategies resolve the gas–liquid interface:
//! - [`EquilibriumBoundary`]: the interface is at instantaneous equilibrium and
//!   fluxes follow from film coefficients and the bulk–interface driving force
//! - [`FiniteVolumeBoundary`]: the film on one side of the interface is
//!   discretized into a [`FluidBoundarySystem`] and driven to steady state by
//!   the [`FluidBoundarySolver`], optionally with chemical reaction
//!
//! The reactive boundary layer is the same solver with a reaction-term
//! provider plugged in; there is no separate reactive code path.

pub mod boundary;
pub mod config;
pub mod context;
pub mod equilibrium;
pub mod error;
pub mod finite_volume;
pub mod flux;
pub mod solver;
pub mod system;

pub use boundary::FluidBoundary;
pub use config::{BoundaryConfig, DiscretizationConfig, SolverConfig, Spacing};
pub use context::BoundaryContext;
pub use equilibrium::{EquilibriumBoundary, InterfaceState, equilibrium_flux, estimate_interface};
pub use error::{BoundaryError, BoundaryResult};
pub use finite_volume::FiniteVolumeBoundary;
pub use flux::FluxVector;
pub use solver::{FluidBoundarySolver, SolveReport};
pub use system::{
    BoundaryLayerSpec, BoundaryNode, FilmProperties, FluidBoundarySystem, NodeState, SolveStatus,
};
