//! ff-network: flow nodes and legs.
//!
//! A [`FlowLeg`] partitions a pipe into [`FlowNode`]s. Each node holds its
//! local two-phase state and one [`ff_boundary::FluidBoundary`] strategy and
//! resolves interphase transport on `solve`. Nodes are independent, so a leg's
//! nodes can be evaluated in parallel with [`calc_fluxes_parallel`] before the
//! leg-level [`LegBalance`] is formed.

pub mod error;
pub mod leg;
pub mod node;
pub mod parallel;

pub use error::{NetworkError, NetworkResult};
pub use leg::{FlowLeg, PipeLeg};
pub use node::{FlowNode, NodeSpan, PhaseVelocities};
pub use parallel::{LegBalance, calc_fluxes_parallel};
