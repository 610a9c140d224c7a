//! ff-transport: flow geometry and interphase transport coefficients.
//!
//! - `GeometryDefinition` describes a pipe cross-section, length and wall roughness
//! - `InterphaseTransportCoefficient` turns a local flow regime into friction,
//!   heat- and mass-transfer coefficients
//!
//! One-phase and two-phase pipe correlations differ only in the correlation
//! choice; both return the same `InterphaseCoefficients` structure, so the
//! boundary strategies never need to know which one produced it.

pub mod coefficients;
pub mod common;
pub mod correlations;
pub mod error;
pub mod geometry;
pub mod regime;

pub use coefficients::{
    CoefficientModel, InterphaseCoefficients, InterphaseTransportCoefficient, OnePhasePipe,
    PhaseCoefficients, TwoPhasePipe,
};
pub use error::{TransportError, TransportResult};
pub use geometry::{GeometryDefinition, GeometryProvider};
pub use regime::{FlowRegime, PhaseFlow};
