//! Borrowed view of a flow node handed to boundary strategies.

use ff_thermo::{Phase, PhaseProperties, SystemState, ThermoSystem};
use ff_transport::InterphaseCoefficients;

/// Node data a boundary needs for one solve.
///
/// Boundaries keep no reference to their node; the node lends this view for
/// the duration of a call.
#[derive(Clone, Copy)]
pub struct BoundaryContext<'a> {
    pub model: &'a dyn ThermoSystem,
    pub state: &'a SystemState,
    pub coefficients: &'a InterphaseCoefficients,
    pub gas: &'a PhaseProperties,
    pub liquid: &'a PhaseProperties,
}

impl<'a> BoundaryContext<'a> {
    pub fn properties(&self, phase: Phase) -> &'a PhaseProperties {
        match phase {
            Phase::Gas => self.gas,
            Phase::Liquid => self.liquid,
        }
    }

    pub fn num_components(&self) -> usize {
        self.state.num_components()
    }
}
