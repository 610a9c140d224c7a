//! Local flow regime handed to coefficient correlations.

use crate::geometry::GeometryProvider;
use ff_core::units::Velocity;
use ff_thermo::{Phase, PhaseProperties};

/// Flow of one phase: superficial velocity plus its local properties.
#[derive(Debug, Clone, Copy)]
pub struct PhaseFlow<'a> {
    pub superficial_velocity: Velocity,
    pub properties: &'a PhaseProperties,
}

/// Everything a correlation needs about a flow node.
#[derive(Clone, Copy)]
pub struct FlowRegime<'a> {
    pub geometry: &'a dyn GeometryProvider,
    /// Gas volume fraction α
    pub gas_fraction: f64,
    pub gas: PhaseFlow<'a>,
    pub liquid: PhaseFlow<'a>,
}

impl FlowRegime<'_> {
    /// Volume fraction occupied by `phase`.
    pub fn phase_fraction(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Gas => self.gas_fraction,
            Phase::Liquid => 1.0 - self.gas_fraction,
        }
    }
}
