//! Phase and two-phase system state.

use crate::component::Component;
use crate::error::{ThermoError, ThermoResult};
use ff_core::units::{Pressure, Temperature};
use std::sync::Arc;

/// Fluid phase at a flow node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    Gas,
    Liquid,
}

impl Phase {
    /// The phase on the other side of the interface.
    pub fn other(self) -> Self {
        match self {
            Phase::Gas => Phase::Liquid,
            Phase::Liquid => Phase::Gas,
        }
    }
}

/// Temperature and composition of one bulk phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    temperature: Temperature,
    mole_fractions: Vec<f64>,
}

impl PhaseState {
    /// Validates a positive finite temperature and finite, non-negative fractions.
    pub fn new(temperature: Temperature, mole_fractions: Vec<f64>) -> ThermoResult<Self> {
        let t = temperature.value;
        if !t.is_finite() || t <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if mole_fractions.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "mole fractions must be finite and non-negative",
            });
        }
        Ok(Self {
            temperature,
            mole_fractions,
        })
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn mole_fractions(&self) -> &[f64] {
        &self.mole_fractions
    }
}

/// Local two-phase state at a flow node: shared component list, pressure,
/// gas and liquid bulk phases, and the gas volume fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemState {
    components: Arc<[Component]>,
    pressure: Pressure,
    gas: PhaseState,
    liquid: PhaseState,
    gas_fraction: f64,
}

impl SystemState {
    pub fn new(
        components: Arc<[Component]>,
        pressure: Pressure,
        gas: PhaseState,
        liquid: PhaseState,
        gas_fraction: f64,
    ) -> ThermoResult<Self> {
        let p = pressure.value;
        if !p.is_finite() || p <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !(0.0..=1.0).contains(&gas_fraction) {
            return Err(ThermoError::NonPhysical {
                what: "gas fraction must lie in [0, 1]",
            });
        }
        let nc = components.len();
        if nc == 0 {
            return Err(ThermoError::InvalidArg {
                what: "system needs at least one component",
            });
        }
        if gas.mole_fractions.len() != nc || liquid.mole_fractions.len() != nc {
            return Err(ThermoError::InvalidArg {
                what: "phase composition length must match component count",
            });
        }
        Ok(Self {
            components,
            pressure,
            gas,
            liquid,
            gas_fraction,
        })
    }

    pub fn components(&self) -> &Arc<[Component]> {
        &self.components
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn gas_fraction(&self) -> f64 {
        self.gas_fraction
    }

    pub fn phase(&self, phase: Phase) -> &PhaseState {
        match phase {
            Phase::Gas => &self.gas,
            Phase::Liquid => &self.liquid,
        }
    }
}
