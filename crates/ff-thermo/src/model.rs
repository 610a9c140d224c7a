//! Thermodynamic system trait and property containers.

use crate::component::Component;
use crate::error::{ThermoError, ThermoResult};
use crate::state::Phase;
use ff_core::units::{
    Conductivity, Density, Diffusivity, DynVisc, MolarDensity, Pressure, SpecHeatCapacity,
    Temperature,
};

/// Transport and caloric properties of one phase at a given state.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseProperties {
    pub density: Density,
    pub viscosity: DynVisc,
    pub heat_capacity: SpecHeatCapacity,
    pub conductivity: Conductivity,
    pub molar_density: MolarDensity,
    /// Effective diffusivity of each component in the phase [m²/s]
    pub diffusivities: Vec<Diffusivity>,
}

impl PhaseProperties {
    /// ρ·cp [J/(m³·K)]
    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.density.value * self.heat_capacity
    }

    /// λ/(ρ·cp) [m²/s]
    pub fn thermal_diffusivity(&self) -> f64 {
        self.conductivity / self.volumetric_heat_capacity()
    }

    /// Pr = cp·μ/λ
    pub fn prandtl(&self) -> f64 {
        self.heat_capacity * self.viscosity.value / self.conductivity
    }

    /// Sc_k = μ/(ρ·D_k)
    pub fn schmidt(&self, component: usize) -> f64 {
        self.viscosity.value / (self.density.value * self.diffusivities[component])
    }

    /// Checks every property is positive and finite.
    pub fn validate(&self) -> ThermoResult<()> {
        let scalars = [
            self.density.value,
            self.viscosity.value,
            self.heat_capacity,
            self.conductivity,
            self.molar_density,
        ];
        if scalars
            .iter()
            .chain(self.diffusivities.iter())
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(ThermoError::NonPhysical {
                what: "phase properties must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Result of an isothermal flash.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashResult {
    /// Molar vapor fraction β ∈ [0, 1]
    pub vapor_fraction: f64,
    pub liquid: Vec<f64>,
    pub vapor: Vec<f64>,
    pub k_values: Vec<f64>,
}

/// Thermodynamic system consumed by the flow core.
///
/// Implementations must be thread-safe so nodes can be evaluated in parallel.
pub trait ThermoSystem: Send + Sync {
    /// Model name (for logging).
    fn name(&self) -> &str;

    fn components(&self) -> &[Component];

    fn num_components(&self) -> usize {
        self.components().len()
    }

    /// Equilibrium ratios K_k = y_k/x_k at temperature and pressure.
    fn k_values(&self, t: Temperature, p: Pressure) -> ThermoResult<Vec<f64>>;

    /// Isothermal flash of a feed composition.
    ///
    /// May fail with `ConvergenceFailed` when the embedded iteration runs out.
    fn flash(&self, t: Temperature, p: Pressure, feed: &[f64]) -> ThermoResult<FlashResult>;

    /// Transport properties of one phase at the given temperature, pressure and composition.
    fn phase_properties(
        &self,
        phase: Phase,
        t: Temperature,
        p: Pressure,
        mole_fractions: &[f64],
    ) -> ThermoResult<PhaseProperties>;
}
