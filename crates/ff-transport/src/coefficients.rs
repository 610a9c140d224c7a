//! Interphase transport coefficient correlations.

use crate::common::{EPSILON_PHASE_FRACTION, check_finite, check_positive};
use crate::correlations::{colburn_analogy, friction_factor, reynolds};
use crate::error::{TransportError, TransportResult};
use crate::regime::{FlowRegime, PhaseFlow};
use ff_thermo::Phase;

/// Coefficients on one side of the interface.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCoefficients {
    pub reynolds: f64,
    /// Darcy friction factor (including any interfacial enhancement)
    pub friction_factor: f64,
    /// Heat transfer coefficient [W/(m²·K)]
    pub heat_transfer: f64,
    /// Mass transfer coefficient per component [m/s]
    pub mass_transfer: Vec<f64>,
}

/// Coefficient set for both sides of the interface at one flow node.
#[derive(Debug, Clone, PartialEq)]
pub struct InterphaseCoefficients {
    pub gas: PhaseCoefficients,
    pub liquid: PhaseCoefficients,
    /// Interfacial area per unit volume [m²/m³]
    pub interfacial_area: f64,
}

impl InterphaseCoefficients {
    pub fn phase(&self, phase: Phase) -> &PhaseCoefficients {
        match phase {
            Phase::Gas => &self.gas,
            Phase::Liquid => &self.liquid,
        }
    }
}

/// Correlation producing interphase coefficients from a flow regime.
///
/// Implementations are pure, so they are safe to call from parallel node updates.
pub trait InterphaseTransportCoefficient: Send + Sync {
    fn name(&self) -> &str;

    fn coefficients(&self, regime: &FlowRegime<'_>) -> TransportResult<InterphaseCoefficients>;
}

/// Coefficients for one phase flowing with `velocity` through a channel of
/// hydraulic diameter `d_h`.
fn phase_coefficients(
    flow: &PhaseFlow<'_>,
    velocity: f64,
    d_h: f64,
    relative_roughness: f64,
    friction_multiplier: f64,
) -> TransportResult<PhaseCoefficients> {
    let props = flow.properties;
    check_positive(d_h, "hydraulic diameter")?;
    check_finite(velocity, "phase velocity")?;
    props
        .validate()
        .map_err(|_| TransportError::NonPhysical {
            what: "phase properties",
        })?;

    let re = reynolds(props.density.value, velocity, d_h, props.viscosity.value);
    check_finite(re, "Reynolds number")?;

    let f = friction_factor(re, relative_roughness) * friction_multiplier;
    let nu = colburn_analogy(f, re, props.prandtl());
    let heat_transfer = nu * props.conductivity / d_h;
    check_finite(heat_transfer, "heat transfer coefficient")?;

    let mut mass_transfer = Vec::with_capacity(props.diffusivities.len());
    for (i, d) in props.diffusivities.iter().enumerate() {
        let sh = colburn_analogy(f, re, props.schmidt(i));
        let k = sh * d / d_h;
        check_finite(k, "mass transfer coefficient")?;
        mass_transfer.push(k);
    }

    Ok(PhaseCoefficients {
        reynolds: re,
        friction_factor: f,
        heat_transfer,
        mass_transfer,
    })
}

fn check_components(regime: &FlowRegime<'_>) -> TransportResult<()> {
    if regime.gas.properties.diffusivities.len() != regime.liquid.properties.diffusivities.len() {
        return Err(TransportError::InvalidArg {
            what: "gas and liquid diffusivity vectors differ in length",
        });
    }
    if !(0.0..=1.0).contains(&regime.gas_fraction) {
        return Err(TransportError::NonPhysical {
            what: "gas fraction outside [0, 1]",
        });
    }
    Ok(())
}

/// One-phase pipe correlation: each phase sees the full pipe diameter at its
/// superficial velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnePhasePipe;

impl InterphaseTransportCoefficient for OnePhasePipe {
    fn name(&self) -> &str {
        "one-phase pipe"
    }

    fn coefficients(&self, regime: &FlowRegime<'_>) -> TransportResult<InterphaseCoefficients> {
        check_components(regime)?;
        let d = regime.geometry.hydraulic_diameter().value;
        let eps = regime.geometry.relative_roughness();

        let gas = phase_coefficients(
            &regime.gas,
            regime.gas.superficial_velocity.value,
            d,
            eps,
            1.0,
        )?;
        let liquid = phase_coefficients(
            &regime.liquid,
            regime.liquid.superficial_velocity.value,
            d,
            eps,
            1.0,
        )?;

        Ok(InterphaseCoefficients {
            gas,
            liquid,
            interfacial_area: 4.0 / d,
        })
    }
}

/// Two-phase annular-flow correlation.
///
/// Phases move at their actual velocities (superficial / phase fraction).
/// The liquid film uses hydraulic diameter D(1−α) and the gas core D√α. Gas
/// friction is enhanced by the Wallis interfacial factor 1 + C·δ/D with film
/// thickness δ = D(1−√α)/2.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoPhasePipe {
    pub wallis_coefficient: f64,
}

impl Default for TwoPhasePipe {
    fn default() -> Self {
        Self {
            wallis_coefficient: 300.0,
        }
    }
}

impl InterphaseTransportCoefficient for TwoPhasePipe {
    fn name(&self) -> &str {
        "two-phase pipe"
    }

    fn coefficients(&self, regime: &FlowRegime<'_>) -> TransportResult<InterphaseCoefficients> {
        check_components(regime)?;
        let alpha = regime.phase_fraction(Phase::Gas);
        if alpha <= EPSILON_PHASE_FRACTION || alpha >= 1.0 - EPSILON_PHASE_FRACTION {
            return Err(TransportError::InvalidArg {
                what: "two-phase correlation requires 0 < gas fraction < 1",
            });
        }
        let d = regime.geometry.hydraulic_diameter().value;
        let eps = regime.geometry.relative_roughness();
        let sqrt_alpha = alpha.sqrt();

        let film_thickness = 0.5 * d * (1.0 - sqrt_alpha);
        let wallis = 1.0 + self.wallis_coefficient * film_thickness / d;

        let gas = phase_coefficients(
            &regime.gas,
            regime.gas.superficial_velocity.value / alpha,
            d * sqrt_alpha,
            eps,
            wallis,
        )?;
        let liquid = phase_coefficients(
            &regime.liquid,
            regime.liquid.superficial_velocity.value / regime.phase_fraction(Phase::Liquid),
            d * regime.phase_fraction(Phase::Liquid),
            eps,
            1.0,
        )?;

        Ok(InterphaseCoefficients {
            gas,
            liquid,
            interfacial_area: 4.0 * sqrt_alpha / d,
        })
    }
}

/// Correlation selected for a flow node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CoefficientModel {
    OnePhase(OnePhasePipe),
    TwoPhase(TwoPhasePipe),
}

impl CoefficientModel {
    /// Two-phase correlation when both phases are present, one-phase otherwise.
    pub fn for_gas_fraction(gas_fraction: f64) -> Self {
        if gas_fraction > EPSILON_PHASE_FRACTION && gas_fraction < 1.0 - EPSILON_PHASE_FRACTION {
            CoefficientModel::TwoPhase(TwoPhasePipe::default())
        } else {
            CoefficientModel::OnePhase(OnePhasePipe)
        }
    }
}

impl InterphaseTransportCoefficient for CoefficientModel {
    fn name(&self) -> &str {
        match self {
            CoefficientModel::OnePhase(c) => c.name(),
            CoefficientModel::TwoPhase(c) => c.name(),
        }
    }

    fn coefficients(&self, regime: &FlowRegime<'_>) -> TransportResult<InterphaseCoefficients> {
        match self {
            CoefficientModel::OnePhase(c) => c.coefficients(regime),
            CoefficientModel::TwoPhase(c) => c.coefficients(regime),
        }
    }
}
