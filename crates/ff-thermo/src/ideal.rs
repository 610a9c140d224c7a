//! Ideal-solution reference model.
//!
//! Raoult's law with Antoine vapor pressures (or fixed K-values), a
//! Rachford–Rice isothermal flash, and transport data that is fixed per phase
//! apart from a power-law temperature scaling of diffusivity. This is a
//! stand-in for a real property package, not an equation of state.

use crate::component::{Component, mixture_molar_mass};
use crate::error::{ThermoError, ThermoResult};
use crate::model::{FlashResult, PhaseProperties, ThermoSystem};
use crate::state::Phase;
use ff_core::units::{Density, DynVisc, Pressure, Temperature, kgpm3, pas};
use tracing::trace;

/// Equilibrium ratio model for one component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KValue {
    /// Constant K independent of temperature and pressure.
    Fixed(f64),
    /// Raoult's law with `ln(p_sat / Pa) = a - b / (T/K + c)`.
    Antoine { a: f64, b: f64, c: f64 },
}

impl KValue {
    pub fn evaluate(&self, t: Temperature, p: Pressure) -> f64 {
        match *self {
            KValue::Fixed(k) => k,
            KValue::Antoine { a, b, c } => (a - b / (t.value + c)).exp() / p.value,
        }
    }
}

/// Fixed transport data for one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTransportData {
    pub density: Density,
    pub viscosity: DynVisc,
    pub heat_capacity: f64,
    pub conductivity: f64,
    /// Diffusivity at `reference_temperature` [m²/s]
    pub diffusivity: f64,
    pub reference_temperature: f64,
    /// D(T) = D_ref·(T/T_ref)^n
    pub diffusivity_exponent: f64,
}

impl PhaseTransportData {
    /// Air-like gas near ambient conditions.
    pub fn gas_default() -> Self {
        Self {
            density: kgpm3(1.2),
            viscosity: pas(1.8e-5),
            heat_capacity: 1005.0,
            conductivity: 0.026,
            diffusivity: 2e-5,
            reference_temperature: 298.15,
            diffusivity_exponent: 1.75,
        }
    }

    /// Water-like liquid near ambient conditions.
    pub fn liquid_default() -> Self {
        Self {
            density: kgpm3(998.0),
            viscosity: pas(1e-3),
            heat_capacity: 4180.0,
            conductivity: 0.6,
            diffusivity: 2e-9,
            reference_temperature: 298.15,
            diffusivity_exponent: 1.0,
        }
    }

    fn diffusivity_at(&self, t: Temperature) -> f64 {
        self.diffusivity * (t.value / self.reference_temperature).powf(self.diffusivity_exponent)
    }
}

/// Ideal-solution thermodynamic system.
#[derive(Debug, Clone)]
pub struct IdealSolution {
    components: Vec<Component>,
    k_models: Vec<KValue>,
    gas: PhaseTransportData,
    liquid: PhaseTransportData,
    /// Iteration budget for the Rachford–Rice solve
    pub max_flash_iterations: usize,
}

impl IdealSolution {
    pub fn new(components: Vec<(Component, KValue)>) -> ThermoResult<Self> {
        if components.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "ideal solution needs at least one component",
            });
        }
        if components.iter().any(|(c, _)| !(c.molar_mass > 0.0)) {
            return Err(ThermoError::NonPhysical {
                what: "molar mass must be positive",
            });
        }
        let (components, k_models) = components.into_iter().unzip();
        Ok(Self {
            components,
            k_models,
            gas: PhaseTransportData::gas_default(),
            liquid: PhaseTransportData::liquid_default(),
            max_flash_iterations: 100,
        })
    }

    pub fn with_phase_data(mut self, phase: Phase, data: PhaseTransportData) -> Self {
        match phase {
            Phase::Gas => self.gas = data,
            Phase::Liquid => self.liquid = data,
        }
        self
    }

    fn phase_data(&self, phase: Phase) -> &PhaseTransportData {
        match phase {
            Phase::Gas => &self.gas,
            Phase::Liquid => &self.liquid,
        }
    }

    fn check_composition(&self, x: &[f64]) -> ThermoResult<()> {
        if x.len() != self.components.len() {
            return Err(ThermoError::InvalidArg {
                what: "composition length must match component count",
            });
        }
        if x.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "mole fractions must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Vapor fraction β solving Σ z(K−1)/(1+β(K−1)) = 0, clamped to [0, 1].
    fn rachford_rice(&self, z: &[f64], kv: &[f64]) -> ThermoResult<f64> {
        let g = |beta: f64| -> f64 {
            z.iter()
                .zip(kv)
                .map(|(zi, ki)| zi * (ki - 1.0) / (1.0 + beta * (ki - 1.0)))
                .sum()
        };
        let dg = |beta: f64| -> f64 {
            -z.iter()
                .zip(kv)
                .map(|(zi, ki)| zi * (ki - 1.0).powi(2) / (1.0 + beta * (ki - 1.0)).powi(2))
                .sum::<f64>()
        };

        if g(0.0) <= 0.0 {
            return Ok(0.0);
        }
        if g(1.0) >= 0.0 {
            return Ok(1.0);
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        let mut beta = 0.5;
        for iter in 0..self.max_flash_iterations {
            let val = g(beta);
            trace!(iter, beta, residual = val, "rachford-rice");
            if val.abs() < 1e-12 || hi - lo < 1e-14 {
                return Ok(beta);
            }
            if val > 0.0 {
                lo = beta;
            } else {
                hi = beta;
            }
            // Newton step, bisection when it leaves the bracket
            let newton = beta - val / dg(beta);
            beta = if newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
        }

        Err(ThermoError::ConvergenceFailed {
            what: "Rachford-Rice flash",
            iterations: self.max_flash_iterations,
        })
    }
}

fn normalized(mut v: Vec<f64>) -> ThermoResult<Vec<f64>> {
    let sum: f64 = v.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return Err(ThermoError::NonPhysical {
            what: "composition sums to zero or non-finite",
        });
    }
    v.iter_mut().for_each(|x| *x /= sum);
    Ok(v)
}

impl ThermoSystem for IdealSolution {
    fn name(&self) -> &str {
        "ideal-solution"
    }

    fn components(&self) -> &[Component] {
        &self.components
    }

    fn k_values(&self, t: Temperature, p: Pressure) -> ThermoResult<Vec<f64>> {
        if !(t.value > 0.0) || !(p.value > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "temperature and pressure must be positive",
            });
        }
        let kv: Vec<f64> = self.k_models.iter().map(|m| m.evaluate(t, p)).collect();
        if kv.iter().any(|k| !k.is_finite() || *k <= 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "K-values must be positive and finite",
            });
        }
        Ok(kv)
    }

    fn flash(&self, t: Temperature, p: Pressure, feed: &[f64]) -> ThermoResult<FlashResult> {
        self.check_composition(feed)?;
        let z = normalized(feed.to_vec())?;
        let kv = self.k_values(t, p)?;
        let beta = self.rachford_rice(&z, &kv)?;

        let liquid: Vec<f64> = z
            .iter()
            .zip(&kv)
            .map(|(zi, ki)| zi / (1.0 + beta * (ki - 1.0)))
            .collect();
        let vapor: Vec<f64> = liquid.iter().zip(&kv).map(|(xi, ki)| xi * ki).collect();

        Ok(FlashResult {
            vapor_fraction: beta,
            liquid: normalized(liquid)?,
            vapor: normalized(vapor)?,
            k_values: kv,
        })
    }

    fn phase_properties(
        &self,
        phase: Phase,
        t: Temperature,
        _p: Pressure,
        mole_fractions: &[f64],
    ) -> ThermoResult<PhaseProperties> {
        self.check_composition(mole_fractions)?;
        let data = self.phase_data(phase);
        let molar_mass = mixture_molar_mass(&self.components, mole_fractions);
        if !(molar_mass > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "mixture molar mass must be positive",
            });
        }
        let diffusivity = data.diffusivity_at(t);
        let props = PhaseProperties {
            density: data.density,
            viscosity: data.viscosity,
            heat_capacity: data.heat_capacity,
            conductivity: data.conductivity,
            molar_density: data.density.value / molar_mass,
            diffusivities: vec![diffusivity; self.components.len()],
        };
        props.validate()?;
        Ok(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::units::{k, pa};

    fn binary() -> IdealSolution {
        IdealSolution::new(vec![
            (Component::new("light", 0.030), KValue::Fixed(4.0)),
            (Component::new("heavy", 0.090), KValue::Fixed(0.25)),
        ])
        .unwrap()
    }

    #[test]
    fn two_phase_flash_satisfies_material_balance() {
        let model = binary();
        let z = [0.5, 0.5];
        let f = model.flash(k(300.0), pa(1e5), &z).unwrap();
        // Symmetric K-values around 1 give β = 0.5
        assert!((f.vapor_fraction - 0.5).abs() < 1e-10);
        for i in 0..2 {
            let zi = f.vapor_fraction * f.vapor[i] + (1.0 - f.vapor_fraction) * f.liquid[i];
            assert!((zi - z[i]).abs() < 1e-10);
            assert!((f.vapor[i] - f.k_values[i] * f.liquid[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn subcooled_feed_stays_liquid() {
        let model = IdealSolution::new(vec![
            (Component::new("a", 0.03), KValue::Fixed(0.5)),
            (Component::new("b", 0.09), KValue::Fixed(0.1)),
        ])
        .unwrap();
        let f = model.flash(k(300.0), pa(1e5), &[0.4, 0.6]).unwrap();
        assert_eq!(f.vapor_fraction, 0.0);
        assert!((f.liquid[0] - 0.4).abs() < 1e-15);
    }

    #[test]
    fn superheated_feed_is_vapor() {
        let model = IdealSolution::new(vec![
            (Component::new("a", 0.03), KValue::Fixed(5.0)),
            (Component::new("b", 0.09), KValue::Fixed(2.0)),
        ])
        .unwrap();
        let f = model.flash(k(300.0), pa(1e5), &[0.4, 0.6]).unwrap();
        assert_eq!(f.vapor_fraction, 1.0);
    }

    #[test]
    fn zero_iteration_budget_reports_convergence_failure() {
        let mut model = binary();
        model.max_flash_iterations = 0;
        let err = model.flash(k(300.0), pa(1e5), &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ThermoError::ConvergenceFailed { .. }));
    }

    #[test]
    fn antoine_k_value_scales_with_pressure() {
        // Water-like Antoine constants in Pa/K
        let kv = KValue::Antoine {
            a: 23.196,
            b: 3816.44,
            c: -46.13,
        };
        let k1 = kv.evaluate(k(373.15), pa(101_325.0));
        let k2 = kv.evaluate(k(373.15), pa(202_650.0));
        assert!((k1 - 1.0).abs() < 0.05, "K at normal boiling point = {k1}");
        assert!((k1 / k2 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn phase_properties_molar_density() {
        let model = binary();
        let props = model
            .phase_properties(Phase::Liquid, k(298.15), pa(1e5), &[0.5, 0.5])
            .unwrap();
        assert!((props.molar_density - 998.0 / 0.06).abs() < 1e-9);
        assert!((props.diffusivities[0] - 2e-9).abs() < 1e-20);
    }

    #[test]
    fn gas_diffusivity_grows_with_temperature() {
        let model = binary();
        let cold = model
            .phase_properties(Phase::Gas, k(298.15), pa(1e5), &[0.5, 0.5])
            .unwrap();
        let hot = model
            .phase_properties(Phase::Gas, k(400.0), pa(1e5), &[0.5, 0.5])
            .unwrap();
        assert!(hot.diffusivities[0] > cold.diffusivities[0]);
    }

    #[test]
    fn rejects_wrong_length_feed() {
        let model = binary();
        assert!(matches!(
            model.flash(k(300.0), pa(1e5), &[1.0]),
            Err(ThermoError::InvalidArg { .. })
        ));
    }
}
