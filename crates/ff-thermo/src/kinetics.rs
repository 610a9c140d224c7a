//! Chemical kinetics collaborator for the reactive boundary layer.

use crate::error::{ThermoError, ThermoResult};
use ff_core::units::Temperature;

/// Universal gas constant [J/(mol·K)]
pub const R_GAS: f64 = 8.314_462_618;

/// Source of per-component reaction rates.
///
/// Rates are expressed as the rate of change of each component's mole
/// fraction [1/s], positive for production.
pub trait ReactionKinetics: Send + Sync {
    fn name(&self) -> &str;

    fn reaction_rates(&self, mole_fractions: &[f64], t: Temperature) -> ThermoResult<Vec<f64>>;
}

/// Irreversible first-order reaction A → B with Arrhenius rate constant.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOrderReaction {
    reactant: usize,
    product: usize,
    /// Pre-exponential factor [1/s]
    pub pre_exponential: f64,
    /// Activation energy [J/mol]
    pub activation_energy: f64,
}

impl FirstOrderReaction {
    pub fn new(
        reactant: usize,
        product: usize,
        pre_exponential: f64,
        activation_energy: f64,
    ) -> ThermoResult<Self> {
        if reactant == product {
            return Err(ThermoError::InvalidArg {
                what: "reactant and product must differ",
            });
        }
        if !pre_exponential.is_finite() || pre_exponential < 0.0 || !activation_energy.is_finite()
        {
            return Err(ThermoError::NonPhysical {
                what: "rate constant parameters must be finite and non-negative",
            });
        }
        Ok(Self {
            reactant,
            product,
            pre_exponential,
            activation_energy,
        })
    }

    pub fn rate_constant(&self, t: Temperature) -> f64 {
        self.pre_exponential * (-self.activation_energy / (R_GAS * t.value)).exp()
    }
}

impl ReactionKinetics for FirstOrderReaction {
    fn name(&self) -> &str {
        "first-order"
    }

    fn reaction_rates(&self, mole_fractions: &[f64], t: Temperature) -> ThermoResult<Vec<f64>> {
        let n = mole_fractions.len();
        if self.reactant >= n || self.product >= n {
            return Err(ThermoError::InvalidArg {
                what: "reaction component index out of range",
            });
        }
        let rate = self.rate_constant(t) * mole_fractions[self.reactant];
        let mut rates = vec![0.0; n];
        rates[self.reactant] = -rate;
        rates[self.product] = rate;
        Ok(rates)
    }
}
