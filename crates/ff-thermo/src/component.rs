//! Chemical component definition.

/// A chemical component known to a thermodynamic system.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub name: String,
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
}

impl Component {
    pub fn new(name: impl Into<String>, molar_mass: f64) -> Self {
        Self {
            name: name.into(),
            molar_mass,
        }
    }
}

/// Mixture molar mass [kg/mol] for the given mole fractions.
pub fn mixture_molar_mass(components: &[Component], mole_fractions: &[f64]) -> f64 {
    components
        .iter()
        .zip(mole_fractions)
        .map(|(c, x)| c.molar_mass * x)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixture_molar_mass_weights_fractions() {
        let comps = [Component::new("a", 0.002), Component::new("b", 0.032)];
        let mm = mixture_molar_mass(&comps, &[0.5, 0.5]);
        assert!((mm - 0.017).abs() < 1e-15);
    }
}
