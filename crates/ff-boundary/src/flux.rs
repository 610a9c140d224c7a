//! Interface flux vector.

/// Fluxes from a phase's bulk toward the interface.
///
/// Component fluxes are molar [mol/(m²·s)], the energy flux is [W/m²].
/// Positive values leave the reporting phase's bulk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FluxVector {
    pub components: Vec<f64>,
    pub energy: f64,
}

impl FluxVector {
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Total molar flux Σ N_k.
    pub fn total_molar(&self) -> f64 {
        self.components.iter().sum()
    }

    /// Flat layout: component fluxes followed by the energy flux.
    pub fn as_vec(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(self.components.len() + 1);
        v.extend_from_slice(&self.components);
        v.push(self.energy);
        v
    }
}
