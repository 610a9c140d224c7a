//! Data-parallel node evaluation and leg-level transfer balance.

use crate::error::{NetworkError, NetworkResult};
use crate::node::FlowNode;
use ff_boundary::{BoundaryError, FluxVector};
use ff_thermo::ThermoSystem;
use rayon::prelude::*;
use tracing::debug;

/// Solve every node independently and collect their fluxes.
///
/// Nodes never touch each other, so the map runs across rayon's pool; the
/// collect is the barrier before any leg-level quantity is recomputed. A
/// failing node reports its error in place and keeps its previous results.
pub fn calc_fluxes_parallel(
    nodes: &mut [FlowNode],
    model: &dyn ThermoSystem,
) -> Vec<NetworkResult<FluxVector>> {
    let results: Vec<NetworkResult<FluxVector>> = nodes
        .par_iter_mut()
        .map(|node| node.calc_fluxes(model).cloned())
        .collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    debug!(nodes = nodes.len(), failed, "parallel flux evaluation");
    results
}

/// Interphase transfer rates summed over a leg.
///
/// Rates are flux times node interfacial area, positive from the reporting
/// phase's bulk toward the interface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegBalance {
    /// Component transfer rates [mol/s]
    pub components: Vec<f64>,
    /// Energy transfer rate [W]
    pub energy: f64,
    /// Total interfacial area [m²]
    pub interfacial_area: f64,
}

impl LegBalance {
    /// Sum the committed node fluxes. Every node must have been solved.
    pub fn from_nodes(nodes: &[FlowNode]) -> NetworkResult<Self> {
        let Some(first) = nodes.first() else {
            return Err(NetworkError::InvalidConfiguration {
                what: "leg balance needs at least one node",
            });
        };
        let nc = first.num_components();
        let mut balance = Self {
            components: vec![0.0; nc],
            energy: 0.0,
            interfacial_area: 0.0,
        };
        for node in nodes {
            let (Some(flux), Some(area)) = (node.flux(), node.interfacial_area()) else {
                return Err(BoundaryError::Unsolved.into());
            };
            if flux.num_components() != nc {
                return Err(NetworkError::InvalidConfiguration {
                    what: "nodes disagree on component count",
                });
            }
            for (total, n) in balance.components.iter_mut().zip(&flux.components) {
                *total += n * area;
            }
            balance.energy += flux.energy * area;
            balance.interfacial_area += area;
        }
        Ok(balance)
    }

    /// Net molar transfer rate [mol/s].
    pub fn total_molar(&self) -> f64 {
        self.components.iter().sum()
    }
}
