//! Boundary discretization and solver configuration.

use ff_core::tdma::DEFAULT_PIVOT_EPSILON;
use ff_thermo::Phase;

/// Spacing of boundary-layer nodes between bulk and interface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Spacing {
    Uniform,
    /// Consecutive cell widths shrink (ratio < 1) or grow (ratio > 1)
    /// geometrically from bulk toward the interface.
    Graded { ratio: f64 },
}

/// Spatial discretization of the film.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscretizationConfig {
    /// Number of nodes including bulk and interface (N ≥ 2)
    pub nodes: usize,
    pub spacing: Spacing,
}

impl Default for DiscretizationConfig {
    fn default() -> Self {
        Self {
            nodes: 10,
            spacing: Spacing::Uniform,
        }
    }
}

/// Boundary solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Max absolute interior update at convergence
    pub tolerance: f64,
    pub max_iterations: usize,
    /// TDMA pivot magnitude treated as singular
    pub pivot_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 200,
            pivot_epsilon: DEFAULT_PIVOT_EPSILON,
        }
    }
}

/// Configuration shared by both boundary strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundaryConfig {
    /// Phase whose film is resolved and whose bulk fluxes are reported.
    pub phase: Phase,
    pub discretization: DiscretizationConfig,
    pub solver: SolverConfig,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            phase: Phase::Liquid,
            discretization: DiscretizationConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}
