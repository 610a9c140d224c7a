//! Boundary strategy selection.

use crate::config::BoundaryConfig;
use crate::context::BoundaryContext;
use crate::equilibrium::EquilibriumBoundary;
use crate::error::BoundaryResult;
use crate::finite_volume::FiniteVolumeBoundary;
use crate::flux::FluxVector;
use crate::solver::SolveReport;
use ff_thermo::{Phase, ReactionKinetics};
use std::sync::Arc;

/// Interface model attached to a flow node.
#[derive(Debug, Clone)]
pub enum FluidBoundary {
    Equilibrium(EquilibriumBoundary),
    FiniteVolume(FiniteVolumeBoundary),
}

impl FluidBoundary {
    pub fn equilibrium(phase: Phase) -> Self {
        Self::Equilibrium(EquilibriumBoundary::new(phase))
    }

    pub fn finite_volume(config: BoundaryConfig) -> Self {
        Self::FiniteVolume(FiniteVolumeBoundary::new(config))
    }

    pub fn reactive(config: BoundaryConfig, kinetics: Arc<dyn ReactionKinetics>) -> Self {
        Self::FiniteVolume(FiniteVolumeBoundary::reactive(config, kinetics))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Equilibrium(_) => "equilibrium",
            Self::FiniteVolume(b) if b.is_reactive() => "reactive finite-volume",
            Self::FiniteVolume(_) => "finite-volume",
        }
    }

    /// Phase whose bulk the fluxes are reported for.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Equilibrium(b) => b.phase(),
            Self::FiniteVolume(b) => b.config().phase,
        }
    }

    pub fn solve(&mut self, ctx: &BoundaryContext<'_>) -> BoundaryResult<()> {
        match self {
            Self::Equilibrium(b) => b.solve(ctx),
            Self::FiniteVolume(b) => b.solve(ctx).map(|_| ()),
        }
    }

    /// Flux of the last successful solve.
    pub fn calc_fluxes(&self) -> BoundaryResult<&FluxVector> {
        match self {
            Self::Equilibrium(b) => b.calc_fluxes(),
            Self::FiniteVolume(b) => b.calc_fluxes(),
        }
    }

    /// Film solve report of the last successful solve; `None` at equilibrium.
    pub fn last_report(&self) -> Option<&SolveReport> {
        match self {
            Self::Equilibrium(_) => None,
            Self::FiniteVolume(b) => b.last_report(),
        }
    }

    /// Unsolved copy with the same configuration, for replicating onto new nodes.
    pub fn fresh_copy(&self) -> Self {
        match self {
            Self::Equilibrium(b) => Self::Equilibrium(b.fresh_copy()),
            Self::FiniteVolume(b) => Self::FiniteVolume(b.fresh_copy()),
        }
    }
}
