//! Finite-volume boundary strategy.

use crate::config::BoundaryConfig;
use crate::context::BoundaryContext;
use crate::equilibrium::{equilibrium_flux, estimate_interface};
use crate::error::{BoundaryError, BoundaryResult};
use crate::flux::FluxVector;
use crate::solver::{FluidBoundarySolver, SolveReport};
use crate::system::{BoundaryLayerSpec, FluidBoundarySystem};
use ff_thermo::ReactionKinetics;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Boundary that resolves the film of the configured phase on a grid.
///
/// Each solve seeds a fresh [`FluidBoundarySystem`] from the equilibrium
/// interface estimate and drives it to steady state. With kinetics attached
/// the system is reactive.
#[derive(Clone)]
pub struct FiniteVolumeBoundary {
    config: BoundaryConfig,
    kinetics: Option<Arc<dyn ReactionKinetics>>,
    system: Option<FluidBoundarySystem>,
    flux: Option<FluxVector>,
    last_report: Option<SolveReport>,
}

impl fmt::Debug for FiniteVolumeBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteVolumeBoundary")
            .field("config", &self.config)
            .field("kinetics", &self.kinetics.as_ref().map(|k| k.name()))
            .field("solved", &self.system.is_some())
            .finish()
    }
}

impl FiniteVolumeBoundary {
    pub fn new(config: BoundaryConfig) -> Self {
        Self {
            config,
            kinetics: None,
            system: None,
            flux: None,
            last_report: None,
        }
    }

    pub fn reactive(config: BoundaryConfig, kinetics: Arc<dyn ReactionKinetics>) -> Self {
        Self {
            kinetics: Some(kinetics),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    pub fn is_reactive(&self) -> bool {
        self.kinetics.is_some()
    }

    /// Build and solve the boundary-layer system for the node in `ctx`.
    ///
    /// The previous system and flux are replaced only when the new solve
    /// converges.
    pub fn solve(&mut self, ctx: &BoundaryContext<'_>) -> BoundaryResult<&SolveReport> {
        let phase = self.config.phase;
        let interface = estimate_interface(ctx)?;
        let estimate = equilibrium_flux(ctx, &interface, phase);
        let spec = BoundaryLayerSpec::from_interface(phase, ctx, &interface, &estimate)?;

        let kinetics = self.kinetics.as_deref();
        let mut system =
            FluidBoundarySystem::create(spec, &self.config.discretization, kinetics)?;
        let report = FluidBoundarySolver::new(self.config.solver)
            .with_reactions(kinetics)
            .solve(&mut system)?;
        let flux = system.interface_flux();

        debug!(
            ?phase,
            iterations = report.iterations,
            film_thickness = system.film().thickness,
            energy_flux = flux.energy,
            "finite-volume boundary solved"
        );
        self.system = Some(system);
        self.flux = Some(flux);
        Ok(self.last_report.insert(report))
    }

    pub fn calc_fluxes(&self) -> BoundaryResult<&FluxVector> {
        self.flux.as_ref().ok_or(BoundaryError::Unsolved)
    }

    /// The last converged system.
    pub fn system(&self) -> Option<&FluidBoundarySystem> {
        self.system.as_ref()
    }

    pub fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    /// Same configuration and kinetics, no solved state.
    pub fn fresh_copy(&self) -> Self {
        Self {
            config: self.config,
            kinetics: self.kinetics.clone(),
            system: None,
            flux: None,
            last_report: None,
        }
    }
}
