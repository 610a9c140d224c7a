//! Flow node: one discretized control volume along a leg.

use crate::error::{NetworkError, NetworkResult};
use ff_boundary::{BoundaryContext, FluidBoundary, FluxVector};
use ff_core::ids::NodeId;
use ff_core::units::{Length, Velocity, k};
use ff_thermo::{Phase, PhaseProperties, PhaseState, SystemState, ThermoSystem};
use ff_transport::{
    CoefficientModel, FlowRegime, GeometryDefinition, GeometryProvider, InterphaseCoefficients,
    InterphaseTransportCoefficient, PhaseFlow,
};
use std::sync::Arc;
use tracing::debug;

/// Axial placement of a node within its leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSpan {
    /// Distance of the node center from the leg inlet
    pub position: Length,
    pub length: Length,
    pub elevation: Length,
}

/// Superficial velocities of both phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseVelocities {
    pub gas: Velocity,
    pub liquid: Velocity,
}

/// Local two-phase control volume.
///
/// Holds the local state, shares the leg geometry and resolves interphase
/// transport through its boundary strategy. Results of the last successful
/// solve (coefficients and flux) are committed together; a failed solve
/// leaves them as they were.
#[derive(Debug, Clone)]
pub struct FlowNode {
    id: NodeId,
    geometry: Arc<GeometryDefinition>,
    span: NodeSpan,
    state: SystemState,
    velocities: PhaseVelocities,
    coefficient_model: CoefficientModel,
    boundary: Option<FluidBoundary>,
    coefficients: Option<InterphaseCoefficients>,
    flux: Option<FluxVector>,
}

/// Phase properties and coefficients evaluated at the node state.
struct LocalTransport {
    gas: PhaseProperties,
    liquid: PhaseProperties,
    coefficients: InterphaseCoefficients,
}

impl FlowNode {
    /// New node without a boundary. The coefficient model follows the gas fraction.
    pub fn new(
        id: NodeId,
        geometry: Arc<GeometryDefinition>,
        span: NodeSpan,
        state: SystemState,
        velocities: PhaseVelocities,
    ) -> Self {
        let coefficient_model = CoefficientModel::for_gas_fraction(state.gas_fraction());
        Self {
            id,
            geometry,
            span,
            state,
            velocities,
            coefficient_model,
            boundary: None,
            coefficients: None,
            flux: None,
        }
    }

    pub fn with_boundary(mut self, boundary: FluidBoundary) -> Self {
        self.set_boundary(boundary);
        self
    }

    /// Replace the boundary strategy; the committed flux belongs to the old one.
    pub fn set_boundary(&mut self, boundary: FluidBoundary) {
        self.boundary = Some(boundary);
        self.flux = None;
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn geometry(&self) -> &Arc<GeometryDefinition> {
        &self.geometry
    }

    pub fn span(&self) -> &NodeSpan {
        &self.span
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Replace the local state. Committed results refer to the old state and are dropped.
    pub fn set_state(&mut self, state: SystemState) {
        self.coefficient_model = CoefficientModel::for_gas_fraction(state.gas_fraction());
        self.state = state;
        self.coefficients = None;
        self.flux = None;
        if let Some(boundary) = &mut self.boundary {
            *boundary = boundary.fresh_copy();
        }
    }

    pub fn velocities(&self) -> PhaseVelocities {
        self.velocities
    }

    pub fn coefficient_model(&self) -> &CoefficientModel {
        &self.coefficient_model
    }

    pub fn boundary(&self) -> Option<&FluidBoundary> {
        self.boundary.as_ref()
    }

    /// Coefficients of the last successful solve.
    pub fn coefficients(&self) -> Option<&InterphaseCoefficients> {
        self.coefficients.as_ref()
    }

    /// Flux of the last successful solve.
    pub fn flux(&self) -> Option<&FluxVector> {
        self.flux.as_ref()
    }

    pub fn num_components(&self) -> usize {
        self.state.num_components()
    }

    /// Node volume [m³].
    pub fn volume(&self) -> f64 {
        self.geometry.area().value * self.span.length.value
    }

    /// Interfacial area of the node [m²], from the last committed coefficients.
    pub fn interfacial_area(&self) -> Option<f64> {
        self.coefficients
            .as_ref()
            .map(|c| c.interfacial_area * self.volume())
    }

    fn phase_properties(
        &self,
        model: &dyn ThermoSystem,
        phase: Phase,
    ) -> NetworkResult<PhaseProperties> {
        let bulk = self.state.phase(phase);
        Ok(model.phase_properties(
            phase,
            bulk.temperature(),
            self.state.pressure(),
            bulk.mole_fractions(),
        )?)
    }

    fn local_transport(&self, model: &dyn ThermoSystem) -> NetworkResult<LocalTransport> {
        let gas = self.phase_properties(model, Phase::Gas)?;
        let liquid = self.phase_properties(model, Phase::Liquid)?;
        let regime = FlowRegime {
            geometry: self.geometry.as_ref(),
            gas_fraction: self.state.gas_fraction(),
            gas: PhaseFlow {
                superficial_velocity: self.velocities.gas,
                properties: &gas,
            },
            liquid: PhaseFlow {
                superficial_velocity: self.velocities.liquid,
                properties: &liquid,
            },
        };
        let coefficients = self.coefficient_model.coefficients(&regime)?;
        Ok(LocalTransport {
            gas,
            liquid,
            coefficients,
        })
    }

    /// Interphase coefficients at the current state. Does not modify the node.
    pub fn update_coefficients(
        &self,
        model: &dyn ThermoSystem,
    ) -> NetworkResult<InterphaseCoefficients> {
        Ok(self.local_transport(model)?.coefficients)
    }

    /// Recompute coefficients, solve the boundary and commit the results.
    pub fn solve(&mut self, model: &dyn ThermoSystem) -> NetworkResult<()> {
        let Some(boundary) = self.boundary.as_ref() else {
            return Err(NetworkError::InvalidConfiguration {
                what: "flow node has no boundary",
            });
        };
        let mut boundary = boundary.clone();
        let local = self.local_transport(model)?;
        let ctx = BoundaryContext {
            model,
            state: &self.state,
            coefficients: &local.coefficients,
            gas: &local.gas,
            liquid: &local.liquid,
        };
        boundary.solve(&ctx)?;
        let flux = boundary.calc_fluxes()?.clone();

        debug!(
            node = %self.id,
            boundary = boundary.kind(),
            correlation = self.coefficient_model.name(),
            energy_flux = flux.energy,
            "flow node solved"
        );
        self.boundary = Some(boundary);
        self.coefficients = Some(local.coefficients);
        self.flux = Some(flux);
        Ok(())
    }

    /// Solve and return the committed flux.
    pub fn calc_fluxes(&mut self, model: &dyn ThermoSystem) -> NetworkResult<&FluxVector> {
        self.solve(model)?;
        self.flux
            .as_ref()
            .ok_or(NetworkError::Boundary(ff_boundary::BoundaryError::Unsolved))
    }

    /// Bring the bulk phases to equilibrium.
    ///
    /// Mixes both phases into an overall molar composition at the
    /// heat-capacity-weighted mean temperature, flashes it and re-splits the
    /// phases. The gas volume fraction follows from the vapor fraction and the
    /// phase molar densities.
    pub fn equilibrate(&mut self, model: &dyn ThermoSystem) -> NetworkResult<()> {
        let gas_props = self.phase_properties(model, Phase::Gas)?;
        let liq_props = self.phase_properties(model, Phase::Liquid)?;
        let alpha = self.state.gas_fraction();
        let gas = self.state.phase(Phase::Gas);
        let liquid = self.state.phase(Phase::Liquid);

        let gas_moles = alpha * gas_props.molar_density;
        let liq_moles = (1.0 - alpha) * liq_props.molar_density;
        let overall: Vec<f64> = gas
            .mole_fractions()
            .iter()
            .zip(liquid.mole_fractions())
            .map(|(y, x)| (gas_moles * y + liq_moles * x) / (gas_moles + liq_moles))
            .collect();

        let gas_heat = alpha * gas_props.volumetric_heat_capacity();
        let liq_heat = (1.0 - alpha) * liq_props.volumetric_heat_capacity();
        let t = (gas_heat * gas.temperature().value + liq_heat * liquid.temperature().value)
            / (gas_heat + liq_heat);

        let flash = model.flash(k(t), self.state.pressure(), &overall)?;
        let beta = flash.vapor_fraction;
        let new_gas = PhaseState::new(k(t), flash.vapor)?;
        let new_liquid = PhaseState::new(k(t), flash.liquid)?;

        let c_gas = model
            .phase_properties(Phase::Gas, k(t), self.state.pressure(), new_gas.mole_fractions())?
            .molar_density;
        let c_liq = model
            .phase_properties(
                Phase::Liquid,
                k(t),
                self.state.pressure(),
                new_liquid.mole_fractions(),
            )?
            .molar_density;
        let gas_volume = beta / c_gas;
        let gas_fraction = gas_volume / (gas_volume + (1.0 - beta) / c_liq);

        let state = SystemState::new(
            self.state.components().clone(),
            self.state.pressure(),
            new_gas,
            new_liquid,
            gas_fraction.clamp(0.0, 1.0),
        )?;
        debug!(node = %self.id, t, vapor_fraction = beta, gas_fraction, "flow node equilibrated");
        self.set_state(state);
        Ok(())
    }

    /// Deep copy placed at a new id and span, with an unsolved boundary.
    pub fn replicate(&self, id: NodeId, span: NodeSpan) -> Self {
        Self {
            id,
            geometry: Arc::clone(&self.geometry),
            span,
            state: self.state.clone(),
            velocities: self.velocities,
            coefficient_model: self.coefficient_model,
            boundary: self.boundary.as_ref().map(FluidBoundary::fresh_copy),
            coefficients: None,
            flux: None,
        }
    }
}
