//! YAML case files describing one pipe leg.

use crate::error::{CliError, CliResult};
use ff_boundary::{BoundaryConfig, FluidBoundary};
use ff_core::ids::LegId;
use ff_core::units::{k, kgpm3, m, mps, pa, pas};
use ff_network::{FlowLeg, PhaseVelocities};
use ff_thermo::{
    Component, FirstOrderReaction, IdealSolution, KValue, Phase, PhaseState, PhaseTransportData,
    SystemState,
};
use ff_transport::GeometryDefinition;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub name: String,
    pub components: Vec<ComponentDef>,
    /// Pressure [Pa]
    pub pressure: f64,
    pub gas: PhaseDef,
    pub liquid: PhaseDef,
    pub gas_fraction: f64,
    pub velocities: VelocityDef,
    pub pipe: PipeDef,
    #[serde(default = "default_leg_nodes")]
    pub nodes: usize,
    pub boundary: BoundaryDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<ReactionDef>,
    /// Flash every node to equilibrium before solving.
    #[serde(default)]
    pub equilibrate: bool,
}

fn default_leg_nodes() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    pub k_value: KValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseDef {
    /// Temperature [K]
    pub temperature: f64,
    pub mole_fractions: Vec<f64>,
    /// Overrides the model's built-in transport data for this phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportDef>,
}

/// Fixed transport data for one phase, SI units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransportDef {
    /// [kg/m³]
    pub density: f64,
    /// [Pa·s]
    pub viscosity: f64,
    /// [J/(kg·K)]
    pub heat_capacity: f64,
    /// [W/(m·K)]
    pub conductivity: f64,
    /// Diffusivity at `reference_temperature` [m²/s]
    pub diffusivity: f64,
    /// [K]
    pub reference_temperature: f64,
    #[serde(default)]
    pub diffusivity_exponent: f64,
}

impl From<TransportDef> for PhaseTransportData {
    fn from(t: TransportDef) -> Self {
        Self {
            density: kgpm3(t.density),
            viscosity: pas(t.viscosity),
            heat_capacity: t.heat_capacity,
            conductivity: t.conductivity,
            diffusivity: t.diffusivity,
            reference_temperature: t.reference_temperature,
            diffusivity_exponent: t.diffusivity_exponent,
        }
    }
}

/// Superficial velocities [m/s].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VelocityDef {
    pub gas: f64,
    pub liquid: f64,
}

/// Pipe dimensions [m].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PipeDef {
    pub diameter: f64,
    pub length: f64,
    #[serde(default)]
    pub roughness: f64,
    #[serde(default)]
    pub inlet_elevation: f64,
    #[serde(default)]
    pub outlet_elevation: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    Equilibrium,
    FiniteVolume,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub kind: BoundaryKind,
    #[serde(flatten)]
    pub config: BoundaryConfig,
}

/// First-order A → B reaction between component indices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReactionDef {
    pub reactant: usize,
    pub product: usize,
    /// [1/s]
    pub pre_exponential: f64,
    /// [J/mol]
    #[serde(default)]
    pub activation_energy: f64,
}

/// Everything needed to run a case.
pub struct Prepared {
    pub model: IdealSolution,
    pub leg: FlowLeg,
}

impl Case {
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn boundary(&self) -> CliResult<FluidBoundary> {
        let config = self.boundary.config;
        match (self.boundary.kind, &self.reaction) {
            (BoundaryKind::Equilibrium, None) => Ok(FluidBoundary::equilibrium(config.phase)),
            (BoundaryKind::Equilibrium, Some(_)) => Err(CliError::InvalidCase {
                what: "reactions need a finite_volume boundary".to_string(),
            }),
            (BoundaryKind::FiniteVolume, None) => Ok(FluidBoundary::finite_volume(config)),
            (BoundaryKind::FiniteVolume, Some(r)) => {
                if r.reactant >= self.components.len() || r.product >= self.components.len() {
                    return Err(CliError::InvalidCase {
                        what: "reaction component index out of range".to_string(),
                    });
                }
                let kinetics = FirstOrderReaction::new(
                    r.reactant,
                    r.product,
                    r.pre_exponential,
                    r.activation_energy,
                )?;
                Ok(FluidBoundary::reactive(config, Arc::new(kinetics)))
            }
        }
    }

    /// Build the thermo model and the leg described by this case.
    pub fn prepare(&self) -> CliResult<Prepared> {
        if self.nodes == 0 {
            return Err(CliError::InvalidCase {
                what: "nodes must be at least 1".to_string(),
            });
        }
        if self.boundary.config.discretization.nodes < 2 {
            return Err(CliError::InvalidCase {
                what: "boundary discretization needs at least 2 nodes".to_string(),
            });
        }
        let mut model = IdealSolution::new(
            self.components
                .iter()
                .map(|c| (Component::new(c.name.clone(), c.molar_mass), c.k_value))
                .collect(),
        )?;
        for (phase, def) in [(Phase::Gas, &self.gas), (Phase::Liquid, &self.liquid)] {
            if let Some(transport) = def.transport {
                model = model.with_phase_data(phase, transport.into());
            }
        }
        let components: Arc<[Component]> = self
            .components
            .iter()
            .map(|c| Component::new(c.name.clone(), c.molar_mass))
            .collect();

        let state = SystemState::new(
            components,
            pa(self.pressure),
            PhaseState::new(k(self.gas.temperature), self.gas.mole_fractions.clone())?,
            PhaseState::new(k(self.liquid.temperature), self.liquid.mole_fractions.clone())?,
            self.gas_fraction,
        )?;
        let geometry = GeometryDefinition::pipe(
            m(self.pipe.diameter),
            m(self.pipe.length),
            m(self.pipe.roughness),
        )?;
        let velocities = PhaseVelocities {
            gas: mps(self.velocities.gas),
            liquid: mps(self.velocities.liquid),
        };

        let leg = FlowLeg::new(
            LegId::from_index(0),
            Arc::new(geometry),
            state,
            velocities,
            self.boundary()?,
        )
        .with_node_count(self.nodes)
        .with_elevation(m(self.pipe.inlet_elevation), m(self.pipe.outlet_elevation));

        Ok(Prepared { model, leg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_boundary::Spacing;
    use ff_thermo::ThermoSystem;

    const ABSORBER: &str = include_str!("../cases/absorber.yaml");

    #[test]
    fn sample_case_parses() {
        let case = Case::from_yaml(ABSORBER).unwrap();
        assert_eq!(case.components.len(), 2);
        assert_eq!(case.boundary.kind, BoundaryKind::FiniteVolume);
        assert_eq!(case.boundary.config.phase, Phase::Liquid);
        assert_eq!(
            case.boundary.config.discretization.spacing,
            Spacing::Graded { ratio: 0.8 }
        );
        assert!(case.reaction.is_some());
        let prepared = case.prepare().unwrap();
        assert_eq!(prepared.leg.node_count(), case.nodes);
        assert_eq!(prepared.leg.boundary_template().kind(), "reactive finite-volume");
    }

    #[test]
    fn omitted_boundary_settings_use_defaults() {
        let yaml = ABSORBER
            .lines()
            .take_while(|l| !l.starts_with("reaction:"))
            .collect::<Vec<_>>()
            .join("\n")
            + "\nboundary:\n  kind: equilibrium\n";
        let case = Case::from_yaml(&yaml).unwrap();
        assert_eq!(case.boundary.config, BoundaryConfig::default());
        assert!(case.reaction.is_none());
        assert_eq!(case.prepare().unwrap().leg.boundary_template().kind(), "equilibrium");
    }

    #[test]
    fn phase_transport_overrides_reach_the_model() {
        let case = Case::from_yaml(ABSORBER).unwrap();
        let liquid = case.liquid.transport.unwrap();
        assert!(case.gas.transport.is_none());

        let prepared = case.prepare().unwrap();
        let props = prepared
            .model
            .phase_properties(Phase::Liquid, k(300.0), pa(2e5), &[0.5, 0.5])
            .unwrap();
        assert_eq!(props.conductivity, liquid.conductivity);
        assert_eq!(props.diffusivities[0], liquid.diffusivity);
        let gas = prepared
            .model
            .phase_properties(Phase::Gas, k(350.0), pa(2e5), &[0.1, 0.9])
            .unwrap();
        assert_eq!(gas.conductivity, PhaseTransportData::gas_default().conductivity);
    }

    #[test]
    fn reaction_on_equilibrium_boundary_is_rejected() {
        let mut case = Case::from_yaml(ABSORBER).unwrap();
        case.boundary.kind = BoundaryKind::Equilibrium;
        assert!(matches!(case.prepare(), Err(CliError::InvalidCase { .. })));
    }

    #[test]
    fn bad_state_is_reported() {
        let mut case = Case::from_yaml(ABSORBER).unwrap();
        case.gas.mole_fractions.pop();
        assert!(matches!(case.prepare(), Err(CliError::Thermo(_))));
    }
}
