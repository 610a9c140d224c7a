//! Finite-volume boundary-layer system.
//!
//! The film between the bulk of one phase (node 0) and the interface
//! (node N-1) is split into N ordered nodes. Node 0 is pinned to the bulk
//! state; nodes 1..N-1 are the unknowns. At the interface the film couples to
//! the far side through a Robin condition
//! `(D/Δz)·(φ_{N-2} − φ_{N-1}) = k_int·(φ_{N-1} − φ*)`, where `φ*` is the
//! far-side bulk mapped through equilibrium.

use crate::config::{DiscretizationConfig, Spacing};
use crate::context::BoundaryContext;
use crate::equilibrium::InterfaceState;
use crate::error::{BoundaryError, BoundaryResult};
use crate::flux::FluxVector;
use ff_core::numeric::lerp;
use ff_core::units::k;
use ff_thermo::{Phase, ReactionKinetics};

/// Composition and temperature at one point of the film.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub composition: Vec<f64>,
    /// Temperature [K]
    pub temperature: f64,
}

/// One boundary-layer control volume.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryNode {
    /// Distance from the bulk node [m]
    pub position: f64,
    pub composition: Vec<f64>,
    /// Temperature [K]
    pub temperature: f64,
}

/// Transport data of the resolved film.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmProperties {
    /// Film thickness [m]
    pub thickness: f64,
    /// Component diffusivities at `reference_temperature` [m²/s]
    pub diffusivities: Vec<f64>,
    pub reference_temperature: f64,
    /// D(T) = D_ref·(T/T_ref)^n
    pub diffusivity_exponent: f64,
    /// Thermal diffusivity [m²/s]
    pub thermal_diffusivity: f64,
    /// Film-normal convective velocity, positive toward the interface [m/s]
    pub convective_velocity: f64,
    /// Robin coefficient per component at the interface [m/s]
    pub interfacial_mass_transfer: Vec<f64>,
    /// Robin coefficient for temperature at the interface [m/s]
    pub interfacial_heat_transfer: f64,
    /// Molar density [mol/m³]
    pub molar_density: f64,
    /// ρ·cp [J/(m³·K)]
    pub volumetric_heat_capacity: f64,
}

impl FilmProperties {
    pub fn diffusivity(&self, component: usize, temperature: f64) -> f64 {
        self.diffusivities[component]
            * (temperature / self.reference_temperature).powf(self.diffusivity_exponent)
    }
}

/// Everything needed to create a boundary-layer system.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayerSpec {
    pub bulk: NodeState,
    /// Interface state used to initialize the profile
    pub interface_estimate: NodeState,
    /// Far-side values `φ*` and `T*` of the Robin interface condition
    pub far_side: NodeState,
    pub film: FilmProperties,
}

impl BoundaryLayerSpec {
    /// Spec for the film of `phase`, seeded by an equilibrium interface estimate.
    ///
    /// Film thickness follows film theory, δ = mean(D_k/k_k). The far side is
    /// the opposite phase's bulk mapped through the interface K-values, and the
    /// convective velocity is the net molar flux of `estimate_flux` divided by
    /// the film's molar density.
    pub fn from_interface(
        phase: Phase,
        ctx: &BoundaryContext<'_>,
        interface: &InterfaceState,
        estimate_flux: &FluxVector,
    ) -> BoundaryResult<Self> {
        let nc = ctx.num_components();
        let other = phase.other();
        let props = ctx.properties(phase);
        let other_props = ctx.properties(other);
        let coef = ctx.coefficients.phase(phase);
        let other_coef = ctx.coefficients.phase(other);
        let bulk = ctx.state.phase(phase);
        let far = ctx.state.phase(other);

        if props.diffusivities.len() != nc
            || coef.mass_transfer.len() != nc
            || other_coef.mass_transfer.len() != nc
            || interface.k_values.len() != nc
        {
            return Err(BoundaryError::InvalidConfiguration {
                what: "film data does not match component count",
            });
        }

        let thickness = props
            .diffusivities
            .iter()
            .zip(&coef.mass_transfer)
            .map(|(d, kc)| d / kc)
            .sum::<f64>()
            / nc as f64;

        let kv = &interface.k_values;
        let ratio = other_props.molar_density / props.molar_density;
        let (far_composition, interfacial_mass_transfer): (Vec<f64>, Vec<f64>) = (0..nc)
            .map(|c| {
                let far_x = far.mole_fractions()[c];
                let k_other = other_coef.mass_transfer[c];
                match phase {
                    Phase::Gas => (kv[c] * far_x, ratio * k_other / kv[c]),
                    Phase::Liquid => (far_x / kv[c], ratio * k_other * kv[c]),
                }
            })
            .unzip();

        let t_bulk = bulk.temperature().value;
        let diffusivity_exponent =
            fitted_diffusivity_exponent(ctx, phase, t_bulk, interface, &props.diffusivities)?;

        Ok(Self {
            bulk: NodeState {
                composition: bulk.mole_fractions().to_vec(),
                temperature: t_bulk,
            },
            interface_estimate: NodeState {
                composition: interface.composition(phase).to_vec(),
                temperature: interface.temperature,
            },
            far_side: NodeState {
                composition: far_composition,
                temperature: far.temperature().value,
            },
            film: FilmProperties {
                thickness,
                diffusivities: props.diffusivities.clone(),
                reference_temperature: t_bulk,
                diffusivity_exponent,
                thermal_diffusivity: props.thermal_diffusivity(),
                convective_velocity: estimate_flux.total_molar() / props.molar_density,
                interfacial_mass_transfer,
                interfacial_heat_transfer: other_coef.heat_transfer
                    / props.volumetric_heat_capacity(),
                molar_density: props.molar_density,
                volumetric_heat_capacity: props.volumetric_heat_capacity(),
            },
        })
    }
}

/// Power-law exponent of the thermo system's diffusivity between the bulk
/// and interface temperatures (0 when they coincide).
fn fitted_diffusivity_exponent(
    ctx: &BoundaryContext<'_>,
    phase: Phase,
    t_bulk: f64,
    interface: &InterfaceState,
    bulk_diffusivities: &[f64],
) -> BoundaryResult<f64> {
    let log_t = (interface.temperature / t_bulk).ln();
    if log_t.abs() < 1e-9 {
        return Ok(0.0);
    }
    let at_interface = ctx.model.phase_properties(
        phase,
        k(interface.temperature),
        ctx.state.pressure(),
        interface.composition(phase),
    )?;
    let mean_log_ratio = at_interface
        .diffusivities
        .iter()
        .zip(bulk_diffusivities)
        .map(|(di, db)| (di / db).ln())
        .sum::<f64>()
        / bulk_diffusivities.len() as f64;
    Ok(mean_log_ratio / log_t)
}

/// Solve state of a boundary-layer system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Unsolved,
    Converged { iterations: usize },
    Failed { iterations: usize },
}

/// Ordered boundary-layer nodes from bulk (node 0) to interface (node N-1).
#[derive(Debug, Clone, PartialEq)]
pub struct FluidBoundarySystem {
    nodes: Vec<BoundaryNode>,
    far_side: NodeState,
    film: FilmProperties,
    reaction_rates: Option<Vec<Vec<f64>>>,
    status: SolveStatus,
}

fn invalid(what: &'static str) -> BoundaryError {
    BoundaryError::InvalidConfiguration { what }
}

fn all_finite(v: &[f64]) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Node positions from 0 (bulk) to `thickness` (interface).
pub(crate) fn grid_positions(
    nodes: usize,
    thickness: f64,
    spacing: Spacing,
) -> BoundaryResult<Vec<f64>> {
    let cells = nodes - 1;
    let widths: Vec<f64> = match spacing {
        Spacing::Graded { ratio } if !ratio.is_finite() || ratio <= 0.0 => {
            return Err(invalid("grading ratio must be positive and finite"));
        }
        Spacing::Graded { ratio } if (ratio - 1.0).abs() > 1e-12 => {
            let first = thickness * (1.0 - ratio) / (1.0 - ratio.powi(cells as i32));
            (0..cells).map(|j| first * ratio.powi(j as i32)).collect()
        }
        Spacing::Graded { .. } | Spacing::Uniform => vec![thickness / cells as f64; cells],
    };

    let mut positions = Vec::with_capacity(nodes);
    positions.push(0.0);
    let mut z = 0.0;
    for w in &widths[..cells - 1] {
        z += w;
        positions.push(z);
    }
    positions.push(thickness);
    if !all_finite(&positions) || positions.windows(2).any(|p| p[1] <= p[0]) {
        return Err(invalid("grid spacing collapses adjacent nodes"));
    }
    Ok(positions)
}

impl FluidBoundarySystem {
    /// Discretize the film and initialize the profile.
    ///
    /// Node 0 is an exact copy of the bulk state; the other nodes interpolate
    /// linearly (by position) between bulk and the interface estimate. With a
    /// kinetics provider the system is reactive and stores per-node rates.
    pub fn create(
        spec: BoundaryLayerSpec,
        discretization: &DiscretizationConfig,
        kinetics: Option<&dyn ReactionKinetics>,
    ) -> BoundaryResult<Self> {
        let BoundaryLayerSpec {
            bulk,
            interface_estimate,
            far_side,
            film,
        } = spec;
        Self::validate(&bulk, &interface_estimate, &far_side, &film, discretization)?;

        let positions =
            grid_positions(discretization.nodes, film.thickness, discretization.spacing)?;

        let nodes: Vec<BoundaryNode> = positions
            .iter()
            .enumerate()
            .map(|(i, &z)| {
                if i == 0 {
                    return BoundaryNode {
                        position: 0.0,
                        composition: bulk.composition.clone(),
                        temperature: bulk.temperature,
                    };
                }
                let s = z / film.thickness;
                BoundaryNode {
                    position: z,
                    composition: bulk
                        .composition
                        .iter()
                        .zip(&interface_estimate.composition)
                        .map(|(b, e)| lerp(*b, *e, s))
                        .collect(),
                    temperature: lerp(bulk.temperature, interface_estimate.temperature, s),
                }
            })
            .collect();

        let reaction_rates = match kinetics {
            Some(kinetics) => {
                let rates = evaluate_rates(kinetics, &nodes)?;
                if !rates_finite(&rates) {
                    return Err(invalid("reaction rates must be finite"));
                }
                Some(rates)
            }
            None => None,
        };

        Ok(Self {
            nodes,
            far_side,
            film,
            reaction_rates,
            status: SolveStatus::Unsolved,
        })
    }

    fn validate(
        bulk: &NodeState,
        estimate: &NodeState,
        far_side: &NodeState,
        film: &FilmProperties,
        discretization: &DiscretizationConfig,
    ) -> BoundaryResult<()> {
        if discretization.nodes < 2 {
            return Err(invalid("boundary layer needs at least 2 nodes"));
        }
        let nc = bulk.composition.len();
        if nc == 0 {
            return Err(invalid("boundary layer needs at least one component"));
        }
        if estimate.composition.len() != nc
            || far_side.composition.len() != nc
            || film.diffusivities.len() != nc
            || film.interfacial_mass_transfer.len() != nc
        {
            return Err(invalid("component vector lengths differ"));
        }
        if !(film.thickness > 0.0) || !film.thickness.is_finite() {
            return Err(invalid("film thickness must be positive and finite"));
        }
        for state in [bulk, estimate, far_side] {
            if !all_finite(&state.composition) {
                return Err(invalid("compositions must be finite"));
            }
            if !(state.temperature > 0.0) || !state.temperature.is_finite() {
                return Err(invalid("temperatures must be positive and finite"));
            }
        }
        let positive = film
            .diffusivities
            .iter()
            .chain([
                &film.thermal_diffusivity,
                &film.molar_density,
                &film.volumetric_heat_capacity,
                &film.reference_temperature,
            ])
            .all(|v| v.is_finite() && *v > 0.0);
        if !positive {
            return Err(invalid("film transport properties must be positive"));
        }
        let non_negative = film
            .interfacial_mass_transfer
            .iter()
            .chain([&film.interfacial_heat_transfer])
            .all(|v| v.is_finite() && *v >= 0.0);
        if !non_negative
            || !film.convective_velocity.is_finite()
            || !film.diffusivity_exponent.is_finite()
        {
            return Err(invalid("interfacial coefficients must be finite and non-negative"));
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[BoundaryNode] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_components(&self) -> usize {
        self.nodes[0].composition.len()
    }

    /// Node 0, pinned to the bulk state.
    pub fn bulk(&self) -> &BoundaryNode {
        &self.nodes[0]
    }

    /// Node N-1.
    pub fn interface(&self) -> &BoundaryNode {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn far_side(&self) -> &NodeState {
        &self.far_side
    }

    pub fn film(&self) -> &FilmProperties {
        &self.film
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_reactive(&self) -> bool {
        self.reaction_rates.is_some()
    }

    /// Per-node reaction rates of the reactive variant.
    pub fn reaction_rates(&self) -> Option<&[Vec<f64>]> {
        self.reaction_rates.as_deref()
    }

    /// Write back solved interior nodes. Node 0 is never touched.
    pub(crate) fn commit(
        &mut self,
        work: Vec<BoundaryNode>,
        rates: Option<Vec<Vec<f64>>>,
        iterations: usize,
    ) {
        for (node, solved) in self.nodes.iter_mut().zip(work).skip(1) {
            *node = solved;
        }
        if rates.is_some() {
            self.reaction_rates = rates;
        }
        self.status = SolveStatus::Converged { iterations };
    }

    pub(crate) fn mark_failed(&mut self, iterations: usize) {
        self.status = SolveStatus::Failed { iterations };
    }

    /// Flux arriving at the interface through the last film face.
    ///
    /// Diffusive plus upwinded convective molar flux per component, and the
    /// conductive energy flux.
    pub fn interface_flux(&self) -> FluxVector {
        let n = self.nodes.len();
        let (west, east) = (&self.nodes[n - 2], &self.nodes[n - 1]);
        let dz = east.position - west.position;
        let u = self.film.convective_velocity;

        let components = (0..self.num_components())
            .map(|c| {
                let d_face = 0.5
                    * (self.film.diffusivity(c, west.temperature)
                        + self.film.diffusivity(c, east.temperature));
                let upwind = if u > 0.0 {
                    west.composition[c]
                } else {
                    east.composition[c]
                };
                self.film.molar_density
                    * (d_face / dz * (west.composition[c] - east.composition[c]) + u * upwind)
            })
            .collect();

        let energy = self.film.volumetric_heat_capacity * self.film.thermal_diffusivity
            * (west.temperature - east.temperature)
            / dz;

        FluxVector { components, energy }
    }
}

/// Per-node reaction rates; each vector must have one entry per component.
pub(crate) fn evaluate_rates(
    kinetics: &dyn ReactionKinetics,
    nodes: &[BoundaryNode],
) -> BoundaryResult<Vec<Vec<f64>>> {
    nodes
        .iter()
        .map(|node| {
            let rates = kinetics.reaction_rates(&node.composition, k(node.temperature))?;
            if rates.len() != node.composition.len() {
                return Err(invalid("reaction rate count does not match component count"));
            }
            Ok(rates)
        })
        .collect()
}

pub(crate) fn rates_finite(rates: &[Vec<f64>]) -> bool {
    rates.iter().all(|r| all_finite(r))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ff_core::numeric::{Tolerances, nearly_equal};
    use ff_core::units::Temperature;
    use ff_thermo::ThermoResult;

    struct NanKinetics;

    impl ReactionKinetics for NanKinetics {
        fn name(&self) -> &str {
            "nan"
        }

        fn reaction_rates(&self, x: &[f64], _t: Temperature) -> ThermoResult<Vec<f64>> {
            Ok(vec![f64::NAN; x.len()])
        }
    }

    pub(crate) fn binary_spec() -> BoundaryLayerSpec {
        BoundaryLayerSpec {
            bulk: NodeState {
                composition: vec![0.7, 0.3],
                temperature: 300.0,
            },
            interface_estimate: NodeState {
                composition: vec![0.5, 0.5],
                temperature: 300.0,
            },
            far_side: NodeState {
                composition: vec![0.5, 0.5],
                temperature: 300.0,
            },
            film: FilmProperties {
                thickness: 1e-4,
                diffusivities: vec![1e-9, 1e-9],
                reference_temperature: 300.0,
                diffusivity_exponent: 0.0,
                thermal_diffusivity: 1.4e-7,
                convective_velocity: 0.0,
                interfacial_mass_transfer: vec![1e-5, 1e-5],
                interfacial_heat_transfer: 1e-3,
                molar_density: 55_000.0,
                volumetric_heat_capacity: 4.18e6,
            },
        }
    }

    fn disc(nodes: usize, spacing: Spacing) -> DiscretizationConfig {
        DiscretizationConfig { nodes, spacing }
    }

    #[test]
    fn node_zero_is_bulk_bit_for_bit() {
        let spec = binary_spec();
        let bulk = spec.bulk.clone();
        let sys = FluidBoundarySystem::create(spec, &disc(10, Spacing::Uniform), None).unwrap();
        assert_eq!(sys.num_nodes(), 10);
        assert_eq!(sys.bulk().composition, bulk.composition);
        assert_eq!(sys.bulk().temperature.to_bits(), bulk.temperature.to_bits());
        assert_eq!(sys.status(), SolveStatus::Unsolved);
        assert!(!sys.is_reactive());
    }

    #[test]
    fn initial_profile_interpolates_to_estimate() {
        let sys =
            FluidBoundarySystem::create(binary_spec(), &disc(5, Spacing::Uniform), None).unwrap();
        let iface = sys.interface();
        assert!((iface.position - 1e-4).abs() < 1e-20);
        assert!((iface.composition[0] - 0.5).abs() < 1e-12);
        let mid = &sys.nodes()[2];
        assert!(nearly_equal(mid.composition[0], 0.6, Tolerances::default()));
    }

    #[test]
    fn graded_spacing_refines_toward_interface() {
        let p = grid_positions(6, 1.0, Spacing::Graded { ratio: 0.5 }).unwrap();
        assert_eq!(p.len(), 6);
        assert_eq!(p[0], 0.0);
        assert_eq!(p[5], 1.0);
        let widths: Vec<f64> = p.windows(2).map(|w| w[1] - w[0]).collect();
        for w in widths.windows(2) {
            assert!(w[1] < w[0]);
        }
        // Ratio 1 falls back to uniform
        let u = grid_positions(3, 1.0, Spacing::Graded { ratio: 1.0 }).unwrap();
        assert_eq!(u, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn two_node_grid() {
        assert_eq!(grid_positions(2, 2e-4, Spacing::Uniform).unwrap(), vec![0.0, 2e-4]);
    }

    #[test]
    fn rejects_malformed_discretization() {
        let err = FluidBoundarySystem::create(binary_spec(), &disc(1, Spacing::Uniform), None);
        assert!(matches!(err, Err(BoundaryError::InvalidConfiguration { .. })));

        let err = FluidBoundarySystem::create(
            binary_spec(),
            &disc(5, Spacing::Graded { ratio: -2.0 }),
            None,
        );
        assert!(matches!(err, Err(BoundaryError::InvalidConfiguration { .. })));
    }

    #[test]
    fn rejects_grading_that_collapses_nodes() {
        // Cell widths shrink below the resolution of the accumulated position
        let err = FluidBoundarySystem::create(
            binary_spec(),
            &disc(10, Spacing::Graded { ratio: 1e-3 }),
            None,
        );
        assert!(matches!(err, Err(BoundaryError::InvalidConfiguration { .. })));
        assert!(grid_positions(10, 1e-4, Spacing::Graded { ratio: 1e3 }).is_ok());
    }

    #[test]
    fn rejects_non_finite_initial_rates() {
        let err = FluidBoundarySystem::create(
            binary_spec(),
            &disc(10, Spacing::Uniform),
            Some(&NanKinetics),
        );
        assert!(matches!(err, Err(BoundaryError::InvalidConfiguration { .. })));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let mut spec = binary_spec();
        spec.film.interfacial_mass_transfer.pop();
        let err = FluidBoundarySystem::create(spec, &disc(5, Spacing::Uniform), None);
        assert!(matches!(err, Err(BoundaryError::InvalidConfiguration { .. })));

        let mut spec = binary_spec();
        spec.far_side.composition.push(0.0);
        assert!(FluidBoundarySystem::create(spec, &disc(5, Spacing::Uniform), None).is_err());
    }

    #[test]
    fn rejects_non_positive_film() {
        let mut spec = binary_spec();
        spec.film.thickness = 0.0;
        assert!(FluidBoundarySystem::create(spec, &disc(5, Spacing::Uniform), None).is_err());

        let mut spec = binary_spec();
        spec.film.diffusivities[0] = -1e-9;
        assert!(FluidBoundarySystem::create(spec, &disc(5, Spacing::Uniform), None).is_err());
    }

    #[test]
    fn linear_profile_flux_matches_film_theory() {
        let sys =
            FluidBoundarySystem::create(binary_spec(), &disc(10, Spacing::Uniform), None).unwrap();
        // Linear profile 0.7 → 0.5 over 1e-4 m: N = c·D·0.2/δ
        let flux = sys.interface_flux();
        let expected = 55_000.0 * 1e-9 * 0.2 / 1e-4;
        assert!((flux.components[0] - expected).abs() < 1e-9 * expected.abs());
        assert!((flux.components[1] + expected).abs() < 1e-9 * expected.abs());
        assert_eq!(flux.energy, 0.0);
    }
}
