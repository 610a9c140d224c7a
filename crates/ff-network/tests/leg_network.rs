//! Flow legs built from pipe geometry and solved node by node.

use std::sync::Arc;

use ff_boundary::{BoundaryConfig, BoundaryError, FluidBoundary};
use ff_core::ids::{LegId, NodeId};
use ff_core::units::{Pressure, Temperature, k, m, mps, pa};
use ff_network::{
    FlowLeg, FlowNode, LegBalance, NetworkError, NodeSpan, PhaseVelocities, PipeLeg,
    calc_fluxes_parallel,
};
use ff_thermo::{
    Component, FirstOrderReaction, FlashResult, IdealSolution, KValue, Phase, PhaseProperties,
    PhaseState, SystemState, ThermoError, ThermoResult, ThermoSystem,
};
use ff_transport::{CoefficientModel, GeometryDefinition};

fn model() -> IdealSolution {
    IdealSolution::new(vec![
        (Component::new("light", 0.030), KValue::Fixed(4.0)),
        (Component::new("heavy", 0.090), KValue::Fixed(0.25)),
    ])
    .unwrap()
}

fn inlet(model: &IdealSolution, gas_fraction: f64) -> SystemState {
    SystemState::new(
        model.components().to_vec().into(),
        pa(2e5),
        PhaseState::new(k(350.0), vec![0.1, 0.9]).unwrap(),
        PhaseState::new(k(300.0), vec![0.5, 0.5]).unwrap(),
        gas_fraction,
    )
    .unwrap()
}

fn pipe() -> Arc<GeometryDefinition> {
    Arc::new(GeometryDefinition::pipe(m(0.05), m(2.0), m(4.5e-5)).unwrap())
}

fn velocities() -> PhaseVelocities {
    PhaseVelocities {
        gas: mps(5.0),
        liquid: mps(0.2),
    }
}

fn leg(model: &IdealSolution, boundary: FluidBoundary, nodes: usize) -> PipeLeg {
    FlowLeg::new(
        LegId::from_index(0),
        pipe(),
        inlet(model, 0.5),
        velocities(),
        boundary,
    )
    .with_node_count(nodes)
    .with_elevation(m(0.0), m(1.0))
}

struct NonConverging(IdealSolution);

impl ThermoSystem for NonConverging {
    fn name(&self) -> &str {
        "non-converging"
    }

    fn components(&self) -> &[Component] {
        self.0.components()
    }

    fn k_values(&self, _t: Temperature, _p: Pressure) -> ThermoResult<Vec<f64>> {
        Err(ThermoError::ConvergenceFailed {
            what: "fugacity iteration",
            iterations: 25,
        })
    }

    fn flash(&self, t: Temperature, p: Pressure, feed: &[f64]) -> ThermoResult<FlashResult> {
        self.0.flash(t, p, feed)
    }

    fn phase_properties(
        &self,
        phase: Phase,
        t: Temperature,
        p: Pressure,
        x: &[f64],
    ) -> ThermoResult<PhaseProperties> {
        self.0.phase_properties(phase, t, p, x)
    }
}

#[test]
fn nodes_partition_the_leg() {
    let model = model();
    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Liquid), 4);
    assert_eq!(leg.create_flow_nodes().unwrap().len(), 4);

    for (i, node) in leg.nodes().iter().enumerate() {
        assert_eq!(node.id(), NodeId::from_index(i as u32));
        let s = (i as f64 + 0.5) / 4.0;
        assert!((node.span().position.value - 2.0 * s).abs() < 1e-12);
        assert!((node.span().length.value - 0.5).abs() < 1e-12);
        assert!((node.span().elevation.value - s).abs() < 1e-12);
        assert_eq!(node.state(), &inlet(&model, 0.5));
        assert!(Arc::ptr_eq(node.geometry(), leg.geometry()));
        assert!(node.flux().is_none());
        assert_eq!(
            node.boundary().unwrap().calc_fluxes(),
            Err(BoundaryError::Unsolved)
        );
    }
    let total: f64 = leg.nodes().iter().map(|n| n.span().length.value).sum();
    assert!((total - 2.0).abs() < 1e-12);
}

#[test]
fn empty_leg_is_rejected() {
    let model = model();
    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Liquid), 0);
    assert!(matches!(
        leg.create_flow_nodes(),
        Err(NetworkError::InvalidConfiguration { .. })
    ));
}

#[test]
fn prototype_is_replicated_per_segment() {
    let model = model();
    let mut prototype = FlowNode::new(
        NodeId::from_index(99),
        pipe(),
        NodeSpan {
            position: m(0.0),
            length: m(0.1),
            elevation: m(0.0),
        },
        inlet(&model, 0.3),
        velocities(),
    )
    .with_boundary(FluidBoundary::finite_volume(BoundaryConfig::default()));
    prototype.solve(&model).unwrap();
    assert!(prototype.flux().is_some());

    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Gas), 3);
    let nodes = leg.create_flow_nodes_from(&prototype).unwrap();
    assert_eq!(nodes.len(), 3);
    for (i, node) in nodes.iter().enumerate() {
        assert_eq!(node.id(), NodeId::from_index(i as u32));
        assert_eq!(node.state().gas_fraction(), 0.3);
        assert_eq!(node.boundary().unwrap().kind(), "finite-volume");
        assert!(node.flux().is_none());
        assert!(node.coefficients().is_none());
    }
    // The prototype keeps its own results
    assert!(prototype.flux().is_some());
}

#[test]
fn node_without_boundary_fails_before_computing() {
    let model = model();
    let mut node = FlowNode::new(
        NodeId::from_index(0),
        pipe(),
        NodeSpan {
            position: m(0.5),
            length: m(1.0),
            elevation: m(0.0),
        },
        inlet(&model, 0.5),
        velocities(),
    );
    let err = node.solve(&model).unwrap_err();
    assert!(matches!(err, NetworkError::InvalidConfiguration { .. }));
    assert!(node.coefficients().is_none());
}

#[test]
fn coefficient_model_follows_gas_fraction() {
    let model = model();
    let single = FlowNode::new(
        NodeId::from_index(0),
        pipe(),
        NodeSpan {
            position: m(0.5),
            length: m(1.0),
            elevation: m(0.0),
        },
        inlet(&model, 0.0),
        velocities(),
    );
    assert!(matches!(single.coefficient_model(), CoefficientModel::OnePhase(_)));
    let coefficients = single.update_coefficients(&model).unwrap();
    assert!((coefficients.interfacial_area - 4.0 / 0.05).abs() < 1e-9);
    assert!(single.coefficients().is_none());

    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Liquid), 1);
    let node = &leg.create_flow_nodes().unwrap()[0];
    assert!(matches!(node.coefficient_model(), CoefficientModel::TwoPhase(_)));
}

#[test]
fn solved_node_commits_flux_and_coefficients() {
    let model = model();
    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Liquid), 2);
    leg.create_flow_nodes().unwrap();
    let node = &mut leg.nodes_mut()[0];
    let flux = node.calc_fluxes(&model).unwrap().clone();
    assert_eq!(flux.as_vec().len(), node.num_components() + 1);
    assert!(flux.components[0] > 0.0);
    assert!(node.coefficients().is_some());
    assert!(node.interfacial_area().unwrap() > 0.0);
}

#[test]
fn failed_solve_leaves_node_untouched() {
    let model = model();
    let mut leg = leg(
        &model,
        FluidBoundary::finite_volume(BoundaryConfig::default()),
        1,
    );
    leg.create_flow_nodes().unwrap();
    let node = &mut leg.nodes_mut()[0];
    node.solve(&model).unwrap();
    let flux = node.flux().cloned();
    let coefficients = node.coefficients().cloned();

    let broken = NonConverging(model.clone());
    let err = node.solve(&broken).unwrap_err();
    assert!(matches!(
        err,
        NetworkError::Boundary(BoundaryError::Convergence { iterations: 25, .. })
    ));
    assert_eq!(node.flux().cloned(), flux);
    assert_eq!(node.coefficients().cloned(), coefficients);
    assert!(node.boundary().unwrap().calc_fluxes().is_ok());
}

#[test]
fn parallel_matches_sequential() {
    let model = model();
    let kinetics = Arc::new(FirstOrderReaction::new(0, 1, 1e-3, 0.0).unwrap());
    let template = FluidBoundary::reactive(BoundaryConfig::default(), kinetics);

    let mut sequential = leg(&model, template.clone(), 6);
    sequential.create_flow_nodes().unwrap();
    let expected: Vec<_> = sequential
        .nodes_mut()
        .iter_mut()
        .map(|node| node.calc_fluxes(&model).unwrap().clone())
        .collect();

    let mut parallel = leg(&model, template, 6);
    parallel.create_flow_nodes().unwrap();
    let results = calc_fluxes_parallel(parallel.nodes_mut(), &model);
    let actual: Vec<_> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(actual, expected);

    assert_eq!(
        LegBalance::from_nodes(parallel.nodes()).unwrap(),
        LegBalance::from_nodes(sequential.nodes()).unwrap()
    );
}

#[test]
fn leg_balance_sums_node_transfer() {
    let model = model();
    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Liquid), 3);
    leg.create_flow_nodes().unwrap();
    assert!(matches!(
        LegBalance::from_nodes(leg.nodes()),
        Err(NetworkError::Boundary(BoundaryError::Unsolved))
    ));

    for result in calc_fluxes_parallel(leg.nodes_mut(), &model) {
        result.unwrap();
    }
    let balance = LegBalance::from_nodes(leg.nodes()).unwrap();
    let area: f64 = leg
        .nodes()
        .iter()
        .map(|n| n.interfacial_area().unwrap())
        .sum();
    let light: f64 = leg
        .nodes()
        .iter()
        .map(|n| n.flux().unwrap().components[0] * n.interfacial_area().unwrap())
        .sum();
    assert!((balance.interfacial_area - area).abs() < 1e-12 * area);
    assert!((balance.components[0] - light).abs() < 1e-12 * light.abs());
    assert_eq!(balance.components.len(), 2);
}

#[test]
fn equilibrate_splits_phases_by_k_values() {
    let model = model();
    let mut leg = leg(&model, FluidBoundary::equilibrium(Phase::Liquid), 1);
    leg.create_flow_nodes().unwrap();
    let node = &mut leg.nodes_mut()[0];
    node.solve(&model).unwrap();
    node.equilibrate(&model).unwrap();

    let state = node.state();
    let gas = state.phase(Phase::Gas);
    let liquid = state.phase(Phase::Liquid);
    assert_eq!(gas.temperature(), liquid.temperature());
    assert!(gas.temperature().value > 300.0 && gas.temperature().value < 350.0);
    for (c, k_value) in [4.0, 0.25].iter().enumerate() {
        let ratio = gas.mole_fractions()[c] / liquid.mole_fractions()[c];
        assert!((ratio - k_value).abs() < 1e-6 * k_value);
    }
    assert!(state.gas_fraction() > 0.0 && state.gas_fraction() < 1.0);
    // The old flux no longer describes this state
    assert!(node.flux().is_none());
}
