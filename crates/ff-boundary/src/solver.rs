//! Steady-state solver for the finite-volume boundary layer.

use crate::config::SolverConfig;
use crate::error::{BoundaryError, BoundaryResult};
use crate::system::{FluidBoundarySystem, SolveStatus, evaluate_rates, rates_finite};
use ff_core::numeric::{ensure_all_finite, max_abs_diff};
use ff_core::tdma::TdmaSolver;
use ff_thermo::ReactionKinetics;
use tracing::{debug, trace, warn};

/// Outcome of a boundary-layer solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// Iterations performed by this call (0 if the system was already converged)
    pub iterations: usize,
    /// Max absolute interior update of each iteration
    pub max_updates: Vec<f64>,
    pub status: SolveStatus,
}

/// Picard iteration over per-quantity tridiagonal solves.
///
/// Stateless apart from its configuration: the solve status lives on the
/// system. With a reaction provider the same iteration adds the per-node
/// reaction source and refreshes the rates from each new iterate.
#[derive(Clone, Copy)]
pub struct FluidBoundarySolver<'a> {
    pub config: SolverConfig,
    reactions: Option<&'a dyn ReactionKinetics>,
}

impl std::fmt::Debug for FluidBoundarySolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FluidBoundarySolver")
            .field("config", &self.config)
            .field("reactions", &self.reactions.map(|r| r.name()))
            .finish()
    }
}

/// Tridiagonal coefficients for the interior unknowns (nodes 1..N-1).
struct Assembly {
    sub: Vec<f64>,
    diag: Vec<f64>,
    sup: Vec<f64>,
    rhs: Vec<f64>,
}

impl<'a> FluidBoundarySolver<'a> {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            reactions: None,
        }
    }

    /// Solver for reactive systems.
    pub fn reactive(config: SolverConfig, kinetics: &'a dyn ReactionKinetics) -> Self {
        Self::new(config).with_reactions(Some(kinetics))
    }

    pub fn with_reactions(mut self, reactions: Option<&'a dyn ReactionKinetics>) -> Self {
        self.reactions = reactions;
        self
    }

    pub fn is_reactive(&self) -> bool {
        self.reactions.is_some()
    }

    /// Drive `system` to steady state.
    ///
    /// Iterates on a scratch copy of the nodes and writes back only on
    /// convergence. A converged system returns at once with zero iterations;
    /// a failed one returns its convergence error again.
    pub fn solve(&self, system: &mut FluidBoundarySystem) -> BoundaryResult<SolveReport> {
        match system.status() {
            SolveStatus::Converged { .. } => {
                return Ok(SolveReport {
                    iterations: 0,
                    max_updates: Vec::new(),
                    status: system.status(),
                });
            }
            SolveStatus::Failed { iterations } => {
                return Err(BoundaryError::Convergence {
                    what: "boundary layer (previously failed)".to_string(),
                    iterations,
                });
            }
            SolveStatus::Unsolved => {}
        }
        if system.is_reactive() != self.is_reactive() {
            return Err(BoundaryError::InvalidConfiguration {
                what: "reactive systems need a reactive solver",
            });
        }

        let tdma = TdmaSolver::new(self.config.pivot_epsilon);
        let film = system.film().clone();
        let far_side = system.far_side().clone();
        let nc = system.num_components();
        let mut work = system.nodes().to_vec();
        let mut rates = system.reaction_rates().map(<[Vec<f64>]>::to_vec);
        let mut max_updates = Vec::new();

        for iteration in 1..=self.config.max_iterations {
            let mut max_update: f64 = 0.0;

            let positions: Vec<f64> = work.iter().map(|node| node.position).collect();

            for c in 0..nc {
                let diffusivities: Vec<f64> = work
                    .iter()
                    .map(|node| film.diffusivity(c, node.temperature))
                    .collect();
                let source: Option<Vec<f64>> =
                    rates.as_ref().map(|r| r.iter().map(|node| node[c]).collect());
                let a = assemble(
                    &positions,
                    &diffusivities,
                    film.convective_velocity,
                    work[0].composition[c],
                    film.interfacial_mass_transfer[c],
                    far_side.composition[c],
                    source.as_deref(),
                );
                let solution = tdma.solve(&a.sub, &a.diag, &a.sup, &a.rhs)?;
                if ensure_all_finite(&solution, "boundary layer composition").is_err() {
                    return Err(diverged(system, iteration));
                }
                let previous: Vec<f64> = work[1..].iter().map(|n| n.composition[c]).collect();
                max_update = max_update.max(max_abs_diff(&solution, &previous));
                for (node, value) in work.iter_mut().skip(1).zip(solution) {
                    node.composition[c] = value;
                }
            }

            let a = assemble(
                &positions,
                &vec![film.thermal_diffusivity; work.len()],
                film.convective_velocity,
                work[0].temperature,
                film.interfacial_heat_transfer,
                far_side.temperature,
                None,
            );
            let solution = tdma.solve(&a.sub, &a.diag, &a.sup, &a.rhs)?;
            if ensure_all_finite(&solution, "boundary layer temperature").is_err() {
                return Err(diverged(system, iteration));
            }
            let previous: Vec<f64> = work[1..].iter().map(|n| n.temperature).collect();
            max_update = max_update.max(max_abs_diff(&solution, &previous));
            for (node, value) in work.iter_mut().skip(1).zip(solution) {
                node.temperature = value;
            }

            if let Some(kinetics) = self.reactions {
                let refreshed = evaluate_rates(kinetics, &work)?;
                if !rates_finite(&refreshed) {
                    return Err(diverged(system, iteration));
                }
                rates = Some(refreshed);
            }

            trace!(iteration, max_update, "boundary layer iteration");
            max_updates.push(max_update);

            if max_update < self.config.tolerance {
                debug!(
                    iterations = iteration,
                    nodes = work.len(),
                    reactive = self.is_reactive(),
                    "boundary layer converged"
                );
                system.commit(work, rates, iteration);
                return Ok(SolveReport {
                    iterations: iteration,
                    max_updates,
                    status: system.status(),
                });
            }
        }

        let iterations = self.config.max_iterations;
        warn!(
            iterations,
            last_update = max_updates.last().copied().unwrap_or(f64::NAN),
            "boundary layer did not converge"
        );
        system.mark_failed(iterations);
        Err(BoundaryError::Convergence {
            what: "boundary layer".to_string(),
            iterations,
        })
    }
}

/// Mark `system` failed after a non-finite iterate; its nodes keep their last committed values.
fn diverged(system: &mut FluidBoundarySystem, iteration: usize) -> BoundaryError {
    warn!(iteration, "boundary layer diverged");
    system.mark_failed(iteration);
    BoundaryError::Convergence {
        what: "boundary layer (non-finite iterate)".to_string(),
        iterations: iteration,
    }
}

/// Assemble one transported quantity φ over the interior nodes.
///
/// Row i (node i) balances upwinded convection and diffusion across its west
/// and east faces; face diffusivities average the adjacent nodes. The node 0
/// value `bulk` is known and moves to the right-hand side. The interface row
/// carries the Robin condition toward `target` over a half cell.
fn assemble(
    positions: &[f64],
    diffusivities: &[f64],
    velocity: f64,
    bulk: f64,
    interfacial: f64,
    target: f64,
    source: Option<&[f64]>,
) -> Assembly {
    let n = positions.len();
    let m = n - 1;
    let mut a = Assembly {
        sub: vec![0.0; m],
        diag: vec![0.0; m],
        sup: vec![0.0; m],
        rhs: vec![0.0; m],
    };
    let (u_in, u_out) = (velocity.max(0.0), (-velocity).max(0.0));
    let d = diffusivities;

    for row in 0..m {
        let i = row + 1;
        let dw = positions[i] - positions[i - 1];
        let aw = 0.5 * (d[i - 1] + d[i]) / dw + u_in;

        let (ae, vol) = if i < n - 1 {
            let de = positions[i + 1] - positions[i];
            (0.5 * (d[i] + d[i + 1]) / de + u_out, 0.5 * (dw + de))
        } else {
            (0.0, 0.5 * dw)
        };

        a.diag[row] = aw + ae;
        if i < n - 1 {
            a.sup[row] = -ae;
        } else {
            a.diag[row] += interfacial;
            a.rhs[row] += interfacial * target;
        }
        if i == 1 {
            a.rhs[row] += aw * bulk;
        } else {
            a.sub[row] = -aw;
        }
        if let Some(rates) = source {
            a.rhs[row] += rates[i] * vol;
        }
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiscretizationConfig, Spacing};
    use crate::system::tests::binary_spec;
    use ff_core::numeric::{Tolerances, nearly_equal};
    use ff_core::units::Temperature;
    use ff_thermo::{FirstOrderReaction, ThermoResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoReaction;

    /// Zero rates for the first `finite_calls` evaluations, NaN afterwards.
    struct TurnsNonFinite {
        finite_calls: usize,
        calls: AtomicUsize,
    }

    impl ReactionKinetics for TurnsNonFinite {
        fn name(&self) -> &str {
            "turns non-finite"
        }

        fn reaction_rates(&self, x: &[f64], _t: Temperature) -> ThermoResult<Vec<f64>> {
            let call = self.calls.fetch_add(1, Ordering::Relaxed);
            let rate = if call < self.finite_calls { 0.0 } else { f64::NAN };
            Ok(vec![rate; x.len()])
        }
    }

    impl ReactionKinetics for NoReaction {
        fn name(&self) -> &str {
            "none"
        }

        fn reaction_rates(&self, x: &[f64], _t: Temperature) -> ThermoResult<Vec<f64>> {
            Ok(vec![0.0; x.len()])
        }
    }

    fn disc(nodes: usize) -> DiscretizationConfig {
        DiscretizationConfig {
            nodes,
            spacing: Spacing::Uniform,
        }
    }

    fn base_system(nodes: usize) -> FluidBoundarySystem {
        FluidBoundarySystem::create(binary_spec(), &disc(nodes), None).unwrap()
    }

    #[test]
    fn converges_to_film_theory_interface() {
        let mut sys = base_system(10);
        let report = FluidBoundarySolver::new(SolverConfig::default())
            .solve(&mut sys)
            .unwrap();
        assert!(report.iterations < SolverConfig::default().max_iterations);
        assert_eq!(report.max_updates.len(), report.iterations);
        assert_eq!(sys.status(), SolveStatus::Converged { iterations: report.iterations });

        // D/δ equals k_int, so the interface sits halfway between bulk and far side
        let iface = sys.interface();
        let tol = Tolerances { abs: 1e-9, rel: 0.0 };
        assert!(nearly_equal(iface.composition[0], 0.6, tol));
        assert!(nearly_equal(iface.composition[1], 0.4, tol));
        for pair in sys.nodes().windows(2) {
            assert!(pair[1].composition[0] <= pair[0].composition[0]);
        }
    }

    #[test]
    fn node_zero_survives_solve() {
        let mut sys = base_system(10);
        let before = sys.bulk().clone();
        FluidBoundarySolver::new(SolverConfig::default())
            .solve(&mut sys)
            .unwrap();
        assert_eq!(sys.bulk().temperature.to_bits(), before.temperature.to_bits());
        for (a, b) in sys.bulk().composition.iter().zip(&before.composition) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn resolving_converged_system_is_a_no_op() {
        let mut sys = base_system(6);
        let solver = FluidBoundarySolver::new(SolverConfig::default());
        solver.solve(&mut sys).unwrap();
        let snapshot = sys.clone();
        let report = solver.solve(&mut sys).unwrap();
        assert_eq!(report.iterations, 0);
        assert!(report.max_updates.is_empty());
        assert_eq!(sys, snapshot);
    }

    #[test]
    fn iteration_cap_fails_without_touching_nodes() {
        let mut sys = base_system(10);
        let before = sys.nodes().to_vec();
        let solver = FluidBoundarySolver::new(SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        });
        let err = solver.solve(&mut sys).unwrap_err();
        assert!(matches!(err, BoundaryError::Convergence { iterations: 1, .. }));
        assert_eq!(sys.status(), SolveStatus::Failed { iterations: 1 });
        assert_eq!(sys.nodes(), &before[..]);

        // A failed system reports failure again without iterating
        let again = FluidBoundarySolver::new(SolverConfig::default()).solve(&mut sys);
        assert!(matches!(again, Err(BoundaryError::Convergence { iterations: 1, .. })));
    }

    #[test]
    fn singular_pivot_leaves_system_unsolved() {
        let mut sys = base_system(5);
        let solver = FluidBoundarySolver::new(SolverConfig {
            pivot_epsilon: 1e300,
            ..SolverConfig::default()
        });
        let err = solver.solve(&mut sys).unwrap_err();
        assert!(matches!(err, BoundaryError::Singular { row: 0, .. }));
        assert_eq!(sys.status(), SolveStatus::Unsolved);
    }

    #[test]
    fn zero_rate_reactive_matches_base() {
        let mut base = base_system(10);
        FluidBoundarySolver::new(SolverConfig::default())
            .solve(&mut base)
            .unwrap();

        let kinetics = NoReaction;
        let mut reactive =
            FluidBoundarySystem::create(binary_spec(), &disc(10), Some(&kinetics)).unwrap();
        assert!(reactive.is_reactive());
        let report = FluidBoundarySolver::reactive(SolverConfig::default(), &kinetics)
            .solve(&mut reactive)
            .unwrap();
        assert!(report.iterations > 0);
        assert_eq!(base.nodes(), reactive.nodes());
    }

    #[test]
    fn non_finite_rates_fail_without_committing() {
        let kinetics = TurnsNonFinite {
            finite_calls: 10,
            calls: AtomicUsize::new(0),
        };
        let mut sys =
            FluidBoundarySystem::create(binary_spec(), &disc(10), Some(&kinetics)).unwrap();
        let before = sys.nodes().to_vec();
        let err = FluidBoundarySolver::reactive(SolverConfig::default(), &kinetics)
            .solve(&mut sys)
            .unwrap_err();
        assert!(matches!(err, BoundaryError::Convergence { iterations: 1, .. }));
        assert_eq!(sys.status(), SolveStatus::Failed { iterations: 1 });
        assert_eq!(sys.nodes(), &before[..]);
        assert!(sys.interface().composition.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn reactive_system_needs_reactive_solver() {
        let kinetics = NoReaction;
        let mut reactive =
            FluidBoundarySystem::create(binary_spec(), &disc(4), Some(&kinetics)).unwrap();
        let err = FluidBoundarySolver::new(SolverConfig::default()).solve(&mut reactive);
        assert!(matches!(err, Err(BoundaryError::InvalidConfiguration { .. })));
        assert_eq!(reactive.status(), SolveStatus::Unsolved);
    }

    #[test]
    fn reaction_consumes_reactant_in_film() {
        let kinetics = FirstOrderReaction::new(0, 1, 0.01, 0.0).unwrap();
        let mut sys =
            FluidBoundarySystem::create(binary_spec(), &disc(10), Some(&kinetics)).unwrap();
        FluidBoundarySolver::reactive(SolverConfig::default(), &kinetics)
            .solve(&mut sys)
            .unwrap();
        let iface = sys.interface();
        assert!(iface.composition[0] < 0.6);
        assert!(iface.composition[1] > 0.4);
        let rates = sys.reaction_rates().unwrap();
        assert_eq!(rates.len(), sys.num_nodes());
        assert!(rates[1][0] < 0.0);
    }

    #[test]
    fn graded_grid_gives_same_linear_profile() {
        let mut sys = FluidBoundarySystem::create(
            binary_spec(),
            &DiscretizationConfig {
                nodes: 12,
                spacing: Spacing::Graded { ratio: 0.8 },
            },
            None,
        )
        .unwrap();
        FluidBoundarySolver::new(SolverConfig::default())
            .solve(&mut sys)
            .unwrap();
        assert!(nearly_equal(
            sys.interface().composition[0],
            0.6,
            Tolerances { abs: 1e-9, rel: 0.0 }
        ));
    }
}
