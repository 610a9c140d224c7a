//! Instantaneous-equilibrium interface boundary.

use crate::context::BoundaryContext;
use crate::error::{BoundaryError, BoundaryResult};
use crate::flux::FluxVector;
use ff_core::units::k;
use ff_thermo::{Phase, ThermoError};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Interface temperature and the equilibrium compositions on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceState {
    /// Interface temperature [K]
    pub temperature: f64,
    pub gas: Vec<f64>,
    pub liquid: Vec<f64>,
    /// K-values at the interface temperature
    pub k_values: Vec<f64>,
}

impl InterfaceState {
    pub fn composition(&self, phase: Phase) -> &[f64] {
        match phase {
            Phase::Gas => &self.gas,
            Phase::Liquid => &self.liquid,
        }
    }
}

fn normalize(v: &mut [f64]) -> BoundaryResult<()> {
    let sum: f64 = v.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return Err(ThermoError::NonPhysical {
            what: "interface composition sums to zero",
        }
        .into());
    }
    v.iter_mut().for_each(|x| *x /= sum);
    Ok(())
}

/// Interface state assuming instantaneous equilibrium between the bulk phases.
///
/// The interface temperature weights the bulk temperatures by their heat
/// transfer coefficients. Compositions follow from flux continuity
/// `c_G·k_G·(y_b − y_i) = c_L·k_L·(x_i − x_b)` with `y_i = K·x_i`, then are
/// normalized. K-values come from the thermodynamic system; its convergence
/// failures surface as [`BoundaryError::Convergence`].
pub fn estimate_interface(ctx: &BoundaryContext<'_>) -> BoundaryResult<InterfaceState> {
    let nc = ctx.num_components();
    let gas_coef = &ctx.coefficients.gas;
    let liq_coef = &ctx.coefficients.liquid;
    if gas_coef.mass_transfer.len() != nc || liq_coef.mass_transfer.len() != nc {
        return Err(BoundaryError::InvalidConfiguration {
            what: "mass transfer coefficients do not match component count",
        });
    }

    let gas = ctx.state.phase(Phase::Gas);
    let liquid = ctx.state.phase(Phase::Liquid);
    let (hg, hl) = (gas_coef.heat_transfer, liq_coef.heat_transfer);
    let t_i = (hg * gas.temperature().value + hl * liquid.temperature().value) / (hg + hl);

    let k_values = ctx.model.k_values(k(t_i), ctx.state.pressure())?;
    if k_values.len() != nc {
        return Err(BoundaryError::InvalidConfiguration {
            what: "K-value count does not match component count",
        });
    }

    let (c_g, c_l) = (ctx.gas.molar_density, ctx.liquid.molar_density);
    let y_b = gas.mole_fractions();
    let x_b = liquid.mole_fractions();

    let mut x_i = Vec::with_capacity(nc);
    let mut y_i = Vec::with_capacity(nc);
    for c in 0..nc {
        let g = c_g * gas_coef.mass_transfer[c];
        let l = c_l * liq_coef.mass_transfer[c];
        let x = (g * y_b[c] + l * x_b[c]) / (g * k_values[c] + l);
        x_i.push(x);
        y_i.push(k_values[c] * x);
    }
    normalize(&mut x_i)?;
    normalize(&mut y_i)?;

    Ok(InterfaceState {
        temperature: t_i,
        gas: y_i,
        liquid: x_i,
        k_values,
    })
}

/// Fluxes from `phase`'s bulk to the interface: `N = M·(bulk − interface)`
/// with `M = diag(c·k_c)`, and `q = h·(T_bulk − T_i)`.
pub fn equilibrium_flux(
    ctx: &BoundaryContext<'_>,
    interface: &InterfaceState,
    phase: Phase,
) -> FluxVector {
    let nc = ctx.num_components();
    let props = ctx.properties(phase);
    let coef = ctx.coefficients.phase(phase);
    let bulk = ctx.state.phase(phase);

    let transfer = DMatrix::from_diagonal(&DVector::from_iterator(
        nc,
        coef.mass_transfer.iter().map(|kc| props.molar_density * kc),
    ));
    let driving = DVector::from_iterator(
        nc,
        bulk.mole_fractions()
            .iter()
            .zip(interface.composition(phase))
            .map(|(b, i)| b - i),
    );
    let molar = transfer * driving;

    FluxVector {
        components: molar.iter().copied().collect(),
        energy: coef.heat_transfer * (bulk.temperature().value - interface.temperature),
    }
}

/// Equilibrium boundary strategy.
///
/// `solve` computes the interface and the fluxes together and commits them
/// only on success, so a failed solve keeps the previous result.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumBoundary {
    phase: Phase,
    interface: Option<InterfaceState>,
    flux: Option<FluxVector>,
}

impl EquilibriumBoundary {
    /// Boundary reporting fluxes for `phase`.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            interface: None,
            flux: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn solve(&mut self, ctx: &BoundaryContext<'_>) -> BoundaryResult<()> {
        let interface = estimate_interface(ctx)?;
        let flux = equilibrium_flux(ctx, &interface, self.phase);
        debug!(
            t_interface = interface.temperature,
            energy_flux = flux.energy,
            "equilibrium boundary solved"
        );
        self.interface = Some(interface);
        self.flux = Some(flux);
        Ok(())
    }

    pub fn calc_fluxes(&self) -> BoundaryResult<&FluxVector> {
        self.flux.as_ref().ok_or(BoundaryError::Unsolved)
    }

    pub fn interface(&self) -> Option<&InterfaceState> {
        self.interface.as_ref()
    }

    /// Same configuration, no solved state.
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.phase)
    }
}
