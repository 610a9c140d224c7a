//! Friction factor and heat/mass transfer analogy correlations.

/// Reynolds number below which pipe flow is treated as laminar.
pub const LAMINAR_REYNOLDS: f64 = 2300.0;

/// Fully developed laminar Nusselt/Sherwood number (constant wall value).
pub const LAMINAR_NUSSELT: f64 = 3.66;

/// Re = ρ·u·d/μ
pub fn reynolds(density: f64, velocity: f64, length: f64, viscosity: f64) -> f64 {
    density * velocity.abs() * length / viscosity
}

/// Darcy friction factor: laminar 64/Re, turbulent Swamee–Jain.
///
/// Reynolds numbers below 1 are floored so stagnant flow stays finite.
pub fn friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    let re = reynolds.max(1.0);
    if re < LAMINAR_REYNOLDS {
        64.0 / re
    } else {
        let a = relative_roughness / 3.7;
        let b = 5.74 / re.powf(0.9);
        let f = 0.25 / (a + b).log10().powi(2);
        f.max(0.0001)
    }
}

/// Chilton–Colburn analogy: Nu (or Sh) = (f/8)·Re·Pr^(1/3) (or Sc).
///
/// Laminar flow, and any turbulent estimate below the laminar value, return
/// `LAMINAR_NUSSELT`.
pub fn colburn_analogy(friction_factor: f64, reynolds: f64, prandtl_or_schmidt: f64) -> f64 {
    if reynolds < LAMINAR_REYNOLDS {
        return LAMINAR_NUSSELT;
    }
    let turbulent = friction_factor / 8.0 * reynolds * prandtl_or_schmidt.cbrt();
    turbulent.max(LAMINAR_NUSSELT)
}
