use core::f64::consts::{PI, TAU};

use tracing::{trace, warn};

use crate::{
    keplers_equation, keplers_equation_derivative, keplers_equation_second_derivative, sinhcosh,
    solve_monotone_cubic, OrbitError, Result, B, CONVERGENCE_TOLERANCE, NUMERIC_MAX_ITERS, N_F64,
    PI_SQUARED,
};

/// Whether an iteration may stop: either the last step was negligible, or
/// the residual is already at the rounding floor of the operands.
#[inline]
fn has_converged(step: f64, residual: f64, scale: f64) -> bool {
    step.abs() <= CONVERGENCE_TOLERANCE * scale || residual.abs() <= 4.0 * f64::EPSILON * scale
}

/// Solves the elliptic Kepler equation `M = E − e sin E` for `E`.
///
/// Whole revolutions in the mean anomaly carry over into the result.
///
/// # Source
/// The starting guess is the "rational seed" from the paper
/// "Two fast and accurate routines for solving the elliptic Kepler
/// equation for all values of the eccentricity and mean anomaly"
/// by Daniele Tommasini and David N. Olivieri
/// <https://doi.org/10.1051/0004-6361/202141423>
///
/// The refinement is the Laguerre iteration from the paper
/// "An improved algorithm due to laguerre for the solution of Kepler's equation."
/// by Bruce A. Conway
/// <https://doi.org/10.1007/bf01230852>
pub(crate) fn solve_elliptic(eccentricity: f64, mean_anomaly: f64) -> Result<f64> {
    if !mean_anomaly.is_finite() {
        return Err(OrbitError::Domain("mean anomaly must be finite"));
    }

    // Use the symmetry and periodicity of the eccentric anomaly
    // to reduce M into [0, π].
    let revolutions = (mean_anomaly / TAU).round();
    let mut mean_anomaly = mean_anomaly - revolutions * TAU;
    let mut sign = 1.0;
    if mean_anomaly < 0.0 {
        mean_anomaly = -mean_anomaly;
        sign = -1.0;
    }

    // E_0 = M + (4beM(pi - M)) / (8eM + 4e(e-pi) + pi^2)
    let mut eccentric_anomaly = mean_anomaly
        + (4.0 * eccentricity * B * mean_anomaly * (PI - mean_anomaly))
            / (8.0 * eccentricity * mean_anomaly
                + 4.0 * eccentricity * (eccentricity - PI)
                + PI_SQUARED);

    // Laguerre's method
    //
    // D = sqrt((n-1)^2(f'(x_i))^2 - n(n-1)f(x_i)f''(x_i))
    //
    // x_i+1 = x_i - (nf(x_i) / (f'(x_i) +/- D))
    // ...where the "+/-" is chosen to so that abs(denominator) is maximized
    for iteration in 0..NUMERIC_MAX_ITERS {
        let f = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
        let scale = 1.0 + eccentric_anomaly.abs() + mean_anomaly;
        if has_converged(f64::INFINITY, f, scale) {
            trace!(iteration, "elliptic Kepler solver converged");
            return Ok(sign * eccentric_anomaly + revolutions * TAU);
        }

        let fp = keplers_equation_derivative(eccentric_anomaly, eccentricity);
        let fpp = keplers_equation_second_derivative(eccentric_anomaly, eccentricity);

        let n = N_F64;
        let n_minus_1 = n - 1.0;
        let d = ((n_minus_1 * n_minus_1) * fp * fp - n * n_minus_1 * f * fpp)
            .abs()
            .sqrt()
            .copysign(fp);

        let denominator = fp + d;
        if denominator.abs() < 1e-30 || !denominator.is_finite() {
            break;
        }

        let step = n * f / denominator;
        eccentric_anomaly -= step;

        if has_converged(step, f64::INFINITY, scale) {
            trace!(iteration, "elliptic Kepler solver converged");
            return Ok(sign * eccentric_anomaly + revolutions * TAU);
        }
    }

    warn!(
        eccentricity,
        mean_anomaly, "elliptic Kepler solver did not converge"
    );
    Err(OrbitError::Convergence {
        solver: "elliptic Kepler solver",
        iterations: NUMERIC_MAX_ITERS,
    })
}

/// Gets a starting guess for the hyperbolic anomaly, for `M > 0`.
///
/// Both candidates bound the root from above: `sinh H ≥ H + H³/6` makes the
/// root of the cubic `eH³/6 + (e − 1)H − M` an upper bound, and
/// `sinh H = (M + H)/e` turns any upper bound into a tighter one through
/// `asinh`. Starting above the root keeps the iteration away from the flat
/// region near `H = 0`.
fn hyperbolic_seed(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let cubic_root = solve_monotone_cubic(eccentricity / 6.0, 0.0, eccentricity - 1.0, -mean_anomaly);
    let asinh_bound = ((mean_anomaly + cubic_root) / eccentricity).asinh();

    if cubic_root.is_finite() {
        cubic_root.min(asinh_bound)
    } else {
        (mean_anomaly / eccentricity).asinh().max(1.0)
    }
}

/// Solves the hyperbolic Kepler equation `M = e sinh H − H` for `H`.
///
/// # Source
/// The refinement is the fourth-order Schröder iteration of the second
/// kind from the paper "A new method for solving the hyperbolic Kepler
/// equation" by Baisheng Wu et al.
pub(crate) fn solve_hyperbolic(eccentricity: f64, mean_anomaly: f64) -> Result<f64> {
    if !mean_anomaly.is_finite() {
        return Err(OrbitError::Domain("mean anomaly must be finite"));
    }
    if mean_anomaly == 0.0 {
        return Ok(0.0);
    }

    let sign = mean_anomaly.signum();
    let mean_anomaly = mean_anomaly.abs();

    let mut ecc_anom = hyperbolic_seed(eccentricity, mean_anomaly);

    /*
    F_1^(4) = F_0 - (
        (6h/h' - 3h^2 h'' / h'^3) /
        (6 - 6h h'' / h'^2 + h^2 h'''/h'^3)
    )

    ...where:
    h'''= e_c cosh(F_0)
    h'  = h''' - 1
    h'' = e_c sinh(F_0)
    h   = h'' - F_0 - M_h

    Paper about Schröder iterations:
    https://doi.org/10.1016/j.cam.2019.02.035
     */
    for iteration in 0..NUMERIC_MAX_ITERS {
        let (sinh_eca, cosh_eca) = sinhcosh(ecc_anom);

        let hppp = eccentricity * cosh_eca;
        let hp = hppp - 1.0;
        let hpp = eccentricity * sinh_eca;
        let h = hpp - ecc_anom - mean_anomaly;

        let scale = 1.0 + hpp.abs() + mean_anomaly;
        if has_converged(f64::INFINITY, h, scale) {
            trace!(iteration, "hyperbolic Kepler solver converged");
            return Ok(sign * ecc_anom);
        }

        let h_sq = h * h;
        let r = hp.recip();
        let r_sq = r * r;
        let r_cub = r_sq * r;

        let denominator = 6.0 - 6.0 * h * hpp * r_sq + h_sq * hppp * r_cub;

        if denominator.abs() < 1e-30 || !denominator.is_finite() {
            break;
        }

        let numerator = 6.0 * h * r - 3.0 * h_sq * hpp * r_cub;
        let delta = numerator / denominator;

        ecc_anom -= delta;

        if has_converged(delta, f64::INFINITY, 1.0 + ecc_anom.abs()) {
            trace!(iteration, "hyperbolic Kepler solver converged");
            return Ok(sign * ecc_anom);
        }
    }

    warn!(
        eccentricity,
        mean_anomaly, "hyperbolic Kepler solver did not converge"
    );
    Err(OrbitError::Convergence {
        solver: "hyperbolic Kepler solver",
        iterations: NUMERIC_MAX_ITERS,
    })
}
