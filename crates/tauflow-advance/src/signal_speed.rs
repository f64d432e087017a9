//! Maximum characteristic speed of a reconstructed state.
//!
//! The KT flux needs a local upper bound on the propagation speed at
//! every half face. For an ideal fluid the largest eigenvalue of the
//! flux Jacobian along direction `d` is the relativistic sum of the flow
//! velocity and the speed of sound:
//!
//! ```text
//! a = (u⁰|uᵈ|(1 - c²) + sqrt((u⊥² - (u⊥² - 1)c²)c²)) / ((u⁰)²(1 - c²) + c²)
//! ```
//!
//! with `u⊥² = (u⁰)² - (uᵈ)²`. The longitudinal speed carries the Milne
//! metric factor `1/τ`.

use tauflow_core::{Eos, ReconstCell, StepError};
use tauflow_grid::Direction;

/// Floor on the denominator of the speed formula.
const SMALL_EPS: f64 = 1e-16;

/// Below this `dP/dε` the closed form of the vanishing-sound-speed limit
/// replaces a negative discriminant.
const DPDE_LIMIT: f64 = 1e-3;

/// Round-off band below the flow velocity that snaps to the flow velocity.
const SNAP_TOLERANCE: f64 = 1e-4;

/// Maximum signal speed of `cell` along `direction` at proper time `tau`.
///
/// # Errors
///
/// [`StepError::NegativeDiscriminant`] when the square root has no real
/// value outside the soft-EOS limit, and
/// [`StepError::SignalSpeedOutOfBounds`] when the speed leaves
/// `[|uᵈ|/u⁰, 1]` by more than round-off.
pub fn max_speed(
    eos: &dyn Eos,
    tau: f64,
    direction: Direction,
    cell: &ReconstCell,
) -> Result<f64, StepError> {
    let d = direction.component();
    let utau = cell.u[0];
    let utau2 = utau * utau;
    let ux = cell.u[d].abs();
    let ut2mux2 = utau2 - ux * ux;

    let vs2 = eos.cs2(cell.e, cell.rhob);
    let discriminant = (ut2mux2 - (ut2mux2 - 1.0) * vs2) * vs2;
    let num = if discriminant >= 0.0 {
        utau * ux * (1.0 - vs2) + discriminant.sqrt()
    } else {
        let dpde = eos.dpde(cell.e, cell.rhob);
        if dpde >= DPDE_LIMIT {
            return Err(StepError::NegativeDiscriminant {
                discriminant,
                e: cell.e,
                rhob: cell.rhob,
                cs2: vs2,
                dpde,
            });
        }
        let h = eos.pressure(cell.e, cell.rhob) + cell.e;
        (-(h * dpde * h * (dpde * (ut2mux2 - 1.0) - ut2mux2))).sqrt()
            - h * (dpde - 1.0) * utau * ux
    };

    let den = utau2 * (1.0 - vs2) + vs2;
    let mut speed = num / den.max(SMALL_EPS);
    let lower = ux / utau;
    let out_of_bounds = |speed: f64| StepError::SignalSpeedOutOfBounds {
        speed,
        lower,
        direction: d,
    };

    if speed < 0.0 || speed.is_nan() {
        return Err(out_of_bounds(speed));
    } else if speed < lower {
        if num != 0.0 {
            if (speed - lower).abs() < SNAP_TOLERANCE {
                speed = lower;
            } else {
                return Err(out_of_bounds(speed));
            }
        }
    } else if speed > 1.0 {
        return Err(out_of_bounds(speed));
    }

    if direction.is_longitudinal() {
        speed /= tau;
    }
    Ok(speed)
}
