//! Runge-Kutta sub-step of the dissipative currents.
//!
//! Each evolved component `X` obeys `∂_τ(u^τ X) = -∂_i(u^i X) + S`. The
//! stepper advances the independent entries (`π^{xx}..π^{yη}`, `Π`,
//! `q^x..q^η`) with the same Heun update as the ideal part, then restores
//! the algebraic constraints: tracelessness fixes `π^{ηη}`,
//! transversality fixes the time row of `π` and `q^τ`.

use tauflow_core::{
    map_1d_idx_to_2d, map_2d_idx_to_1d, FluidCell, KinematicBundle, RkStage, DIFFUSION_OFFSET,
};
use tauflow_grid::{CellIndex, DissipativeTerms, Grid};

use crate::config::ViscosityFlags;
use crate::eigen::shear_eigenvalues;

/// Independently evolved shear entries: `xx, xy, xη, yy, yη`.
const EVOLVED_SHEAR: std::ops::Range<usize> = 4..9;

/// Dissipative-part stepper bound to its collaborator.
#[derive(Clone, Copy)]
pub struct DissipativeStepper<'a> {
    terms: &'a dyn DissipativeTerms,
    flags: ViscosityFlags,
    delta_tau: f64,
}

impl<'a> DissipativeStepper<'a> {
    /// Bind the stepper.
    pub fn new(terms: &'a dyn DissipativeTerms, flags: ViscosityFlags, delta_tau: f64) -> Self {
        Self {
            terms,
            flags,
            delta_tau,
        }
    }

    /// Heun update of one density `X` carried as `u^τ X`.
    #[allow(clippy::too_many_arguments)]
    fn heun(
        &self,
        rk: f64,
        x_cur: f64,
        u0_cur: f64,
        x_prev: f64,
        u0_prev: f64,
        source: f64,
        rhs: f64,
        u0_future: f64,
    ) -> f64 {
        let mut tempf = (1.0 - rk) * x_cur * u0_cur + rk * x_prev * u0_prev;
        tempf += source * self.delta_tau;
        tempf += rhs;
        tempf += rk * x_cur * u0_cur;
        tempf /= 1.0 + rk;
        tempf / u0_future
    }

    /// Advance the dissipative currents of `at` into `future`, whose
    /// ideal part must already hold the new flow velocity.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &self,
        tau: f64,
        stage: RkStage,
        previous: &Grid,
        current: &Grid,
        at: CellIndex,
        kin: &KinematicBundle,
        future: &mut FluidCell,
    ) {
        let rk = stage.as_flag();
        let tau_now = tau + rk * self.delta_tau;
        let c = &current[at];
        let p = &previous[at];
        let u0_f = future.u[0];

        if self.flags.shear {
            for idx in EVOLVED_SHEAR {
                let (mu, nu) = map_1d_idx_to_2d(idx);
                let rhs = self.terms.shear_rhs(tau_now, current, at, mu, nu, kin);
                let source = self.terms.shear_source(tau_now, c, p, mu, nu, stage, kin);
                future.w[idx] = self.heun(rk, c.w[idx], c.u[0], p.w[idx], p.u[0], source, rhs, u0_f);
            }
        } else {
            for idx in EVOLVED_SHEAR {
                future.w[idx] = 0.0;
            }
        }

        if self.flags.bulk {
            let rhs = self.terms.bulk_rhs(tau_now, current, at, kin);
            let source = self.terms.bulk_source(tau_now, c, p, stage, kin);
            future.pi_b = self.heun(rk, c.pi_b, c.u[0], p.pi_b, p.u[0], source, rhs, u0_f);
        } else {
            future.pi_b = 0.0;
        }

        if self.flags.diffusion {
            for nu in 1..4 {
                let idx = DIFFUSION_OFFSET + nu;
                let rhs = self.terms.diffusion_rhs(tau_now, current, at, nu);
                let source = self.terms.diffusion_source(tau_now, c, p, nu, stage, kin);
                future.w[idx] = self.heun(rk, c.w[idx], c.u[0], p.w[idx], p.u[0], source, rhs, u0_f);
            }
        } else {
            for idx in DIFFUSION_OFFSET..DIFFUSION_OFFSET + 4 {
                future.w[idx] = 0.0;
            }
        }

        restore_constraints(future, self.flags.diffusion);
    }
}

/// Rebuild the dependent dissipative entries from the evolved ones and
/// refresh the shear eigenvalues.
///
/// `π^{ηη}` comes from `π^μ_μ = 0`, `π^{iτ}` and `π^{ττ}` from
/// `u_μ π^{μν} = 0`, and `q^τ` from `u_μ q^μ = 0` (zero when diffusion is
/// off).
pub fn restore_constraints(cell: &mut FluidCell, diffusion: bool) {
    let u = cell.u;
    let w = &mut cell.w;
    w[9] = (2.0 * (u[1] * u[2] * w[5] + u[1] * u[3] * w[6] + u[2] * u[3] * w[8])
        - (u[0] * u[0] - u[1] * u[1]) * w[4]
        - (u[0] * u[0] - u[2] * u[2]) * w[7])
        / (u[0] * u[0] - u[3] * u[3]);

    for mu in 1..4 {
        let mut tempf = 0.0;
        for nu in 1..4 {
            tempf += w[map_2d_idx_to_1d(mu, nu)] * u[nu];
        }
        w[mu] = tempf / u[0];
    }

    let mut tempf = 0.0;
    for nu in 1..4 {
        tempf += w[nu] * u[nu];
    }
    w[0] = tempf / u[0];

    cell.lambdas = shear_eigenvalues(&cell.w);

    let mut tempf = 0.0;
    for nu in 1..4 {
        tempf += cell.w[map_2d_idx_to_1d(4, nu)] * u[nu];
    }
    cell.w[DIFFUSION_OFFSET] = if diffusion { tempf / u[0] } else { 0.0 };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tauflow_grid::{EdgeBehavior, GridDims};
    use tauflow_test_utils::{NullDissipativeTerms, RelaxationTerms};

    fn boosted(ux: f64, uy: f64, ueta: f64) -> FluidCell {
        let mut cell = FluidCell::at_rest(1.0, 0.0);
        cell.u = [(1.0 + ux * ux + uy * uy + ueta * ueta).sqrt(), ux, uy, ueta];
        cell
    }

    #[test]
    fn disabled_currents_are_cleared() {
        let terms = NullDissipativeTerms;
        let stepper = DissipativeStepper::new(&terms, ViscosityFlags::ideal(), 0.01);
        let mut cell = FluidCell::at_rest(1.0, 0.0);
        cell.w = [1.0; 14];
        cell.pi_b = 1.0;
        let grid = Grid::filled(GridDims::new(1, 1, 1), EdgeBehavior::Clamp, cell).unwrap();
        let mut future = cell;
        stepper.step(
            1.0,
            RkStage::Predictor,
            &grid,
            &grid,
            CellIndex::new(0, 0, 0),
            &KinematicBundle::at_rest(),
            &mut future,
        );
        assert!(future.w.iter().all(|&w| w == 0.0));
        assert_eq!(future.pi_b, 0.0);
        assert_eq!(future.lambdas, [0.0; 3]);
    }

    #[test]
    fn relaxation_decays_shear_and_bulk() {
        let terms = RelaxationTerms::new(0.5);
        let stepper = DissipativeStepper::new(&terms, ViscosityFlags::shear_and_bulk(), 0.01);
        let mut cell = FluidCell::at_rest(1.0, 0.0);
        cell.w[4] = 0.2;
        cell.w[7] = -0.1;
        cell.pi_b = -0.05;
        restore_constraints(&mut cell, false);
        let grid = Grid::filled(GridDims::new(1, 1, 1), EdgeBehavior::Clamp, cell).unwrap();
        let mut future = cell;
        stepper.step(
            1.0,
            RkStage::Predictor,
            &grid,
            &grid,
            CellIndex::new(0, 0, 0),
            &KinematicBundle::at_rest(),
            &mut future,
        );
        // Euler step of dX/dτ = -X/τ_r: X·(1 - Δτ/τ_r)
        assert!((future.w[4] - 0.2 * 0.98).abs() < 1e-14);
        assert!((future.pi_b + 0.05 * 0.98).abs() < 1e-14);
        assert!((future.w[9] + future.w[4] + future.w[7]).abs() < 1e-14);
    }

    #[test]
    fn rest_frame_restoration_is_traceless_with_empty_time_row() {
        let mut cell = FluidCell::at_rest(1.0, 0.0);
        cell.w[4] = 0.3;
        cell.w[5] = 0.1;
        cell.w[7] = -0.1;
        cell.w[0] = 9.0;
        restore_constraints(&mut cell, false);
        assert!((cell.w[9] + 0.2).abs() < 1e-14);
        assert_eq!(&cell.w[0..4], &[0.0; 4]);
        assert!(cell.shear_trace().abs() < 1e-14);
        let sum: f64 = cell.lambdas.iter().sum();
        assert!(sum.abs() < 1e-14);
    }

    proptest! {
        #[test]
        fn restoration_makes_shear_transverse_and_traceless(
            ux in -1.0f64..1.0,
            uy in -1.0f64..1.0,
            ueta in -1.0f64..1.0,
            wxx in -0.5f64..0.5,
            wxy in -0.5f64..0.5,
            wxeta in -0.5f64..0.5,
            wyy in -0.5f64..0.5,
            wyeta in -0.5f64..0.5,
            qx in -0.1f64..0.1,
        ) {
            let mut cell = boosted(ux, uy, ueta);
            cell.w[4] = wxx;
            cell.w[5] = wxy;
            cell.w[6] = wxeta;
            cell.w[7] = wyy;
            cell.w[8] = wyeta;
            cell.w[11] = qx;
            restore_constraints(&mut cell, true);

            prop_assert!(cell.shear_trace().abs() < 1e-10);
            for component in cell.shear_transversality() {
                prop_assert!(component.abs() < 1e-10);
            }
            let u_dot_q = -cell.u[0] * cell.w[10] + cell.u[1] * cell.w[11];
            prop_assert!(u_dot_q.abs() < 1e-12);
        }
    }
}
