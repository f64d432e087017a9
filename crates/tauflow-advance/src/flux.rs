//! Kurganov-Tadmor flux assembly for the ideal conservation laws.
//!
//! For every direction the conserved vector `q = τ·(T^{τα}, J^τ)` is
//! extrapolated to both half faces of the cell with the minmod limiter,
//! each face state is reconstructed to primitives, and the central-upwind
//! numerical flux
//!
//! ```text
//! H = ½((F_L + F_R) - a·(q_R - q_L)),   a = max(a_L, a_R)
//! ```
//!
//! is differenced into a right-hand side. The η direction is curvilinear:
//! its `τ` and `η` fluxes are combined through discretized `cosh`/`sinh`
//! factors, which also supply the Milne geometric source terms.

use tauflow_core::{Eos, FluidCell, ReconstCell, Reconstruct, StepError, TJbVec};
use tauflow_grid::{CellIndex, Direction, Grid};

use crate::config::GridGeometry;
use crate::minmod::Minmod;
use crate::signal_speed::max_speed;
use crate::stress::tjb_row;

const SMALL_EPS: f64 = 1e-16;

/// Geometric weights `(cosh, sinh)` of the longitudinal flux difference.
///
/// `cosh(Δη/2)/Δη` multiplies the flux difference and
/// `max(½, sinh(Δη/2)/Δη)` the flux sum. The boost-invariant limit drops
/// the difference entirely and keeps the sum at `½`.
pub fn longitudinal_factors(delta_eta: f64, boost_invariant: bool) -> (f64, f64) {
    if boost_invariant {
        return (0.0, 0.5);
    }
    let width = delta_eta.max(SMALL_EPS);
    let cosh = (delta_eta / 2.0).cosh() / width;
    let sinh = ((delta_eta / 2.0).sinh() / width).max(0.5);
    (cosh, sinh)
}

/// Numerical fluxes through both faces of a cell along one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceFluxes {
    /// Flux through the lower face, `H_{-½}`.
    pub minus: TJbVec,
    /// Flux through the upper face, `H_{+½}`.
    pub plus: TJbVec,
}

/// KT flux builder bound to one set of collaborators.
#[derive(Clone, Copy)]
pub struct KtFlux<'a> {
    eos: &'a dyn Eos,
    reconstruct: &'a dyn Reconstruct,
    geometry: GridGeometry,
    limiter: Minmod,
    delta_tau: f64,
    boost_invariant: bool,
}

impl std::fmt::Debug for KtFlux<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KtFlux")
            .field("geometry", &self.geometry)
            .field("limiter", &self.limiter)
            .field("delta_tau", &self.delta_tau)
            .field("boost_invariant", &self.boost_invariant)
            .finish_non_exhaustive()
    }
}

impl<'a> KtFlux<'a> {
    /// Bind a flux builder to its collaborators and step parameters.
    pub fn new(
        eos: &'a dyn Eos,
        reconstruct: &'a dyn Reconstruct,
        geometry: GridGeometry,
        limiter: Minmod,
        delta_tau: f64,
        boost_invariant: bool,
    ) -> Self {
        Self {
            eos,
            reconstruct,
            geometry,
            limiter,
            delta_tau,
            boost_invariant,
        }
    }

    /// Conserved vector `τ·(T^{τα}, J^τ)` of a cell.
    fn conserved(&self, tau: f64, cell: &FluidCell) -> TJbVec {
        let mut q = tjb_row(self.eos, &cell.primitive(), 0);
        for value in &mut q {
            *value *= tau;
        }
        q
    }

    fn reconstruct_at(
        &self,
        tau: f64,
        q: &TJbVec,
        guess: &FluidCell,
        flat: usize,
    ) -> Result<ReconstCell, StepError> {
        self.reconstruct
            .reconstruct(tau, q, guess)
            .map_err(|source| StepError::reconstruction(flat, source))
    }

    /// KT fluxes through both faces of `at` along `direction`.
    pub fn face_fluxes(
        &self,
        tau: f64,
        current: &Grid,
        at: CellIndex,
        direction: Direction,
    ) -> Result<FaceFluxes, StepError> {
        let flat = current.flat(at);
        let s = current.stencil(at, direction);
        let q_m2 = self.conserved(tau, s.m2);
        let q_m1 = self.conserved(tau, s.m1);
        let q_c = self.conserved(tau, s.c);
        let q_p1 = self.conserved(tau, s.p1);
        let q_p2 = self.conserved(tau, s.p2);

        let mut q_ph_l = [0.0; 5];
        let mut q_ph_r = [0.0; 5];
        let mut q_mh_l = [0.0; 5];
        let mut q_mh_r = [0.0; 5];
        for alpha in 0..5 {
            let slope_c = 0.5 * self.limiter.dx(q_p1[alpha], q_c[alpha], q_m1[alpha]);
            let slope_p1 = 0.5 * self.limiter.dx(q_p2[alpha], q_p1[alpha], q_c[alpha]);
            let slope_m1 = 0.5 * self.limiter.dx(q_c[alpha], q_m1[alpha], q_m2[alpha]);
            q_ph_l[alpha] = q_c[alpha] + slope_c;
            q_ph_r[alpha] = q_p1[alpha] - slope_p1;
            q_mh_l[alpha] = q_m1[alpha] + slope_m1;
            q_mh_r[alpha] = q_c[alpha] - slope_c;
        }

        let ph_l = self.reconstruct_at(tau, &q_ph_l, s.c, flat)?;
        let ph_r = self.reconstruct_at(tau, &q_ph_r, s.c, flat)?;
        let mh_l = self.reconstruct_at(tau, &q_mh_l, s.c, flat)?;
        let mh_r = self.reconstruct_at(tau, &q_mh_r, s.c, flat)?;

        let a_ph = max_speed(self.eos, tau, direction, &ph_l)?
            .max(max_speed(self.eos, tau, direction, &ph_r)?);
        let a_mh = max_speed(self.eos, tau, direction, &mh_l)?
            .max(max_speed(self.eos, tau, direction, &mh_r)?);

        let d = direction.component();
        let tau_fac = if direction.is_longitudinal() { 1.0 } else { tau };
        let f_ph_l = tjb_row(self.eos, &ph_l, d);
        let f_ph_r = tjb_row(self.eos, &ph_r, d);
        let f_mh_l = tjb_row(self.eos, &mh_l, d);
        let f_mh_r = tjb_row(self.eos, &mh_r, d);

        let mut out = FaceFluxes::default();
        for alpha in 0..5 {
            out.plus[alpha] = 0.5
                * ((f_ph_l[alpha] + f_ph_r[alpha]) * tau_fac
                    - a_ph * (q_ph_r[alpha] - q_ph_l[alpha]));
            out.minus[alpha] = 0.5
                * ((f_mh_l[alpha] + f_mh_r[alpha]) * tau_fac
                    - a_mh * (q_mh_r[alpha] - q_mh_l[alpha]));
        }
        Ok(out)
    }

    /// The KT right-hand side `Δτ·(-∂_i F^i + geometric terms)` at `at`.
    pub fn rhs(&self, tau: f64, current: &Grid, at: CellIndex) -> Result<TJbVec, StepError> {
        let mut rhs = [0.0; 5];
        let mut eta_faces = FaceFluxes::default();
        for direction in Direction::ALL {
            let faces = self.face_fluxes(tau, current, at, direction)?;
            let width = self.geometry.spacing(direction);
            for alpha in 0..5 {
                if direction.is_longitudinal() && (alpha == 0 || alpha == 3) {
                    continue;
                }
                rhs[alpha] += (faces.minus[alpha] - faces.plus[alpha]) / width * self.delta_tau;
            }
            if direction.is_longitudinal() {
                eta_faces = faces;
            }
        }

        let (ch, sh) = longitudinal_factors(self.geometry.delta_eta, self.boost_invariant);
        let (m, p) = (&eta_faces.minus, &eta_faces.plus);
        rhs[0] += ((m[0] - p[0]) * ch - (m[3] + p[3]) * sh) * self.delta_tau;
        rhs[3] += ((m[3] - p[3]) * ch - (m[0] + p[0]) * sh) * self.delta_tau;
        Ok(rhs)
    }

    /// `q + rhs`: the conserved vector of `at` advanced by one explicit
    /// Euler sub-step of the ideal equations.
    pub fn delta_qi(&self, tau: f64, current: &Grid, at: CellIndex) -> Result<TJbVec, StepError> {
        let mut q = self.conserved(tau, &current[at]);
        let rhs = self.rhs(tau, current, at)?;
        for (q, r) in q.iter_mut().zip(rhs) {
            *q += r;
        }
        Ok(q)
    }
}
