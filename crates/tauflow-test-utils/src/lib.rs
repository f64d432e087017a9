//! Test utilities and stand-in physics for tauflow development.
//!
//! Provides analytic implementations of the collaborator traits
//! ([`Eos`], [`TransportCoeffs`], [`Reconstruct`], [`SourceProvider`],
//! [`DissipativeTerms`], [`Kinematics`]) and grid fixtures for
//! constructing test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use tauflow_core::{
    map_2d_idx_to_1d, Eos, FlowVec, FluidCell, KinematicBundle, ReconstCell, ReconstructError,
    Reconstruct, RkStage, SourceProvider, TJbVec, TransportCoeffs,
};
use tauflow_grid::{CellIndex, DissipativeTerms, EdgeBehavior, Grid, GridDims, Kinematics};

// ── Equation of state ──────────────────────────────────────────────

/// `P = c_s²·ε`, independent of `ρ_B`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearEos {
    pub cs2: f64,
}

impl LinearEos {
    /// Massless ideal gas.
    pub const CONFORMAL: Self = Self::new(1.0 / 3.0);

    pub const fn new(cs2: f64) -> Self {
        Self { cs2 }
    }
}

impl Eos for LinearEos {
    fn pressure(&self, e: f64, _rhob: f64) -> f64 {
        self.cs2 * e
    }

    fn cs2(&self, _e: f64, _rhob: f64) -> f64 {
        self.cs2
    }

    fn dpde(&self, _e: f64, _rhob: f64) -> f64 {
        self.cs2
    }

    fn dpdrhob(&self, _e: f64, _rhob: f64) -> f64 {
        0.0
    }
}

// ── Transport ──────────────────────────────────────────────────────

/// Constant relaxation-time factors with the kinetic-theory couplings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantTransport {
    pub shear_relax_time_factor: f64,
    pub bulk_relax_time_factor: f64,
}

impl Default for ConstantTransport {
    fn default() -> Self {
        Self {
            shear_relax_time_factor: 5.0,
            bulk_relax_time_factor: 14.55,
        }
    }
}

impl TransportCoeffs for ConstantTransport {
    fn shear_relax_time_factor(&self) -> f64 {
        self.shear_relax_time_factor
    }

    fn bulk_relax_time_factor(&self) -> f64 {
        self.bulk_relax_time_factor
    }
}

// ── Reconstruction ─────────────────────────────────────────────────

/// Closed-form inversion for [`LinearEos`].
///
/// With `P = c·ε` the flow speed solves `c·M·v² - (1 + c)·E·v + M = 0`
/// for `E = T^{ττ}` and `M = |T^{τi}|`, so no root finder is needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearReconstruct {
    eos: LinearEos,
}

impl LinearReconstruct {
    pub fn new(eos: LinearEos) -> Self {
        Self { eos }
    }
}

impl Reconstruct for LinearReconstruct {
    fn reconstruct(
        &self,
        tau: f64,
        q: &TJbVec,
        _guess: &FluidCell,
    ) -> Result<ReconstCell, ReconstructError> {
        let c = self.eos.cs2;
        let big_e = q[0] / tau;
        let m_vec = [q[1] / tau, q[2] / tau, q[3] / tau];
        let j0 = q[4] / tau;
        let m = (m_vec[0] * m_vec[0] + m_vec[1] * m_vec[1] + m_vec[2] * m_vec[2]).sqrt();

        if !(big_e > 0.0) {
            return Err(ReconstructError::NonPhysical {
                reason: format!("T^tautau = {big_e} is not positive"),
            });
        }
        if !(m < big_e) {
            return Err(ReconstructError::NonPhysical {
                reason: format!("|M| = {m} >= E = {big_e}"),
            });
        }

        let v = if m == 0.0 {
            0.0
        } else if c == 0.0 {
            m / big_e
        } else {
            let b = (1.0 + c) * big_e;
            (b - (b * b - 4.0 * c * m * m).sqrt()) / (2.0 * c * m)
        };
        let e = big_e - v * m;
        let u0 = 1.0 / (1.0 - v * v).sqrt();
        let mut u: FlowVec = [u0, 0.0, 0.0, 0.0];
        if m > 0.0 {
            for (slot, mi) in u[1..].iter_mut().zip(m_vec) {
                *slot = u0 * v * mi / m;
            }
        }
        Ok(ReconstCell {
            e,
            rhob: j0 / u0,
            u,
        })
    }
}

// ── Sources ────────────────────────────────────────────────────────

/// Spatially constant external sources.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantSources {
    pub j: [f64; 4],
    pub rhob: f64,
    pub active: bool,
}

impl ConstantSources {
    /// A provider that reports no sources.
    pub fn none() -> Self {
        Self {
            j: [0.0; 4],
            rhob: 0.0,
            active: false,
        }
    }

    pub fn new(j: [f64; 4], rhob: f64) -> Self {
        Self {
            j,
            rhob,
            active: true,
        }
    }
}

impl SourceProvider for ConstantSources {
    fn has_sources(&self) -> bool {
        self.active
    }

    fn energy_momentum_source(&self, _tau: f64, _x: f64, _y: f64, _eta: f64, _u: &FlowVec) -> [f64; 4] {
        self.j
    }

    fn baryon_source(&self, _tau: f64, _x: f64, _y: f64, _eta: f64, _u: &FlowVec) -> f64 {
        self.rhob
    }
}

// ── Dissipative terms ──────────────────────────────────────────────

/// Dissipative terms that contribute nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NullDissipativeTerms;

impl DissipativeTerms for NullDissipativeTerms {
    fn w_divergence(&self, _tau: f64, _current: &Grid, _previous: &Grid, _at: CellIndex) -> TJbVec {
        [0.0; 5]
    }

    fn shear_rhs(
        &self,
        _tau: f64,
        _current: &Grid,
        _at: CellIndex,
        _mu: usize,
        _nu: usize,
        _kin: &KinematicBundle,
    ) -> f64 {
        0.0
    }

    fn shear_source(
        &self,
        _tau: f64,
        _current: &FluidCell,
        _previous: &FluidCell,
        _mu: usize,
        _nu: usize,
        _stage: RkStage,
        _kin: &KinematicBundle,
    ) -> f64 {
        0.0
    }

    fn bulk_rhs(&self, _tau: f64, _current: &Grid, _at: CellIndex, _kin: &KinematicBundle) -> f64 {
        0.0
    }

    fn bulk_source(
        &self,
        _tau: f64,
        _current: &FluidCell,
        _previous: &FluidCell,
        _stage: RkStage,
        _kin: &KinematicBundle,
    ) -> f64 {
        0.0
    }

    fn diffusion_rhs(&self, _tau: f64, _current: &Grid, _at: CellIndex, _nu: usize) -> f64 {
        0.0
    }

    fn diffusion_source(
        &self,
        _tau: f64,
        _current: &FluidCell,
        _previous: &FluidCell,
        _nu: usize,
        _stage: RkStage,
        _kin: &KinematicBundle,
    ) -> f64 {
        0.0
    }
}

/// Pure relaxation `dX/dτ = -X/τ_r` of every current, with no fluxes
/// and no feedback on the ideal part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxationTerms {
    pub relax_time: f64,
}

impl RelaxationTerms {
    pub fn new(relax_time: f64) -> Self {
        Self { relax_time }
    }
}

impl DissipativeTerms for RelaxationTerms {
    fn w_divergence(&self, _tau: f64, _current: &Grid, _previous: &Grid, _at: CellIndex) -> TJbVec {
        [0.0; 5]
    }

    fn shear_rhs(
        &self,
        _tau: f64,
        _current: &Grid,
        _at: CellIndex,
        _mu: usize,
        _nu: usize,
        _kin: &KinematicBundle,
    ) -> f64 {
        0.0
    }

    fn shear_source(
        &self,
        _tau: f64,
        current: &FluidCell,
        _previous: &FluidCell,
        mu: usize,
        nu: usize,
        _stage: RkStage,
        _kin: &KinematicBundle,
    ) -> f64 {
        -current.w[map_2d_idx_to_1d(mu, nu)] / self.relax_time
    }

    fn bulk_rhs(&self, _tau: f64, _current: &Grid, _at: CellIndex, _kin: &KinematicBundle) -> f64 {
        0.0
    }

    fn bulk_source(
        &self,
        _tau: f64,
        current: &FluidCell,
        _previous: &FluidCell,
        _stage: RkStage,
        _kin: &KinematicBundle,
    ) -> f64 {
        -current.pi_b / self.relax_time
    }

    fn diffusion_rhs(&self, _tau: f64, _current: &Grid, _at: CellIndex, _nu: usize) -> f64 {
        0.0
    }

    fn diffusion_source(
        &self,
        _tau: f64,
        current: &FluidCell,
        _previous: &FluidCell,
        nu: usize,
        _stage: RkStage,
        _kin: &KinematicBundle,
    ) -> f64 {
        -current.diffusion(nu) / self.relax_time
    }
}

// ── Kinematics ─────────────────────────────────────────────────────

/// The same kinematic bundle for every cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrozenKinematics(pub KinematicBundle);

impl FrozenKinematics {
    pub fn at_rest() -> Self {
        Self(KinematicBundle::at_rest())
    }

    pub fn bjorken(tau: f64) -> Self {
        Self(KinematicBundle::bjorken(tau))
    }
}

impl Kinematics for FrozenKinematics {
    fn compute(&self, _tau: f64, _previous: &Grid, _current: &Grid, _at: CellIndex) -> KinematicBundle {
        self.0
    }
}

// ── Grid fixtures ──────────────────────────────────────────────────

/// A grid with every cell at rest at `(ε, ρ_B)`.
pub fn uniform_grid(dims: GridDims, epsilon: f64, rhob: f64) -> Grid {
    Grid::filled(dims, EdgeBehavior::Clamp, FluidCell::at_rest(epsilon, rhob))
        .expect("fixture dims must be non-zero")
}

/// A fluid at rest with a Gaussian energy bump of relative height
/// `amplitude` on a background `epsilon`, centred in the transverse
/// plane and uniform in `η`.
pub fn gaussian_profile(
    dims: GridDims,
    edge: EdgeBehavior,
    epsilon: f64,
    amplitude: f64,
    width_cells: f64,
) -> Grid {
    let cx = (dims.nx as f64 - 1.0) / 2.0;
    let cy = (dims.ny as f64 - 1.0) / 2.0;
    Grid::from_fn(dims, edge, |at| {
        let dx = at.ix as f64 - cx;
        let dy = at.iy as f64 - cy;
        let r2 = (dx * dx + dy * dy) / (width_cells * width_cells);
        FluidCell::at_rest(epsilon * (1.0 + amplitude * (-0.5 * r2).exp()), 0.0)
    })
    .expect("fixture dims must be non-zero")
}

/// Minimum and maximum energy density over a grid.
pub fn energy_range(grid: &Grid) -> (f64, f64) {
    grid.cells()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.epsilon), hi.max(c.epsilon))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_reconstruct_inverts_a_moving_state() {
        let eos = LinearEos::CONFORMAL;
        let cell = ReconstCell {
            e: 2.0,
            rhob: 0.3,
            u: [1.25, 0.6, -0.3, (1.25f64 * 1.25 - 1.0 - 0.36 - 0.09).sqrt()],
        };
        let tau = 0.8;
        let p = eos.pressure(cell.e, cell.rhob);
        let h = cell.e + p;
        let mut q = [0.0; 5];
        q[0] = tau * (h * cell.u[0] * cell.u[0] - p);
        for i in 1..4 {
            q[i] = tau * h * cell.u[0] * cell.u[i];
        }
        q[4] = tau * cell.rhob * cell.u[0];

        let out = LinearReconstruct::new(eos)
            .reconstruct(tau, &q, &FluidCell::default())
            .unwrap();
        assert!((out.e - cell.e).abs() < 1e-12);
        assert!((out.rhob - cell.rhob).abs() < 1e-12);
        for (a, b) in out.u.iter().zip(cell.u) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn negative_energy_is_rejected() {
        let r = LinearReconstruct::new(LinearEos::CONFORMAL);
        assert!(r
            .reconstruct(1.0, &[-1.0, 0.0, 0.0, 0.0, 0.0], &FluidCell::default())
            .is_err());
    }
}
