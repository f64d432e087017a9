//! The [`FluidCell`] state layout and its flat-index helpers.
//!
//! A cell stores the ideal variables (`epsilon`, `rhob`, `u`) next to the
//! dissipative currents. The shear-stress tensor and the baryon-diffusion
//! current share one flat array:
//!
//! ```text
//! index  0      1   2   3      4   5   6   7   8   9     10  11  12  13
//!        ττ     τx  τy  τη     xx  xy  xη  yy  yη  ηη    q^τ q^x q^y q^η
//!        └──────────── shear π^{μν} ─────────────────┘   └─ diffusion ─┘
//! ```

use std::fmt;

/// Energy-momentum plus net-baryon vector (`T^{τμ}` for `μ = 0..4`, `J^τ`).
pub type TJbVec = [f64; 5];

/// Contravariant flow four-velocity `u^μ`.
pub type FlowVec = [f64; 4];

/// Number of independent shear entries (symmetric 4×4 upper triangle).
pub const SHEAR_LEN: usize = 10;

/// Flat offset of the diffusion current `q^μ` in [`FluidCell::w`].
pub const DIFFUSION_OFFSET: usize = 10;

/// Total length of the dissipative array: shear plus diffusion.
pub const W_LEN: usize = 14;

const IDX_2D_TO_1D: [[usize; 4]; 5] = [
    [0, 1, 2, 3],
    [1, 4, 5, 6],
    [2, 5, 7, 8],
    [3, 6, 8, 9],
    [10, 11, 12, 13],
];

const IDX_1D_TO_2D: [(usize, usize); W_LEN] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 2),
    (2, 3),
    (3, 3),
    (4, 0),
    (4, 1),
    (4, 2),
    (4, 3),
];

/// Map a `(μ, ν)` pair to the flat dissipative index.
///
/// `μ ∈ 0..4` addresses the symmetric shear tensor (so `(1, 0)` and
/// `(0, 1)` map to the same slot). `μ = 4` addresses the diffusion
/// current, `ν ∈ 0..4`.
///
/// # Panics
///
/// Panics if `μ > 4` or `ν > 3`.
pub fn map_2d_idx_to_1d(mu: usize, nu: usize) -> usize {
    IDX_2D_TO_1D[mu][nu]
}

/// Inverse of [`map_2d_idx_to_1d`] returning the upper-triangle pair.
///
/// # Panics
///
/// Panics if `idx >= W_LEN`.
pub fn map_1d_idx_to_2d(idx: usize) -> (usize, usize) {
    IDX_1D_TO_2D[idx]
}

/// Runge-Kutta sub-step of the Heun predictor-corrector scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RkStage {
    /// First sub-step: advance from the current generation.
    Predictor,
    /// Second sub-step: advance the prediction and average with the
    /// stored start-of-step state.
    Corrector,
}

impl RkStage {
    /// The stage as the numeric flag `0.0` / `1.0` used in the update
    /// formulas `(prediction + flag·previous) / (1 + flag)`.
    pub fn as_flag(self) -> f64 {
        match self {
            Self::Predictor => 0.0,
            Self::Corrector => 1.0,
        }
    }
}

impl fmt::Display for RkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predictor => write!(f, "predictor"),
            Self::Corrector => write!(f, "corrector"),
        }
    }
}

/// Primitive state produced by conserved→primitive reconstruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconstCell {
    /// Local rest-frame energy density.
    pub e: f64,
    /// Local rest-frame net baryon density.
    pub rhob: f64,
    /// Flow four-velocity.
    pub u: FlowVec,
}

/// Hydrodynamic state at one grid point.
///
/// `lambdas` is derived data: the dissipative stepper recomputes it from
/// the shear tensor every step and nothing else writes it except the
/// uniform rescalings, which scale it together with `w`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidCell {
    /// Local rest-frame energy density.
    pub epsilon: f64,
    /// Local rest-frame net baryon density.
    pub rhob: f64,
    /// Flow four-velocity, `u^μ u_μ = -1`.
    pub u: FlowVec,
    /// Shear-stress tensor (0..10) and diffusion current (10..14).
    pub w: [f64; W_LEN],
    /// Bulk viscous pressure.
    pub pi_b: f64,
    /// Minimum, middle (`-min - max`), and maximum shear eigenvalue.
    pub lambdas: [f64; 3],
}

impl Default for FluidCell {
    fn default() -> Self {
        Self {
            epsilon: 0.0,
            rhob: 0.0,
            u: [1.0, 0.0, 0.0, 0.0],
            w: [0.0; W_LEN],
            pi_b: 0.0,
            lambdas: [0.0; 3],
        }
    }
}

impl FluidCell {
    /// A cell at rest with the given densities and no dissipative currents.
    pub fn at_rest(epsilon: f64, rhob: f64) -> Self {
        Self {
            epsilon,
            rhob,
            ..Self::default()
        }
    }

    /// The ideal part of the cell as a [`ReconstCell`].
    pub fn primitive(&self) -> ReconstCell {
        ReconstCell {
            e: self.epsilon,
            rhob: self.rhob,
            u: self.u,
        }
    }

    /// Overwrite the ideal part of the cell.
    pub fn set_primitive(&mut self, p: &ReconstCell) {
        self.epsilon = p.e;
        self.rhob = p.rhob;
        self.u = p.u;
    }

    /// Shear component `π^{μν}` for `μ, ν ∈ 0..4`.
    pub fn shear(&self, mu: usize, nu: usize) -> f64 {
        self.w[map_2d_idx_to_1d(mu, nu)]
    }

    /// Diffusion component `q^ν`.
    pub fn diffusion(&self, nu: usize) -> f64 {
        self.w[DIFFUSION_OFFSET + nu]
    }

    /// Multiply every dissipative quantity by `factor`.
    ///
    /// Applies to `pi_b`, all of `w`, and all of `lambdas`, so the
    /// algebraic invariants of the shear tensor survive the scaling.
    pub fn scale_dissipative(&mut self, factor: f64) {
        self.pi_b *= factor;
        for w in &mut self.w {
            *w *= factor;
        }
        for lam in &mut self.lambdas {
            *lam *= factor;
        }
    }

    /// `u^μ u_μ` under the `(-,+,+,+)` signature. Equals `-1` for a valid cell.
    pub fn u_norm(&self) -> f64 {
        -self.u[0] * self.u[0] + self.u[1] * self.u[1] + self.u[2] * self.u[2] + self.u[3] * self.u[3]
    }

    /// `u_μ π^{μν}` for each `ν`. Zero for a transverse shear tensor.
    pub fn shear_transversality(&self) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (nu, slot) in out.iter_mut().enumerate() {
            let mut sum = -self.u[0] * self.shear(0, nu);
            for mu in 1..4 {
                sum += self.u[mu] * self.shear(mu, nu);
            }
            *slot = sum;
        }
        out
    }

    /// Trace `π^μ_μ` under the `(-,+,+,+)` signature.
    pub fn shear_trace(&self) -> f64 {
        -self.w[0] + self.w[4] + self.w[7] + self.w[9]
    }
}
