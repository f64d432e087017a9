//! Causality enforcement on the dissipative currents.
//!
//! Second-order viscous hydrodynamics is only causal while the shear
//! eigenvalues and the bulk pressure stay small compared to `ε + P`. Two
//! families of inequalities in `(Π, Λ₁, Λ₂, Λ₃)`, all normalized by the
//! enthalpy density, bound the admissible region:
//!
//! - [`necessary`]: four affine conditions; violations are resolved in
//!   closed form.
//! - [`sufficient`]: three affine conditions followed by three nonlinear
//!   ones resolved by [`bisect`].
//!
//! Either variant yields one factor in `[0, 1]` that scales `Π`, every
//! entry of `W`, and the eigenvalues together. Scaling by `β` maps every
//! condition to its value at `β` on the unscaled state, which is what
//! makes the root of a condition the right rescaling factor.

mod bisection;
pub mod necessary;
pub mod sufficient;

use smallvec::SmallVec;
use tauflow_core::{Eos, FluidCell, TransportCoeffs};

use crate::config::CausalityMethod;

pub use bisection::bisect;

/// One causality inequality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Necessary `n₁` (shear modes, `|Λ₁|`).
    N1,
    /// Necessary `n₃` (shear modes, `Λ₃`).
    N3,
    /// Necessary `n₅` (sound modes, lower bound).
    N5,
    /// Necessary `n₆` (sound modes, upper bound).
    N6,
    /// Sufficient `s₁`.
    S1,
    /// Sufficient `s₂`.
    S2,
    /// Sufficient `s₆`.
    S6,
    /// Sufficient `s₅`, nonlinear in the rescaling.
    S5,
    /// Sufficient `s₇`, nonlinear in the rescaling.
    S7,
    /// Sufficient `s₈`, nonlinear in the rescaling.
    S8,
}

/// Outcome of one causality check.
#[derive(Clone, Debug, PartialEq)]
pub struct CausalityReport {
    /// Rescaling factor in `[0, 1]`; `1` leaves the cell untouched.
    pub factor: f64,
    /// Conditions found violated before rescaling, in evaluation order.
    pub violated: SmallVec<[Condition; 4]>,
}

impl CausalityReport {
    /// A report for a cell that satisfies every condition.
    pub fn causal() -> Self {
        Self {
            factor: 1.0,
            violated: SmallVec::new(),
        }
    }

    /// Whether the cell was already causal.
    pub fn is_causal(&self) -> bool {
        self.violated.is_empty()
    }
}

/// Dissipative state of a cell normalized by the enthalpy density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CausalityState {
    /// Squared speed of sound.
    pub cs2: f64,
    /// `Π / (ε + P)`.
    pub pi: f64,
    /// `Λᵢ / (ε + P)` for the ordered shear eigenvalues.
    pub lambda: [f64; 3],
}

impl CausalityState {
    /// Normalize the currents of `cell`.
    pub fn of(cell: &FluidCell, eos: &dyn Eos) -> Self {
        let h = cell.epsilon + eos.pressure(cell.epsilon, cell.rhob);
        Self {
            cs2: eos.cs2(cell.epsilon, cell.rhob),
            pi: cell.pi_b / h,
            lambda: cell.lambdas.map(|l| l / h),
        }
    }
}

/// Transport coefficients entering the causality conditions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Couplings {
    /// `1 / shear_relax_time_factor`.
    pub s_relax: f64,
    /// `(1 / bulk_relax_time_factor)·(1/3 - c_s²)²`.
    pub b_relax: f64,
    /// `τ_ππ`.
    pub tau_pipi: f64,
    /// `δ_ππ`.
    pub delta_pipi: f64,
    /// `λ_πΠ`.
    pub lambda_pi_bulk: f64,
    /// `λ_Ππ`.
    pub lambda_bulk_pi: f64,
    /// `δ_ΠΠ`.
    pub delta_bulk_bulk: f64,
}

impl Couplings {
    /// Collect the couplings at squared sound speed `cs2`.
    pub fn new(transport: &dyn TransportCoeffs, cs2: f64) -> Self {
        let conformal_breaking = 1.0 / 3.0 - cs2;
        Self {
            s_relax: 1.0 / transport.shear_relax_time_factor(),
            b_relax: conformal_breaking * conformal_breaking / transport.bulk_relax_time_factor(),
            tau_pipi: transport.tau_pipi(),
            delta_pipi: transport.delta_pipi(),
            lambda_pi_bulk: transport.lambda_pi_bulk(),
            lambda_bulk_pi: transport.lambda_bulk_pi(),
            delta_bulk_bulk: transport.delta_bulk_bulk(),
        }
    }
}

/// Fold affine-root candidates into one factor.
///
/// Starts at `1`; a positive candidate below the running minimum
/// replaces it, a negative candidate forces `0`.
pub(crate) fn fold_candidates(candidates: impl IntoIterator<Item = f64>) -> f64 {
    let mut min = 1.0;
    for candidate in candidates {
        if candidate > 0.0 && candidate < min {
            min = candidate;
        } else if candidate < 0.0 {
            min = 0.0;
        }
    }
    min
}

/// Run the configured causality check on `cell` and apply its factor.
///
/// Returns `None` when the method is [`CausalityMethod::None`].
pub fn enforce(
    method: CausalityMethod,
    cell: &mut FluidCell,
    eos: &dyn Eos,
    transport: &dyn TransportCoeffs,
) -> Option<CausalityReport> {
    let state = CausalityState::of(cell, eos);
    let couplings = Couplings::new(transport, state.cs2);
    let report = match method {
        CausalityMethod::None => return None,
        CausalityMethod::Necessary => necessary::check(&state, &couplings),
        CausalityMethod::Sufficient => sufficient::check(&state, &couplings),
    };
    cell.scale_dissipative(report.factor);
    Some(report)
}
