//! Sufficient causality conditions.
//!
//! Three affine conditions (`s₁`, `s₂`, `s₆`) give a first factor `β`
//! in closed form. Three nonlinear conditions (`s₅`, `s₇`, `s₈`) are then
//! evaluated at that `β`; each one that fails is bisected on `[0, β]`.
//! The nonlinear pass repeats until no condition lowers `β` further.

use smallvec::SmallVec;

use super::necessary::AffineCondition;
use super::{bisect, fold_candidates, CausalityReport, CausalityState, Condition, Couplings};

/// Bisection tolerance on `β`.
pub const BISECTION_TOLERANCE: f64 = 1e-4;

/// Below this `c_s²` a failed `s₅` bisection falls back to `β = 0`.
const SOFT_EOS_CS2: f64 = 0.15;

/// Upper bound on passes over the nonlinear conditions.
const MAX_SWEEPS: usize = 16;

/// The affine conditions `s₁, s₂, s₆` with their closed-form roots.
///
/// `s₁` keeps the signed `Λ₁` in its value while its root uses `-|Λ₁|`.
pub fn affine_conditions(state: &CausalityState, c: &Couplings) -> [(AffineCondition, f64); 3] {
    let cs2 = state.cs2;
    let pi = state.pi;
    let [l1, _, l3] = state.lambda;
    let abs_l1 = l1.abs();

    let s1 = 1.0 - c.s_relax - l1 + (1.0 - 0.5 * c.lambda_pi_bulk) * pi - 0.5 * c.tau_pipi * l3;
    let beta1 = (c.s_relax - 1.0)
        / (-abs_l1 + (1.0 - 0.5 * c.lambda_pi_bulk) * pi - 0.5 * c.tau_pipi * l3);

    let s2_viscous = c.lambda_pi_bulk * pi - c.tau_pipi * abs_l1;
    let s2_transport = 2.0 * c.s_relax;

    let s6_transport = 1.0 / 3.0 * c.s_relax + c.b_relax + cs2;
    let s6_viscous = (1.0 / 6.0 * c.lambda_pi_bulk + c.delta_bulk_bulk + cs2) * pi
        + (1.0 / 6.0 * c.tau_pipi - c.delta_pipi + c.lambda_bulk_pi - cs2) * abs_l1;

    [
        (
            AffineCondition {
                condition: Condition::S1,
                transport: 1.0 - c.s_relax,
                viscous: s1 - (1.0 - c.s_relax),
            },
            beta1,
        ),
        (
            AffineCondition {
                condition: Condition::S2,
                transport: s2_transport,
                viscous: s2_viscous,
            },
            -s2_transport / s2_viscous,
        ),
        (
            AffineCondition {
                condition: Condition::S6,
                transport: s6_transport,
                viscous: s6_viscous,
            },
            -s6_transport / s6_viscous,
        ),
    ]
}

/// `s₅(β)`.
pub fn suff5(beta: f64, state: &CausalityState, c: &Couplings) -> f64 {
    let cs2 = state.cs2;
    let pi = state.pi;
    let [l1, _, l3] = state.lambda;
    let abs_l1 = l1.abs();
    let cross = (c.delta_pipi - c.tau_pipi / 12.0) * (c.lambda_bulk_pi + cs2 - c.tau_pipi / 12.0);
    let l_sum = l3 + abs_l1;

    1.0 - cs2 - 4.0 / 3.0 * c.s_relax - c.b_relax
        - beta
            * ((cs2 - 1.0 + 2.0 / 3.0 * c.lambda_pi_bulk + c.delta_bulk_bulk) * pi
                + (c.delta_pipi + 1.0 / 3.0 * c.tau_pipi + c.lambda_bulk_pi + cs2) * l3
                + abs_l1)
        - beta * beta * cross * l_sum * l_sum
            / (1.0 - c.s_relax
                + beta * ((1.0 - 0.5 * c.lambda_pi_bulk) * pi - abs_l1 - 0.5 * c.tau_pipi * l3))
}

/// `s₇(β)`.
pub fn suff7(beta: f64, state: &CausalityState, c: &Couplings) -> f64 {
    let cs2 = state.cs2;
    let pi = state.pi;
    let [l1, _, l3] = state.lambda;
    let abs_l1 = l1.abs();
    let cross = (c.delta_pipi - c.tau_pipi / 12.0) * (c.lambda_bulk_pi + cs2 - c.tau_pipi / 12.0);
    let l_sum = l3 + abs_l1;
    let shear = c.s_relax + beta * (0.5 * c.lambda_pi_bulk * pi - 0.5 * c.tau_pipi * abs_l1);

    shear * shear - beta * beta * cross * l_sum * l_sum
}

/// `s₈(β)`.
pub fn suff8(beta: f64, state: &CausalityState, c: &Couplings) -> f64 {
    let cs2 = state.cs2;
    let pi = state.pi;
    let [l1, l2, l3] = state.lambda;
    let abs_l1 = l1.abs();
    let lowest = 1.0 + beta * (pi - abs_l1);

    4.0 / 3.0 * c.s_relax + c.b_relax + cs2
        + beta
            * ((2.0 / 3.0 * c.lambda_pi_bulk + c.delta_bulk_bulk + cs2) * pi
                - (c.delta_pipi + 1.0 / 3.0 * c.tau_pipi - c.lambda_bulk_pi + cs2) * abs_l1)
        - (1.0 + beta * (pi + l2)) * (1.0 + beta * (pi + l3)) / 3.0 / lowest / lowest
            * (1.0 + 2.0 * c.s_relax
                + beta * ((1.0 + c.lambda_pi_bulk) * pi - pi.abs() + c.tau_pipi * l3))
}

/// Check the sufficient conditions and compute the rescaling factor.
pub fn check(state: &CausalityState, couplings: &Couplings) -> CausalityReport {
    let mut violated = SmallVec::new();
    let mut candidates = [1.0; 3];
    for (slot, (cond, root)) in candidates
        .iter_mut()
        .zip(affine_conditions(state, couplings))
    {
        if cond.value() < 0.0 {
            violated.push(cond.condition);
            *slot = root;
        }
    }
    let mut beta = fold_candidates(candidates);

    let nonlinear: [(Condition, fn(f64, &CausalityState, &Couplings) -> f64); 3] = [
        (Condition::S5, suff5),
        (Condition::S7, suff7),
        (Condition::S8, suff8),
    ];
    // A smaller β can break a condition that held at the larger one (s₅
    // has a pole), so sweep until β stops moving.
    for _ in 0..MAX_SWEEPS {
        let start = beta;
        for (condition, suff) in nonlinear {
            if suff(beta, state, couplings) >= 0.0 {
                continue;
            }
            if !violated.contains(&condition) {
                violated.push(condition);
            }
            let f = |b: f64| suff(b, state, couplings);
            match bisect(0.0, beta, BISECTION_TOLERANCE, f) {
                Some(root) => beta = root,
                None if condition == Condition::S5 && state.cs2 < SOFT_EOS_CS2 => beta = 0.0,
                None => log::warn!("{condition:?} bisection found no sign change on [0, {beta}]"),
            }
        }
        if beta == start {
            break;
        }
    }

    CausalityReport {
        factor: beta,
        violated,
    }
}
