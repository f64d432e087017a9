//! Necessary causality conditions.
//!
//! Each condition has the form `n = T + V(Π, Λ)` with a transport part
//! `T` and a part `V` linear in the currents. A violated condition is
//! restored by the factor `α = -T/V` at which `n` vanishes.

use smallvec::SmallVec;

use super::{fold_candidates, CausalityReport, CausalityState, Condition, Couplings};

/// One affine condition split into its transport and viscous parts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineCondition {
    /// Which condition this is.
    pub condition: Condition,
    /// Current-independent part.
    pub transport: f64,
    /// Part linear in `(Π, Λ)`.
    pub viscous: f64,
}

impl AffineCondition {
    /// Value of the condition; causal when non-negative.
    pub fn value(&self) -> f64 {
        self.transport + self.viscous
    }

    /// Factor at which the condition vanishes.
    pub fn root(&self) -> f64 {
        -self.transport / self.viscous
    }
}

/// The four necessary conditions `n₁, n₃, n₅, n₆` of a state.
pub fn conditions(state: &CausalityState, c: &Couplings) -> [AffineCondition; 4] {
    let cs2 = state.cs2;
    let pi = state.pi;
    let [l1, _, l3] = state.lambda;

    let t13 = 2.0 * c.s_relax;
    let v1_13 = c.lambda_pi_bulk;
    let v2_13 = -0.5 * c.tau_pipi;
    let t56 = cs2 + 4.0 / 3.0 * c.s_relax + c.b_relax;
    let v1_56 = 2.0 / 3.0 * c.lambda_pi_bulk + c.delta_bulk_bulk + cs2;
    let v2_56 = c.delta_pipi + 1.0 / 3.0 * c.tau_pipi + c.lambda_bulk_pi * (1.0 / 3.0 - cs2) + cs2;

    [
        AffineCondition {
            condition: Condition::N1,
            transport: t13,
            viscous: v1_13 * pi + v2_13 * l1.abs(),
        },
        AffineCondition {
            condition: Condition::N3,
            transport: t13,
            viscous: v1_13 * pi + v2_13 * l3,
        },
        AffineCondition {
            condition: Condition::N5,
            transport: t56,
            viscous: v1_56 * pi + v2_56 * l1,
        },
        AffineCondition {
            condition: Condition::N6,
            transport: 1.0 - t56,
            viscous: (1.0 - v1_56) * pi + (1.0 - v2_56) * l3,
        },
    ]
}

/// Check the necessary conditions and compute the rescaling factor.
pub fn check(state: &CausalityState, couplings: &Couplings) -> CausalityReport {
    let mut violated = SmallVec::new();
    let mut candidates = [1.0; 4];
    for (slot, cond) in candidates.iter_mut().zip(conditions(state, couplings)) {
        if cond.value() < 0.0 {
            violated.push(cond.condition);
            *slot = cond.root();
        }
    }
    CausalityReport {
        factor: fold_candidates(candidates),
        violated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tauflow_test_utils::ConstantTransport;

    fn couplings(cs2: f64) -> Couplings {
        Couplings::new(&ConstantTransport::default(), cs2)
    }

    fn state(pi: f64, l1: f64, l3: f64) -> CausalityState {
        CausalityState {
            cs2: 1.0 / 3.0,
            pi,
            lambda: [l1, -l1 - l3, l3],
        }
    }

    #[test]
    fn equilibrium_is_causal() {
        let report = check(&state(0.0, 0.0, 0.0), &couplings(1.0 / 3.0));
        assert!(report.is_causal());
        assert_eq!(report.factor, 1.0);
    }

    #[test]
    fn large_positive_eigenvalue_violates_n3() {
        // n₃ = 2/5 - (5/7)·Λ₃ < 0 for Λ₃ = 1.
        let c = couplings(1.0 / 3.0);
        let report = check(&state(0.0, -0.5, 1.0), &c);
        assert!(report.violated.contains(&Condition::N3));
        assert!(report.factor > 0.0 && report.factor < 1.0);

        let expected = 2.0 * c.s_relax / (0.5 * c.tau_pipi);
        assert!(report.factor <= expected + 1e-15);
    }

    #[test]
    fn rescaled_state_satisfies_every_condition() {
        let c = couplings(1.0 / 3.0);
        let s = state(-0.2, -0.9, 1.1);
        let report = check(&s, &c);
        let f = report.factor;
        let scaled = CausalityState {
            pi: s.pi * f,
            lambda: s.lambda.map(|l| l * f),
            ..s
        };
        for cond in conditions(&scaled, &c) {
            assert!(cond.value() >= -1e-12, "{:?} = {}", cond.condition, cond.value());
        }
    }
}
