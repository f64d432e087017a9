//! Integration test: homogeneous fluids in Milne coordinates.
//!
//! A homogeneous fluid at rest is not stationary in `(τ, x, y, η)`: the
//! longitudinal expansion does `P·dτ` of work per unit `τ·dη`. Dust has
//! no pressure and keeps `τ·ε` fixed; a conformal fluid follows the
//! Bjorken solution `ε ∝ τ^{-4/3}`.

use std::sync::Arc;

use tauflow_advance::{
    Advance, AdvanceConfig, Collaborators, DiagnosticsConfig, GridGeometry, ViscosityFlags,
};
use tauflow_core::FluidCell;
use tauflow_grid::{DissipativeTerms, EdgeBehavior, Grid, GridDims, GridRing};
use tauflow_test_utils::{
    ConstantSources, ConstantTransport, FrozenKinematics, LinearEos, LinearReconstruct,
    NullDissipativeTerms, RelaxationTerms,
};

const DELTA_TAU: f64 = 0.01;

fn advance(eos: LinearEos, dims: GridDims, viscosity: ViscosityFlags) -> Advance {
    let mut config = AdvanceConfig::new(GridGeometry::centred(dims, 0.1, 0.1, 0.1), DELTA_TAU);
    config.boost_invariant = true;
    config.viscosity = viscosity;
    config.diagnostics = DiagnosticsConfig::disabled();
    let physics = Collaborators {
        eos: Arc::new(eos),
        transport: Arc::new(ConstantTransport::default()),
        reconstruct: Arc::new(LinearReconstruct::new(eos)),
        sources: Arc::new(ConstantSources::none()),
        dissipative: if viscosity.any() {
            Arc::new(RelaxationTerms::new(0.5)) as Arc<dyn DissipativeTerms>
        } else {
            Arc::new(NullDissipativeTerms)
        },
        kinematics: Arc::new(FrozenKinematics::at_rest()),
    };
    Advance::new(config, physics).unwrap()
}

fn wrapped(dims: GridDims, epsilon: f64) -> Grid {
    Grid::filled(dims, EdgeBehavior::Wrap, FluidCell::at_rest(epsilon, 0.0)).unwrap()
}

fn assert_homogeneous_at_rest(grid: &Grid, expected: f64, tolerance: f64) {
    for cell in grid.cells() {
        assert!(
            (cell.epsilon - expected).abs() < tolerance,
            "epsilon {} vs {expected}",
            cell.epsilon
        );
        for component in &cell.u[1..] {
            assert!(component.abs() < 1e-12, "u = {:?}", cell.u);
        }
    }
}

#[test]
fn dust_keeps_tau_epsilon_over_many_steps() {
    let dims = GridDims::new(4, 4, 2);
    let step = advance(LinearEos::new(0.0), dims, ViscosityFlags::ideal());
    let mut ring = GridRing::new(wrapped(dims, 3.0));

    let mut tau = 0.6;
    for _ in 0..20 {
        step.advance_rk(tau, &mut ring).unwrap();
        tau += DELTA_TAU;
    }
    assert_homogeneous_at_rest(ring.current(), 3.0 * 0.6 / tau, 1e-12);
}

#[test]
fn conformal_fluid_pays_longitudinal_work_in_one_step() {
    let dims = GridDims::new(4, 4, 1);
    let step = advance(LinearEos::CONFORMAL, dims, ViscosityFlags::ideal());
    let mut ring = GridRing::new(wrapped(dims, 1.0));
    step.advance_rk(1.0, &mut ring).unwrap();

    // Predictor: τ'ε* = τε - P·Δτ. Corrector averages with the start.
    let tau_next = 1.0 + DELTA_TAU;
    let e_star = (1.0 - DELTA_TAU / 3.0) / tau_next;
    let q_corrected = tau_next * e_star - e_star / 3.0 * DELTA_TAU;
    let expected = 0.5 * (q_corrected + 1.0) / tau_next;
    assert_homogeneous_at_rest(ring.current(), expected, 1e-12);
}

#[test]
fn conformal_fluid_follows_bjorken_cooling() {
    let dims = GridDims::new(3, 3, 1);
    let step = advance(LinearEos::CONFORMAL, dims, ViscosityFlags::ideal());
    let mut ring = GridRing::new(wrapped(dims, 1.0));

    let mut tau = 1.0;
    for _ in 0..50 {
        step.advance_rk(tau, &mut ring).unwrap();
        tau += DELTA_TAU;
    }
    let expected = tau.powf(-4.0 / 3.0);
    assert_homogeneous_at_rest(ring.current(), expected, 1e-4 * expected);
}

#[test]
fn relaxing_viscous_fluid_stays_homogeneous() {
    let dims = GridDims::new(3, 3, 1);
    let step = advance(LinearEos::CONFORMAL, dims, ViscosityFlags::shear_and_bulk());
    let mut start = wrapped(dims, 1.0);
    for cell in start.cells_mut() {
        cell.w[4] = 0.02;
        cell.w[7] = 0.02;
        cell.w[9] = -0.04;
        cell.pi_b = -0.01;
    }
    let mut ring = GridRing::new(start);

    let mut tau = 1.0;
    for _ in 0..10 {
        step.advance_rk(tau, &mut ring).unwrap();
        tau += DELTA_TAU;
    }
    let first = ring.current().cells()[0];
    for cell in ring.current().cells() {
        assert_eq!(cell.w, first.w);
        assert_eq!(cell.pi_b, first.pi_b);
    }
    // Ten steps of dX/dτ = -2X.
    let decay = (-2.0 * 10.0 * DELTA_TAU).exp();
    assert!((first.pi_b + 0.01 * decay).abs() < 1e-5);
    assert!((first.w[4] - 0.02 * decay).abs() < 1e-5);
    assert!(first.shear_trace().abs() < 1e-14);
}

#[test]
fn halving_the_step_quarters_the_error() {
    let dims = GridDims::new(3, 3, 1);
    let error = |delta_tau: f64, steps: usize| {
        let mut config = AdvanceConfig::new(GridGeometry::centred(dims, 0.1, 0.1, 0.1), delta_tau);
        config.boost_invariant = true;
        config.diagnostics = DiagnosticsConfig::disabled();
        let eos = LinearEos::CONFORMAL;
        let physics = Collaborators {
            eos: Arc::new(eos),
            transport: Arc::new(ConstantTransport::default()),
            reconstruct: Arc::new(LinearReconstruct::new(eos)),
            sources: Arc::new(ConstantSources::none()),
            dissipative: Arc::new(NullDissipativeTerms),
            kinematics: Arc::new(FrozenKinematics::at_rest()),
        };
        let step = Advance::new(config, physics).unwrap();
        let mut ring = GridRing::new(wrapped(dims, 1.0));
        for n in 0..steps {
            step.advance_rk(1.0 + n as f64 * delta_tau, &mut ring).unwrap();
        }
        let tau = 1.0 + steps as f64 * delta_tau;
        (ring.current().cells()[0].epsilon - tau.powf(-4.0 / 3.0)).abs()
    };

    let coarse = error(0.04, 10);
    let fine = error(0.02, 20);
    let ratio = coarse / fine;
    assert!(ratio > 3.5 && ratio < 4.5, "error ratio {ratio}");
}
