//! Integration test: a smooth pressure bump starts to flow.
//!
//! A Gaussian energy excess on a periodic transverse plane must push
//! fluid outward, flatten, and keep its mirror symmetry. The parallel
//! step must also be deterministic: every cell reads only immutable
//! generations, so worker scheduling cannot change the result.

use std::sync::Arc;

use tauflow_advance::{Advance, AdvanceConfig, Collaborators, DiagnosticsConfig, GridGeometry};
use tauflow_core::FluidCell;
use tauflow_grid::{CellIndex, EdgeBehavior, Grid, GridDims, GridRing};
use tauflow_test_utils::{
    energy_range, gaussian_profile, ConstantSources, ConstantTransport, FrozenKinematics,
    LinearEos, LinearReconstruct, NullDissipativeTerms,
};

const N: usize = 9;
const DELTA_TAU: f64 = 0.01;

fn advance(theta: f64) -> Advance {
    let dims = GridDims::new(N, N, 1);
    let eos = LinearEos::CONFORMAL;
    let mut config = AdvanceConfig::new(GridGeometry::centred(dims, 0.1, 0.1, 0.1), DELTA_TAU);
    config.boost_invariant = true;
    config.flux_limiter_theta = theta;
    config.diagnostics = DiagnosticsConfig::disabled();
    let physics = Collaborators {
        eos: Arc::new(eos),
        transport: Arc::new(ConstantTransport::default()),
        reconstruct: Arc::new(LinearReconstruct::new(eos)),
        sources: Arc::new(ConstantSources::none()),
        dissipative: Arc::new(NullDissipativeTerms),
        kinematics: Arc::new(FrozenKinematics::at_rest()),
    };
    Advance::new(config, physics).unwrap()
}

fn evolve(step: &Advance, steps: usize) -> GridRing {
    let dims = GridDims::new(N, N, 1);
    let mut ring = GridRing::new(gaussian_profile(dims, EdgeBehavior::Wrap, 1.0, 0.5, 1.5));
    let mut tau = 1.0;
    for _ in 0..steps {
        step.advance_rk(tau, &mut ring).unwrap();
        tau += DELTA_TAU;
    }
    ring
}

fn at(grid: &Grid, ix: usize, iy: usize) -> FluidCell {
    grid[CellIndex::new(ix, iy, 0)]
}

fn contrast(grid: &Grid) -> f64 {
    let (lo, hi) = energy_range(grid);
    hi / lo
}

#[test]
fn bump_pushes_fluid_outward() {
    let ring = evolve(&advance(1.0), 10);
    let grid = ring.current();
    let centre = N / 2;
    assert!(at(grid, centre + 1, centre).u[1] > 0.0);
    assert!(at(grid, centre - 1, centre).u[1] < 0.0);
    assert!(at(grid, centre, centre + 1).u[2] > 0.0);
    assert!(at(grid, centre, centre).u[1].abs() < 1e-12);
}

#[test]
fn bump_flattens() {
    let dims = GridDims::new(N, N, 1);
    let initial = gaussian_profile(dims, EdgeBehavior::Wrap, 1.0, 0.5, 1.5);
    let ring = evolve(&advance(1.0), 10);
    assert!(contrast(ring.current()) < contrast(&initial));
    assert!(contrast(ring.current()) > 1.0);
    let (_, hi) = energy_range(ring.current());
    let centre = N / 2;
    assert_eq!(at(ring.current(), centre, centre).epsilon, hi);
}

#[test]
fn mirror_symmetry_survives() {
    let ring = evolve(&advance(1.8), 10);
    let grid = ring.current();
    for ix in 0..N {
        for iy in 0..N {
            let cell = at(grid, ix, iy);
            let mirror = at(grid, N - 1 - ix, iy);
            let transpose = at(grid, iy, ix);
            assert!((cell.epsilon - mirror.epsilon).abs() < 1e-12);
            assert!((cell.u[1] + mirror.u[1]).abs() < 1e-12);
            assert!((cell.u[2] - mirror.u[2]).abs() < 1e-12);
            assert!((cell.u[1] - transpose.u[2]).abs() < 1e-12);
        }
    }
}

#[test]
fn parallel_step_is_deterministic() {
    let step = advance(1.0);
    let a = evolve(&step, 5);
    let b = evolve(&step, 5);
    assert_eq!(a.current().cells(), b.current().cells());
}
