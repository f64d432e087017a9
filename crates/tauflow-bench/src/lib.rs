//! Benchmark profiles for the tauflow time step.
//!
//! - [`reference_profile`]: 64×64×1 transverse grid with a Gaussian
//!   pressure bump and relaxing shear and bulk currents
//! - [`stress_profile`]: 128×128×8 grid, same physics

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use tauflow_advance::{
    Advance, AdvanceConfig, CausalityMethod, Collaborators, DiagnosticsConfig, GridGeometry,
    ViscosityFlags,
};
use tauflow_grid::{EdgeBehavior, GridDims, GridRing};
use tauflow_test_utils::{
    gaussian_profile, ConstantSources, ConstantTransport, FrozenKinematics, LinearEos,
    LinearReconstruct, RelaxationTerms,
};

/// Proper-time step of every profile.
pub const DELTA_TAU: f64 = 0.01;

/// A stepper and initial ring for a grid of `dims`.
///
/// Diagnostics are disabled so file I/O never enters a measurement.
pub fn profile(dims: GridDims, causality: CausalityMethod) -> (Advance, GridRing) {
    let eos = LinearEos::CONFORMAL;
    let mut config = AdvanceConfig::new(GridGeometry::centred(dims, 0.1, 0.1, 0.1), DELTA_TAU);
    config.viscosity = ViscosityFlags::shear_and_bulk();
    config.causality = causality;
    config.diagnostics = DiagnosticsConfig::disabled();
    let physics = Collaborators {
        eos: Arc::new(eos),
        transport: Arc::new(ConstantTransport::default()),
        reconstruct: Arc::new(LinearReconstruct::new(eos)),
        sources: Arc::new(ConstantSources::none()),
        dissipative: Arc::new(RelaxationTerms::new(0.5)),
        kinematics: Arc::new(FrozenKinematics::bjorken(1.0)),
    };
    let advance = Advance::new(config, physics).expect("benchmark config is valid");

    let width = dims.nx as f64 / 8.0;
    let mut grid = gaussian_profile(dims, EdgeBehavior::Clamp, 1.0, 0.5, width);
    for cell in grid.cells_mut() {
        cell.w[4] = 0.01 * cell.epsilon;
        cell.w[7] = 0.01 * cell.epsilon;
        cell.w[9] = -0.02 * cell.epsilon;
        cell.pi_b = -0.005 * cell.epsilon;
    }
    (advance, GridRing::new(grid))
}

/// 64×64×1 grid (4K cells) with necessary-condition causality checks.
pub fn reference_profile() -> (Advance, GridRing) {
    profile(GridDims::new(64, 64, 1), CausalityMethod::Necessary)
}

/// 128×128×8 grid (~131K cells) with sufficient-condition causality checks.
pub fn stress_profile() -> (Advance, GridRing) {
    profile(GridDims::new(128, 128, 8), CausalityMethod::Sufficient)
}
