//! Integration test: causality reduction factors reach their log file.

use std::path::Path;
use std::sync::Arc;

use tauflow_advance::{
    Advance, AdvanceConfig, CausalityMethod, Collaborators, DiagnosticsConfig, GridGeometry,
    ViscosityFlags,
};
use tauflow_core::FluidCell;
use tauflow_grid::{EdgeBehavior, Grid, GridDims, GridRing};
use tauflow_test_utils::{
    ConstantSources, ConstantTransport, FrozenKinematics, LinearEos, LinearReconstruct,
    RelaxationTerms,
};

fn advance(dir: &Path, method: CausalityMethod, dims: GridDims) -> Advance {
    let eos = LinearEos::CONFORMAL;
    let mut config = AdvanceConfig::new(GridGeometry::centred(dims, 0.1, 0.1, 0.1), 0.01);
    config.boost_invariant = true;
    config.viscosity = ViscosityFlags::shear_and_bulk();
    config.causality = method;
    config.diagnostics = DiagnosticsConfig {
        directory: dir.to_path_buf(),
        ..DiagnosticsConfig::default()
    };
    let physics = Collaborators {
        eos: Arc::new(eos),
        transport: Arc::new(ConstantTransport::default()),
        reconstruct: Arc::new(LinearReconstruct::new(eos)),
        sources: Arc::new(ConstantSources::none()),
        dissipative: Arc::new(RelaxationTerms::new(0.5)),
        kinematics: Arc::new(FrozenKinematics::at_rest()),
    };
    Advance::new(config, physics).unwrap()
}

fn sheared(dims: GridDims, epsilon: f64) -> GridRing {
    let mut cell = FluidCell::at_rest(epsilon, 0.0);
    cell.w[4] = 1.5 * epsilon;
    cell.w[7] = -1.5 * epsilon;
    GridRing::new(Grid::filled(dims, EdgeBehavior::Wrap, cell).unwrap())
}

#[test]
fn every_dense_cell_is_logged_per_sub_step() {
    let dir = tempfile::tempdir().unwrap();
    let dims = GridDims::new(2, 2, 1);
    let step = advance(dir.path(), CausalityMethod::Necessary, dims);
    let mut ring = sheared(dims, 1.0);
    step.advance_rk(0.6, &mut ring).unwrap();
    step.close().unwrap();

    let defaults = DiagnosticsConfig::default();
    let text = std::fs::read_to_string(dir.path().join(&defaults.necessary_file)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2 * dims.cell_count());
    for line in lines {
        let columns: Vec<f64> = line
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect();
        assert_eq!(columns.len(), 3, "{line}");
        assert!(columns[0] > 0.0 && columns[0] <= 1.0);
        assert_eq!(columns[2], 0.6);
    }
    assert!(!dir.path().join(&defaults.sufficient_file).exists());
}

#[test]
fn dilute_cells_are_not_logged() {
    let dir = tempfile::tempdir().unwrap();
    let dims = GridDims::new(2, 2, 1);
    let step = advance(dir.path(), CausalityMethod::Sufficient, dims);
    let mut ring = sheared(dims, 0.005);
    step.advance_rk(1.0, &mut ring).unwrap();
    step.flush_diagnostics().unwrap();

    let defaults = DiagnosticsConfig::default();
    assert!(!dir.path().join(&defaults.sufficient_file).exists());
    step.close().unwrap();
}

#[test]
fn logs_append_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let dims = GridDims::new(1, 1, 1);
    for _ in 0..2 {
        let step = advance(dir.path(), CausalityMethod::Necessary, dims);
        let mut ring = sheared(dims, 1.0);
        step.advance_rk(1.0, &mut ring).unwrap();
        step.close().unwrap();
    }
    let path = dir.path().join(DiagnosticsConfig::default().necessary_file);
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(text.lines().count(), 4);
}
