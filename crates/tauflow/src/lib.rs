//! tauflow: one proper-time step of relativistic viscous hydrodynamics.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the tauflow sub-crates. For most users, adding `tauflow` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tauflow::prelude::*;
//! use tauflow_test_utils::{
//!     ConstantSources, ConstantTransport, FrozenKinematics, LinearEos, LinearReconstruct,
//!     NullDissipativeTerms,
//! };
//!
//! let dims = GridDims::new(8, 8, 1);
//! let eos = LinearEos::CONFORMAL;
//! let mut config = AdvanceConfig::new(GridGeometry::centred(dims, 0.1, 0.1, 0.1), 0.01);
//! config.boost_invariant = true;
//! config.diagnostics = DiagnosticsConfig::disabled();
//!
//! let physics = Collaborators {
//!     eos: Arc::new(eos),
//!     transport: Arc::new(ConstantTransport::default()),
//!     reconstruct: Arc::new(LinearReconstruct::new(eos)),
//!     sources: Arc::new(ConstantSources::none()),
//!     dissipative: Arc::new(NullDissipativeTerms),
//!     kinematics: Arc::new(FrozenKinematics::at_rest()),
//! };
//! let step = Advance::new(config, physics).unwrap();
//!
//! let initial = Grid::filled(dims, EdgeBehavior::Wrap, FluidCell::at_rest(1.0, 0.0)).unwrap();
//! let mut ring = GridRing::new(initial);
//! let summary = step.advance_rk(1.0, &mut ring).unwrap();
//! assert_eq!(summary.cells, 2 * dims.cell_count());
//! assert!(ring.current().cells()[0].epsilon < 1.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tauflow-core` | Fluid cells, errors, pointwise collaborator traits |
//! | [`grid`] | `tauflow-grid` | Grid storage, stencils, generation ring |
//! | [`advance`] | `tauflow-advance` | The Runge-Kutta step and its corrections |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Fluid cell layout, error types, and pointwise traits (`tauflow-core`).
pub use tauflow_core as types;

/// Grid storage and the three-generation ring (`tauflow-grid`).
///
/// Also holds the [`grid::Kinematics`] and [`grid::DissipativeTerms`]
/// traits, which read neighbouring cells.
pub use tauflow_grid as grid;

/// The time step (`tauflow-advance`).
///
/// [`advance::Advance`] drives the step; the submodules expose the flux
/// builder, the steppers, causality enforcement, and the regulators.
pub use tauflow_advance as advance;

/// Common imports for typical tauflow usage.
///
/// ```rust
/// use tauflow::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tauflow_core::{
        Eos, FluidCell, KinematicBundle, Reconstruct, RkStage, SourceProvider, TransportCoeffs,
    };

    // Errors
    pub use tauflow_core::{ReconstructError, StepError};

    // Grid
    pub use tauflow_grid::{
        CellIndex, DissipativeTerms, EdgeBehavior, Grid, GridDims, GridRing, Kinematics,
    };

    // Step
    pub use tauflow_advance::{
        Advance, AdvanceConfig, BuildError, CausalityMethod, Collaborators, DiagnosticsConfig,
        GridGeometry, StepSummary, ViscosityFlags,
    };
}
