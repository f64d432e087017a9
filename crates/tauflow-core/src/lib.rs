//! Core types and traits for tauflow.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fluid cell layout shared by every other crate, the error types
//! raised by the time step, and the narrow traits through which the
//! step consumes its external collaborators (equation of state,
//! transport coefficients, reconstruction, and source terms).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod kinematics;
pub mod traits;

pub use cell::{
    map_1d_idx_to_2d, map_2d_idx_to_1d, FlowVec, FluidCell, ReconstCell, RkStage, TJbVec,
    DIFFUSION_OFFSET, SHEAR_LEN, W_LEN,
};
pub use error::{ReconstructError, StepError};
pub use kinematics::KinematicBundle;
pub use traits::{Eos, Reconstruct, SourceProvider, TransportCoeffs};
