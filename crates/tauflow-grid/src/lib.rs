//! Fluid grid storage for tauflow.
//!
//! [`Grid`] is a flat 3D array of [`FluidCell`](tauflow_core::FluidCell)s
//! with stencil lookups governed by an [`EdgeBehavior`]. [`GridRing`]
//! holds the *previous*, *current*, and *future* generations the
//! Runge-Kutta step reads and writes, and relabels their roles between
//! steps without copying. [`Kinematics`] and [`DissipativeTerms`] are the
//! collaborator traits that need neighbouring cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid;
pub mod ring;
pub mod traits;

pub use edge::EdgeBehavior;
pub use error::GridError;
pub use grid::{CellIndex, Direction, Grid, GridDims, Stencil};
pub use ring::GridRing;
pub use traits::{DissipativeTerms, Kinematics};
