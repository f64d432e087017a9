//! Collaborator traits that read neighbouring cells.
//!
//! Unlike the pointwise traits in `tauflow-core`, these need the grid
//! generations around a cell: spatial derivatives of the flow and the
//! flux terms of the dissipative equations of motion.

use tauflow_core::{FluidCell, KinematicBundle, RkStage, TJbVec};

use crate::grid::{CellIndex, Grid};

/// Spatial and temporal derivatives of the flow field.
pub trait Kinematics: Send + Sync {
    /// Expansion rate, acceleration, velocity shear, vorticity, and the
    /// diffusion driving vector at `at`, from the *previous* and
    /// *current* generations.
    fn compute(&self, tau: f64, previous: &Grid, current: &Grid, at: CellIndex) -> KinematicBundle;
}

/// Dissipative flux divergences and relaxation-equation sources.
///
/// `*_rhs` methods return the already time-step-scaled KT flux
/// contribution of `u^i X` for the dissipative quantity `X`; `*_source`
/// methods return the right-hand side of its relaxation equation, which
/// the stepper multiplies by `Δτ`.
pub trait DissipativeTerms: Send + Sync {
    /// `∂_μ W^{μν}` including geometric terms, for the ideal update.
    fn w_divergence(&self, tau: f64, current: &Grid, previous: &Grid, at: CellIndex) -> TJbVec;

    /// Flux term of the shear component `(μ, ν)`.
    fn shear_rhs(
        &self,
        tau: f64,
        current: &Grid,
        at: CellIndex,
        mu: usize,
        nu: usize,
        kin: &KinematicBundle,
    ) -> f64;

    /// Relaxation source of the shear component `(μ, ν)`.
    #[allow(clippy::too_many_arguments)]
    fn shear_source(
        &self,
        tau: f64,
        current: &FluidCell,
        previous: &FluidCell,
        mu: usize,
        nu: usize,
        stage: RkStage,
        kin: &KinematicBundle,
    ) -> f64;

    /// Flux term of the bulk pressure.
    fn bulk_rhs(&self, tau: f64, current: &Grid, at: CellIndex, kin: &KinematicBundle) -> f64;

    /// Relaxation source of the bulk pressure.
    fn bulk_source(
        &self,
        tau: f64,
        current: &FluidCell,
        previous: &FluidCell,
        stage: RkStage,
        kin: &KinematicBundle,
    ) -> f64;

    /// Flux term of the diffusion component `q^ν`.
    fn diffusion_rhs(&self, tau: f64, current: &Grid, at: CellIndex, nu: usize) -> f64;

    /// Relaxation source of the diffusion component `q^ν`.
    fn diffusion_source(
        &self,
        tau: f64,
        current: &FluidCell,
        previous: &FluidCell,
        nu: usize,
        stage: RkStage,
        kin: &KinematicBundle,
    ) -> f64;
}
