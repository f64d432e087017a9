//! Error types for the tauflow time step.
//!
//! Every variant of [`StepError`] is fatal: the step cannot produce a
//! physical *future* generation and the evolution driver must stop. The
//! causality and stability corrections never produce errors; they always
//! return a corrected cell.

use thiserror::Error;

/// Failure of the conserved→primitive reconstruction collaborator.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ReconstructError {
    /// The conserved vector does not correspond to any physical state
    /// (e.g. momentum exceeding energy, negative energy).
    #[error("non-physical conserved vector: {reason}")]
    NonPhysical {
        /// Description of the violated condition.
        reason: String,
    },
    /// The root finder did not converge within its iteration budget.
    #[error("reconstruction did not converge after {iterations} iterations")]
    NoConvergence {
        /// Number of iterations attempted.
        iterations: usize,
    },
}

/// Fatal numerical-consistency failure during one time step.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StepError {
    /// The signal-speed discriminant was negative outside the
    /// `dP/dε → 0` regime where the limiting closed form is valid.
    #[error(
        "negative signal-speed discriminant {discriminant:e} \
         (e = {e}, rhob = {rhob}, cs2 = {cs2}, dpde = {dpde})"
    )]
    NegativeDiscriminant {
        /// Value under the square root.
        discriminant: f64,
        /// Local energy density.
        e: f64,
        /// Local net baryon density.
        rhob: f64,
        /// Squared sound speed.
        cs2: f64,
        /// `dP/dε` at the state.
        dpde: f64,
    },
    /// The characteristic speed left the causal band `[|v|, 1]`.
    #[error("signal speed {speed:e} outside [{lower:e}, 1] in direction {direction}")]
    SignalSpeedOutOfBounds {
        /// Computed speed before the metric factor.
        speed: f64,
        /// Flow velocity magnitude along the direction.
        lower: f64,
        /// Spatial direction (1..=3).
        direction: usize,
    },
    /// An external source term produced a non-finite component.
    #[error("non-finite source term in component {component} at cell {cell}")]
    NonFiniteSource {
        /// Flat cell index.
        cell: usize,
        /// Component of the energy-momentum source.
        component: usize,
    },
    /// Reconstruction of primitive variables failed.
    #[error("reconstruction failed at cell {cell}: {source}")]
    Reconstruction {
        /// Flat cell index.
        cell: usize,
        /// The underlying reconstruction failure.
        #[source]
        source: ReconstructError,
    },
}

impl StepError {
    /// Attach a cell index to a reconstruction failure.
    pub fn reconstruction(cell: usize, source: ReconstructError) -> Self {
        Self::Reconstruction { cell, source }
    }
}
