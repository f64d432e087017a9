//! Collaborator traits consumed by the time step.
//!
//! Each trait is a narrow functional interface to something the step
//! needs but does not own: thermodynamics, transport coefficients,
//! reconstruction of primitive variables, and external sources. All of
//! them are called concurrently from many worker threads, hence the
//! `Send + Sync` bound.

use crate::cell::{FlowVec, FluidCell, ReconstCell, TJbVec};
use crate::error::ReconstructError;

/// Equation of state: pure function of `(ε, ρ_B)`.
pub trait Eos: Send + Sync {
    /// Pressure `P(ε, ρ_B)`.
    fn pressure(&self, e: f64, rhob: f64) -> f64;

    /// Squared speed of sound `c_s²(ε, ρ_B)`.
    fn cs2(&self, e: f64, rhob: f64) -> f64;

    /// `∂P/∂ε` at fixed `ρ_B`.
    fn dpde(&self, e: f64, rhob: f64) -> f64;

    /// `∂P/∂ρ_B` at fixed `ε`.
    fn dpdrhob(&self, e: f64, rhob: f64) -> f64;
}

/// Second-order transport coefficients.
///
/// Only the relaxation-time factors are required; the coupling
/// coefficients default to the values of conformal kinetic theory
/// (14-moment approximation for massless particles).
///
/// The causality conditions read `τ_ππ`, `δ_ππ`, `λ_πΠ`, `λ_Ππ` and
/// `δ_ΠΠ`. The remaining couplings are consumed only by the
/// `DissipativeTerms` collaborator when it builds relaxation sources.
pub trait TransportCoeffs: Send + Sync {
    /// Shear relaxation time factor `τ_π T / (η/s)`.
    fn shear_relax_time_factor(&self) -> f64;

    /// Bulk relaxation time factor.
    fn bulk_relax_time_factor(&self) -> f64;

    /// `τ_ππ` shear-shear coupling.
    fn tau_pipi(&self) -> f64 {
        10.0 / 7.0
    }

    /// `δ_ππ` shear-expansion coupling.
    fn delta_pipi(&self) -> f64 {
        4.0 / 3.0
    }

    /// `φ_7` shear-shear nonlinear coupling.
    ///
    /// Read by `DissipativeTerms` implementations, not by the step.
    fn phi7(&self) -> f64 {
        9.0 / 70.0
    }

    /// `λ_πΠ` shear-bulk coupling.
    fn lambda_pi_bulk(&self) -> f64 {
        6.0 / 5.0
    }

    /// `λ_Ππ` bulk-shear coupling.
    fn lambda_bulk_pi(&self) -> f64 {
        8.0 / 5.0
    }

    /// `δ_ΠΠ` bulk-expansion coupling.
    fn delta_bulk_bulk(&self) -> f64 {
        2.0 / 3.0
    }

    /// `τ_ΠΠ` bulk-shear nonlinear coupling.
    ///
    /// Read by `DissipativeTerms` implementations, not by the step.
    fn tau_bulk_bulk(&self) -> f64 {
        0.0
    }

    /// `δ_qq` diffusion-expansion coupling.
    ///
    /// Read by `DissipativeTerms` implementations, not by the step.
    fn delta_qq(&self) -> f64 {
        1.0
    }

    /// `λ_qq` diffusion-shear coupling.
    ///
    /// Read by `DissipativeTerms` implementations, not by the step.
    fn lambda_qq(&self) -> f64 {
        3.0 / 5.0
    }

    /// `l_qπ` diffusion-shear gradient coupling.
    ///
    /// Read by `DissipativeTerms` implementations, not by the step.
    fn l_qpi(&self) -> f64 {
        0.0
    }

    /// `λ_qπ` diffusion-shear coupling.
    ///
    /// Read by `DissipativeTerms` implementations, not by the step.
    fn lambda_qpi(&self) -> f64 {
        0.0
    }
}

/// Conserved→primitive variable reconstruction.
pub trait Reconstruct: Send + Sync {
    /// Recover `(ε, ρ_B, u^μ)` from `q = τ·(T^{τμ}, J^τ)` at proper time
    /// `tau`. `guess` is a nearby state usable as a starting point.
    ///
    /// Fails on a non-physical conserved vector; the step treats the
    /// failure as fatal.
    fn reconstruct(
        &self,
        tau: f64,
        q: &TJbVec,
        guess: &FluidCell,
    ) -> Result<ReconstCell, ReconstructError>;
}

/// External energy-momentum and baryon source terms.
pub trait SourceProvider: Send + Sync {
    /// Whether this provider currently contributes anything. The step
    /// skips source evaluation entirely when this returns `false`.
    fn has_sources(&self) -> bool;

    /// Energy-momentum source `j^μ` at `(τ, x, y, η_s)`.
    fn energy_momentum_source(&self, tau: f64, x: f64, y: f64, eta: f64, u: &FlowVec) -> [f64; 4];

    /// Net baryon source at `(τ, x, y, η_s)`.
    fn baryon_source(&self, tau: f64, x: f64, y: f64, eta: f64, u: &FlowVec) -> f64;
}
