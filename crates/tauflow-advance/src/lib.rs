//! One proper-time step of relativistic viscous hydrodynamics.
//!
//! Advances a grid of fluid cells in Milne coordinates `(τ, x, y, η)`
//! by a two-stage Runge-Kutta (Heun) step. The ideal part is a
//! Kurganov-Tadmor finite-volume update of `∂_μ T^{μν} = 0` and
//! `∂_μ J^μ = 0`; the dissipative part relaxes the shear tensor, the
//! bulk pressure, and the net-baryon diffusion current. After each
//! sub-step the currents pass through a dilute-region regulator and,
//! optionally, a causality enforcer.
//!
//! # Architecture
//!
//! ```text
//!  Advance::advance_rk ──► GridRing::split(stage)
//!        │
//!        ▼  rayon, one task per cell
//!  IdealStepper ── KtFlux ── Minmod, max_speed, tjb
//!        │
//!  DissipativeStepper ── shear_eigenvalues
//!        │
//!  QuestRevert ──► causality::enforce ──► ReductionLog (drain thread)
//! ```
//!
//! External physics (equation of state, transport coefficients,
//! reconstruction, sources, dissipative terms, kinematics) enters
//! through the traits in `tauflow-core` and `tauflow-grid`, bundled as
//! [`Collaborators`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advance;
pub mod causality;
pub mod config;
pub mod diagnostics;
pub mod dissipative;
pub mod eigen;
pub mod flux;
pub mod ideal;
pub mod minmod;
pub mod quest_revert;
pub mod signal_speed;
pub mod stress;

pub use advance::{Advance, BuildError, Collaborators, StepSummary};
pub use causality::{CausalityReport, Condition};
pub use config::{
    AdvanceConfig, CausalityMethod, ConfigError, DiagnosticsConfig, GridGeometry, ViscosityFlags,
};
pub use diagnostics::{DiagnosticsError, ReductionLog};
pub use quest_revert::QuestRevert;
