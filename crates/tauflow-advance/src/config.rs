//! Step configuration, validation, and error types.
//!
//! [`AdvanceConfig`] is the builder input for [`Advance`](crate::Advance).
//! [`validate()`](AdvanceConfig::validate) checks structural invariants
//! once at construction; the step itself never re-validates.

use std::path::PathBuf;

use tauflow_grid::{CellIndex, Direction, GridDims};
use thiserror::Error;

// ── GridGeometry ───────────────────────────────────────────────────

/// Physical extent and spacing of the grid.
///
/// Cell `(ix, iy, ieta)` sits at
/// `(-x_size/2 + ix·Δx, -y_size/2 + iy·Δy, -eta_size/2 + ieta·Δη)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    /// Spacing along x.
    pub delta_x: f64,
    /// Spacing along y.
    pub delta_y: f64,
    /// Spacing along η_s.
    pub delta_eta: f64,
    /// Extent along x.
    pub x_size: f64,
    /// Extent along y.
    pub y_size: f64,
    /// Extent along η_s.
    pub eta_size: f64,
}

impl GridGeometry {
    /// Geometry of a grid with the given spacings, centred on the origin.
    pub fn centred(dims: GridDims, delta_x: f64, delta_y: f64, delta_eta: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            delta_eta,
            x_size: delta_x * dims.nx.saturating_sub(1) as f64,
            y_size: delta_y * dims.ny.saturating_sub(1) as f64,
            eta_size: delta_eta * dims.neta.saturating_sub(1) as f64,
        }
    }

    /// Spacing along a direction.
    pub fn spacing(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => self.delta_x,
            Direction::Y => self.delta_y,
            Direction::Eta => self.delta_eta,
        }
    }

    /// Physical position `(x, y, η_s)` of a cell.
    pub fn position(&self, at: CellIndex) -> (f64, f64, f64) {
        (
            -self.x_size / 2.0 + at.ix as f64 * self.delta_x,
            -self.y_size / 2.0 + at.iy as f64 * self.delta_y,
            -self.eta_size / 2.0 + at.ieta as f64 * self.delta_eta,
        )
    }
}

// ── ViscosityFlags ─────────────────────────────────────────────────

/// Which dissipative currents are evolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViscosityFlags {
    /// Evolve the shear-stress tensor.
    pub shear: bool,
    /// Evolve the bulk viscous pressure.
    pub bulk: bool,
    /// Evolve the baryon-diffusion current.
    pub diffusion: bool,
}

impl ViscosityFlags {
    /// Ideal hydrodynamics: nothing dissipative.
    pub fn ideal() -> Self {
        Self::default()
    }

    /// Shear and bulk, no diffusion.
    pub fn shear_and_bulk() -> Self {
        Self {
            shear: true,
            bulk: true,
            diffusion: false,
        }
    }

    /// Whether any dissipative current is evolved. When `false` the
    /// dissipative stepper, regulators, and causality checks are skipped.
    pub fn any(&self) -> bool {
        self.shear || self.bulk || self.diffusion
    }
}

// ── CausalityMethod ────────────────────────────────────────────────

/// Which causality enforcer runs after the dissipative update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CausalityMethod {
    /// No causality enforcement.
    #[default]
    None,
    /// Rescale until the necessary conditions hold.
    Necessary,
    /// Rescale until the sufficient conditions hold.
    Sufficient,
}

// ── DiagnosticsConfig ──────────────────────────────────────────────

/// Where and when causality reduction factors are recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticsConfig {
    /// Directory holding the reduction logs. Default: current directory.
    pub directory: PathBuf,
    /// Only cells with `ε` above this are recorded. Default: 0.01.
    pub energy_threshold: f64,
    /// File name of the necessary-condition log.
    pub necessary_file: String,
    /// File name of the sufficient-condition log.
    pub sufficient_file: String,
    /// Disable all reduction logging (benchmarks, most tests).
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            energy_threshold: 0.01,
            necessary_file: "necessary_causality_reduction_factor_wtau.dat".to_string(),
            sufficient_file: "sufficient_causality_reduction_factor_wtau.dat".to_string(),
            enabled: true,
        }
    }
}

impl DiagnosticsConfig {
    /// Configuration that records nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`AdvanceConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A grid spacing is NaN, infinite, zero, or negative.
    #[error("grid spacing along {axis} must be finite and positive, got {value}")]
    InvalidSpacing {
        /// Axis name.
        axis: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// `delta_tau` is NaN, infinite, zero, or negative.
    #[error("delta_tau must be finite and positive, got {value}")]
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// The minmod θ parameter is outside `[1, 2]`.
    #[error("flux_limiter_theta must be in [1, 2], got {value}")]
    InvalidLimiterTheta {
        /// The invalid value.
        value: f64,
    },
    /// The regulator strength is NaN, infinite, or negative.
    #[error("quest_revert_strength must be finite and non-negative, got {value}")]
    InvalidRevertStrength {
        /// The invalid value.
        value: f64,
    },
    /// The diagnostics energy threshold is NaN.
    #[error("diagnostics energy threshold must not be NaN")]
    InvalidDiagnosticsThreshold,
}

// ── AdvanceConfig ──────────────────────────────────────────────────

/// Complete configuration of the single-step update.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvanceConfig {
    /// Grid spacing and extent.
    pub geometry: GridGeometry,
    /// Proper-time step `Δτ`.
    pub delta_tau: f64,
    /// Use the `Δη → 0` limits of the longitudinal geometric factors.
    pub boost_invariant: bool,
    /// θ of the generalized minmod limiter. `1.0` is plain minmod.
    pub flux_limiter_theta: f64,
    /// Which dissipative currents are evolved.
    pub viscosity: ViscosityFlags,
    /// Add the external net-baryon source.
    pub turn_on_rhob: bool,
    /// Causality enforcement after the dissipative update.
    pub causality: CausalityMethod,
    /// Strength of the dilute-region regulator. Default: 1.0.
    pub quest_revert_strength: f64,
    /// Whether the evolution is past the initial-profile phase. The
    /// regulators and causality checks only run when this is set.
    pub past_initial_profile: bool,
    /// Verbosity gate for regulator warnings (warnings need `> 5`).
    pub echo_level: u32,
    /// Reduction-log settings.
    pub diagnostics: DiagnosticsConfig,
}

impl AdvanceConfig {
    /// An ideal-fluid configuration with default settings.
    pub fn new(geometry: GridGeometry, delta_tau: f64) -> Self {
        Self {
            geometry,
            delta_tau,
            boost_invariant: false,
            flux_limiter_theta: 1.0,
            viscosity: ViscosityFlags::ideal(),
            turn_on_rhob: false,
            causality: CausalityMethod::None,
            quest_revert_strength: 1.0,
            past_initial_profile: true,
            echo_level: 1,
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        for (axis, value) in [("x", g.delta_x), ("y", g.delta_y), ("eta", g.delta_eta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSpacing { axis, value });
            }
        }
        if !self.delta_tau.is_finite() || self.delta_tau <= 0.0 {
            return Err(ConfigError::InvalidTimeStep {
                value: self.delta_tau,
            });
        }
        if !(1.0..=2.0).contains(&self.flux_limiter_theta) {
            return Err(ConfigError::InvalidLimiterTheta {
                value: self.flux_limiter_theta,
            });
        }
        if !self.quest_revert_strength.is_finite() || self.quest_revert_strength < 0.0 {
            return Err(ConfigError::InvalidRevertStrength {
                value: self.quest_revert_strength,
            });
        }
        if self.diagnostics.energy_threshold.is_nan() {
            return Err(ConfigError::InvalidDiagnosticsThreshold);
        }
        Ok(())
    }
}
