//! The full Runge-Kutta step over a grid.
//!
//! [`Advance`] owns the step configuration, the external collaborators,
//! and the reduction logs. [`Advance::advance_it`] runs one sub-step over
//! every cell in parallel; [`Advance::advance_rk`] runs both sub-steps on
//! a [`GridRing`] and relabels its generations.
//!
//! Each cell of a sub-step is independent: it reads only the immutable
//! *previous* and *current* generations and writes only its own slot of
//! *future*. Per cell the order is ideal update, dissipative update,
//! shear/bulk regulator, causality enforcement, diffusion regulator.

use std::ops::Add;
use std::sync::Arc;

use rayon::prelude::*;
use tauflow_core::{Eos, FluidCell, Reconstruct, RkStage, SourceProvider, StepError, TransportCoeffs};
use tauflow_grid::{CellIndex, DissipativeTerms, Grid, GridRing, Kinematics};
use thiserror::Error;

use crate::causality;
use crate::config::{AdvanceConfig, CausalityMethod, ConfigError};
use crate::diagnostics::{DiagnosticsError, ReductionLog};
use crate::dissipative::DissipativeStepper;
use crate::flux::KtFlux;
use crate::ideal::IdealStepper;
use crate::minmod::Minmod;
use crate::quest_revert::{DiffusionAction, QuestRevert, ShearAction};

// ── Collaborators ──────────────────────────────────────────────────

/// The external physics the step consumes.
#[derive(Clone)]
pub struct Collaborators {
    /// Equation of state.
    pub eos: Arc<dyn Eos>,
    /// Transport coefficients for the causality conditions.
    pub transport: Arc<dyn TransportCoeffs>,
    /// Conserved-to-primitive inversion.
    pub reconstruct: Arc<dyn Reconstruct>,
    /// External energy-momentum and baryon sources.
    pub sources: Arc<dyn SourceProvider>,
    /// Dissipative flux and relaxation terms.
    pub dissipative: Arc<dyn DissipativeTerms>,
    /// Flow derivatives.
    pub kinematics: Arc<dyn Kinematics>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// ── BuildError ─────────────────────────────────────────────────────

/// Errors from [`Advance::new()`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A reduction log could not be started.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),
}

// ── StepSummary ────────────────────────────────────────────────────

/// Per-sub-step tallies of the corrections applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepSummary {
    /// Cells updated.
    pub cells: usize,
    /// Cells whose shear was scaled or zeroed by the regulator.
    pub shear_regulated: usize,
    /// Cells whose bulk pressure was scaled by the regulator.
    pub bulk_regulated: usize,
    /// Cells whose diffusion current was scaled or reset.
    pub diffusion_regulated: usize,
    /// Cells rescaled by the causality enforcer.
    pub causality_rescaled: usize,
    /// Smallest causality factor applied (`1` when none was).
    pub min_causality_factor: f64,
}

impl Default for StepSummary {
    fn default() -> Self {
        Self {
            cells: 0,
            shear_regulated: 0,
            bulk_regulated: 0,
            diffusion_regulated: 0,
            causality_rescaled: 0,
            min_causality_factor: 1.0,
        }
    }
}

impl Add for StepSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            cells: self.cells + rhs.cells,
            shear_regulated: self.shear_regulated + rhs.shear_regulated,
            bulk_regulated: self.bulk_regulated + rhs.bulk_regulated,
            diffusion_regulated: self.diffusion_regulated + rhs.diffusion_regulated,
            causality_rescaled: self.causality_rescaled + rhs.causality_rescaled,
            min_causality_factor: self.min_causality_factor.min(rhs.min_causality_factor),
        }
    }
}

// ── Advance ────────────────────────────────────────────────────────

/// One proper-time step of viscous hydrodynamics.
#[derive(Debug)]
pub struct Advance {
    config: AdvanceConfig,
    physics: Collaborators,
    revert: QuestRevert,
    necessary_log: ReductionLog,
    sufficient_log: ReductionLog,
}

/// Borrowed steppers for one sub-step.
struct Steppers<'a> {
    ideal: IdealStepper<'a>,
    dissipative: DissipativeStepper<'a>,
}

impl Advance {
    /// Validate `config` and start the reduction log of the configured
    /// causality method, if diagnostics are enabled.
    pub fn new(config: AdvanceConfig, physics: Collaborators) -> Result<Self, BuildError> {
        config.validate()?;
        let diag = &config.diagnostics;
        let open = |method: CausalityMethod, file: &str| -> Result<ReductionLog, DiagnosticsError> {
            if diag.enabled && config.causality == method {
                ReductionLog::open(diag.directory.join(file), diag.energy_threshold)
            } else {
                Ok(ReductionLog::disabled())
            }
        };
        let necessary_log = open(CausalityMethod::Necessary, &diag.necessary_file)?;
        let sufficient_log = open(CausalityMethod::Sufficient, &diag.sufficient_file)?;
        let revert = QuestRevert::new(config.quest_revert_strength, config.echo_level);
        Ok(Self {
            config,
            physics,
            revert,
            necessary_log,
            sufficient_log,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &AdvanceConfig {
        &self.config
    }

    fn steppers(&self) -> Steppers<'_> {
        let cfg = &self.config;
        let p = &self.physics;
        let flux = KtFlux::new(
            &*p.eos,
            &*p.reconstruct,
            cfg.geometry,
            Minmod::new(cfg.flux_limiter_theta),
            cfg.delta_tau,
            cfg.boost_invariant,
        );
        Steppers {
            ideal: IdealStepper::new(
                flux,
                &*p.eos,
                &*p.reconstruct,
                &*p.sources,
                &*p.dissipative,
                cfg.geometry,
                cfg.delta_tau,
                cfg.turn_on_rhob,
            ),
            dissipative: DissipativeStepper::new(&*p.dissipative, cfg.viscosity, cfg.delta_tau),
        }
    }

    /// Run one sub-step over every cell, writing `future`.
    ///
    /// `tau` is the proper time at the start of the full step. All three
    /// grids must share one shape. The first failing cell aborts the
    /// sub-step; `future` is then partially written and must be discarded.
    pub fn advance_it(
        &self,
        tau: f64,
        stage: RkStage,
        previous: &Grid,
        current: &Grid,
        future: &mut Grid,
    ) -> Result<StepSummary, StepError> {
        debug_assert!(previous.same_shape(current) && current.same_shape(future));
        let steppers = self.steppers();
        future
            .cells_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(flat, out)| {
                let at = current.index_of(flat);
                self.advance_cell(&steppers, tau, stage, previous, current, at, out)
            })
            .try_reduce(StepSummary::default, |a, b| Ok(a + b))
    }

    #[allow(clippy::too_many_arguments)]
    fn advance_cell(
        &self,
        steppers: &Steppers<'_>,
        tau: f64,
        stage: RkStage,
        previous: &Grid,
        current: &Grid,
        at: CellIndex,
        out: &mut FluidCell,
    ) -> Result<StepSummary, StepError> {
        let mut summary = StepSummary {
            cells: 1,
            ..StepSummary::default()
        };

        let ideal = steppers.ideal.step(tau, stage, previous, current, at)?;
        // Start from a clean cell: ring slots hold stale generations.
        *out = FluidCell::default();
        out.set_primitive(&ideal);

        let flags = self.config.viscosity;
        if !flags.any() {
            return Ok(summary);
        }

        let kin = self.physics.kinematics.compute(tau, previous, current, at);
        steppers
            .dissipative
            .step(tau, stage, previous, current, at, &kin, out);

        if !self.config.past_initial_profile {
            return Ok(summary);
        }

        let report = self.revert.shear_bulk(out, &*self.physics.eos, at);
        if report.shear != ShearAction::Untouched {
            summary.shear_regulated = 1;
        }
        if report.bulk_scale.is_some() {
            summary.bulk_regulated = 1;
        }

        let method = self.config.causality;
        if let Some(report) =
            causality::enforce(method, out, &*self.physics.eos, &*self.physics.transport)
        {
            let log = match method {
                CausalityMethod::Sufficient => &self.sufficient_log,
                _ => &self.necessary_log,
            };
            log.record(report.factor, out.epsilon, tau);
            if !report.is_causal() {
                summary.causality_rescaled = 1;
                summary.min_causality_factor = report.factor;
            }
        }

        if flags.diffusion && self.revert.diffusion(out, at) != DiffusionAction::Untouched {
            summary.diffusion_regulated = 1;
        }
        Ok(summary)
    }

    /// Advance `ring` by one full step of `Δτ` from `tau`.
    ///
    /// On success the ring's *current* generation holds the state at
    /// `tau + Δτ` and *previous* the state at `tau`. On failure the
    /// roles are unchanged and *current* still holds the state at `tau`;
    /// the contents of *previous* and *future* are unspecified, since a
    /// failed corrector has already overwritten part of *previous*.
    pub fn advance_rk(&self, tau: f64, ring: &mut GridRing) -> Result<StepSummary, StepError> {
        let mut total = StepSummary::default();
        for stage in [RkStage::Predictor, RkStage::Corrector] {
            let (previous, current, future) = ring.split(stage);
            let summary = self.advance_it(tau, stage, previous, current, future)?;
            log::debug!(
                "tau = {tau:.6}, {stage}: {} cells, regulated shear/bulk/diffusion {}/{}/{}, \
                 causality rescaled {} (min factor {:.4})",
                summary.cells,
                summary.shear_regulated,
                summary.bulk_regulated,
                summary.diffusion_regulated,
                summary.causality_rescaled,
                summary.min_causality_factor,
            );
            total = total + summary;
        }
        ring.complete_step();
        Ok(total)
    }

    /// Block until every queued reduction record is on disk.
    pub fn flush_diagnostics(&self) -> Result<(), DiagnosticsError> {
        self.necessary_log.flush()?;
        self.sufficient_log.flush()
    }

    /// Stop the reduction-log threads after draining them.
    pub fn close(self) -> Result<(), DiagnosticsError> {
        let Self {
            necessary_log,
            sufficient_log,
            ..
        } = self;
        necessary_log.close()?;
        sufficient_log.close()
    }
}
