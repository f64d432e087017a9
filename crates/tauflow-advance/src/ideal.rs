//! Runge-Kutta sub-step of energy-momentum and net-baryon conservation.
//!
//! Solves `∂_μ T^{μν} = -∂_μ W^{μν} + j^ν` for the ideal variables of one
//! cell. The predictor produces `q* = q_n + k₁`; the corrector produces
//! `(q_n + q* + k₂)/2`.

use tauflow_core::{Eos, ReconstCell, Reconstruct, RkStage, SourceProvider, StepError, TJbVec};
use tauflow_grid::{CellIndex, DissipativeTerms, Grid};

use crate::config::GridGeometry;
use crate::flux::KtFlux;
use crate::stress::tjb_row;

/// Ideal-part stepper bound to its collaborators.
#[derive(Clone, Copy)]
pub struct IdealStepper<'a> {
    flux: KtFlux<'a>,
    eos: &'a dyn Eos,
    reconstruct: &'a dyn Reconstruct,
    sources: &'a dyn SourceProvider,
    dissipative: &'a dyn DissipativeTerms,
    geometry: GridGeometry,
    delta_tau: f64,
    turn_on_rhob: bool,
}

impl<'a> IdealStepper<'a> {
    /// Bind the stepper.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flux: KtFlux<'a>,
        eos: &'a dyn Eos,
        reconstruct: &'a dyn Reconstruct,
        sources: &'a dyn SourceProvider,
        dissipative: &'a dyn DissipativeTerms,
        geometry: GridGeometry,
        delta_tau: f64,
        turn_on_rhob: bool,
    ) -> Self {
        Self {
            flux,
            eos,
            reconstruct,
            sources,
            dissipative,
            geometry,
            delta_tau,
            turn_on_rhob,
        }
    }

    /// Source vector `τ·(j^μ, ρ_source)` of a cell, or zero when the
    /// provider is inactive.
    fn source(&self, tau_rk: f64, current: &Grid, at: CellIndex) -> Result<TJbVec, StepError> {
        let mut q_source = [0.0; 5];
        if !self.sources.has_sources() {
            return Ok(q_source);
        }
        let (x, y, eta) = self.geometry.position(at);
        let u = current[at].u;
        let j_mu = self.sources.energy_momentum_source(tau_rk, x, y, eta, &u);
        for (component, (slot, j)) in q_source.iter_mut().zip(j_mu).enumerate() {
            *slot = tau_rk * j;
            if slot.is_nan() {
                log::error!("non-finite source term, component {component}, cell {at:?}");
                return Err(StepError::NonFiniteSource {
                    cell: current.flat(at),
                    component,
                });
            }
        }
        if self.turn_on_rhob {
            q_source[4] = tau_rk * self.sources.baryon_source(tau_rk, x, y, eta, &u);
        }
        Ok(q_source)
    }

    /// Advance the ideal variables of `at` by one sub-step.
    ///
    /// `tau` is the proper time at the start of the full step. The
    /// returned primitive state belongs at `tau + Δτ`.
    pub fn step(
        &self,
        tau: f64,
        stage: RkStage,
        previous: &Grid,
        current: &Grid,
        at: CellIndex,
    ) -> Result<ReconstCell, StepError> {
        let rk = stage.as_flag();
        let tau_rk = tau + rk * self.delta_tau;

        let mut qi = self.flux.delta_qi(tau_rk, current, at)?;
        let q_source = self.source(tau_rk, current, at)?;
        let dwmn = self.dissipative.w_divergence(tau_rk, current, previous, at);
        let q_start = tjb_row(self.eos, &previous[at].primitive(), 0);

        for alpha in 0..5 {
            qi[alpha] -= dwmn[alpha] * self.delta_tau;
            qi[alpha] += q_source[alpha] * self.delta_tau;
            qi[alpha] += rk * q_start[alpha] * tau;
            qi[alpha] /= 1.0 + rk;
        }

        let tau_next = tau + self.delta_tau;
        self.reconstruct
            .reconstruct(tau_next, &qi, &current[at])
            .map_err(|source| StepError::reconstruction(current.flat(at), source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minmod::Minmod;
    use tauflow_core::FluidCell;
    use tauflow_grid::{EdgeBehavior, GridDims};
    use tauflow_test_utils::{ConstantSources, LinearEos, LinearReconstruct, NullDissipativeTerms};

    struct Fixture {
        eos: LinearEos,
        reconstruct: LinearReconstruct,
        dissipative: NullDissipativeTerms,
        geometry: GridGeometry,
    }

    impl Fixture {
        fn new(eos: LinearEos, dims: GridDims) -> Self {
            Self {
                eos,
                reconstruct: LinearReconstruct::new(eos),
                dissipative: NullDissipativeTerms,
                geometry: GridGeometry::centred(dims, 0.1, 0.1, 0.1),
            }
        }

        fn stepper<'a>(&'a self, sources: &'a ConstantSources) -> IdealStepper<'a> {
            let flux = KtFlux::new(
                &self.eos,
                &self.reconstruct,
                self.geometry,
                Minmod::default(),
                0.01,
                true,
            );
            IdealStepper::new(
                flux,
                &self.eos,
                &self.reconstruct,
                sources,
                &self.dissipative,
                self.geometry,
                0.01,
                true,
            )
        }
    }

    #[test]
    fn pressureless_fluid_at_rest_is_stationary() {
        let dims = GridDims::new(3, 3, 1);
        let fx = Fixture::new(LinearEos::new(0.0), dims);
        let sources = ConstantSources::none();
        let grid = Grid::filled(dims, EdgeBehavior::Clamp, FluidCell::at_rest(2.0, 0.5)).unwrap();
        let at = CellIndex::new(1, 1, 0);

        let predicted = fx
            .stepper(&sources)
            .step(1.0, RkStage::Predictor, &grid, &grid, at)
            .unwrap();
        // τ·ε is conserved for dust; ε itself dilutes as 1/τ.
        assert!((predicted.e - 2.0 / 1.01).abs() < 1e-12);
        assert!((predicted.rhob - 0.5 / 1.01).abs() < 1e-12);
        assert_eq!(predicted.u[1], 0.0);
    }

    #[test]
    fn constant_energy_source_is_injected() {
        let dims = GridDims::new(1, 1, 1);
        let fx = Fixture::new(LinearEos::new(0.0), dims);
        let sources = ConstantSources::new([1.0, 0.0, 0.0, 0.0], 0.0);
        let grid = Grid::filled(dims, EdgeBehavior::Clamp, FluidCell::at_rest(2.0, 0.0)).unwrap();
        let at = CellIndex::new(0, 0, 0);

        let out = fx
            .stepper(&sources)
            .step(1.0, RkStage::Predictor, &grid, &grid, at)
            .unwrap();
        // τ_next·ε = τ·ε + τ·j⁰·Δτ
        assert!((out.e * 1.01 - (2.0 + 0.01)).abs() < 1e-12);
    }

    #[test]
    fn nan_source_is_fatal() {
        let dims = GridDims::new(1, 1, 1);
        let fx = Fixture::new(LinearEos::CONFORMAL, dims);
        let sources = ConstantSources::new([0.0, f64::NAN, 0.0, 0.0], 0.0);
        let grid = Grid::filled(dims, EdgeBehavior::Clamp, FluidCell::at_rest(1.0, 0.0)).unwrap();
        match fx
            .stepper(&sources)
            .step(1.0, RkStage::Predictor, &grid, &grid, CellIndex::new(0, 0, 0))
        {
            Err(StepError::NonFiniteSource { component: 1, .. }) => {}
            other => panic!("expected NonFiniteSource, got {other:?}"),
        }
    }

    #[test]
    fn corrector_averages_with_the_start_of_step_state() {
        let dims = GridDims::new(1, 1, 1);
        let fx = Fixture::new(LinearEos::new(0.0), dims);
        let sources = ConstantSources::none();
        let start = Grid::filled(dims, EdgeBehavior::Clamp, FluidCell::at_rest(2.0, 0.0)).unwrap();
        let at = CellIndex::new(0, 0, 0);
        let stepper = fx.stepper(&sources);

        let mut predicted = start.clone();
        let p = stepper.step(1.0, RkStage::Predictor, &start, &start, at).unwrap();
        predicted[at].set_primitive(&p);
        let corrected = stepper.step(1.0, RkStage::Corrector, &start, &predicted, at).unwrap();
        // Dust at rest: both stages conserve τ·ε exactly.
        assert!((corrected.e * 1.01 - 2.0).abs() < 1e-12);
    }
}
