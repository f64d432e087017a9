//! Dilute-region regulators for the dissipative currents.
//!
//! Where the energy density is small the relaxation equations are stiff
//! and the currents can grow far beyond the ideal pressure. The regulator
//! compares their Lorentz-invariant size against the ideal part,
//! weighted by a Fermi-function `factor(ε)` that vanishes in vacuum, and
//! scales them back to a ceiling of 0.1 when they exceed it.

use tauflow_core::{Eos, FluidCell, DIFFUSION_OFFSET, SHEAR_LEN};
use tauflow_grid::CellIndex;

/// Energy density above which a rescaling is worth a warning.
const EPS_SCALE: f64 = 0.1;

/// Width of the Fermi-function switch.
const XI: f64 = 0.05;

/// Ceiling on every normalized current size.
pub const RHO_MAX: f64 = 0.1;

/// What happened to the shear tensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShearAction {
    /// Within the ceiling.
    Untouched,
    /// Scaled by the contained factor.
    Scaled(f64),
    /// The normalized size was NaN; shear and eigenvalues were zeroed.
    Zeroed,
}

/// What happened to the diffusion current.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiffusionAction {
    /// Within the ceiling.
    Untouched,
    /// Scaled by the contained factor.
    Scaled(f64),
    /// `q^μ q_μ < 0`; all four components were reset to zero.
    Reset,
}

/// Outcome of the shear/bulk regulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevertReport {
    /// Shear outcome.
    pub shear: ShearAction,
    /// Factor applied to `Π`, if any.
    pub bulk_scale: Option<f64>,
}

/// Shear/bulk and diffusion regulators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuestRevert {
    strength: f64,
    echo_level: u32,
}

impl QuestRevert {
    /// A regulator with the given strength and warning verbosity.
    pub fn new(strength: f64, echo_level: u32) -> Self {
        Self {
            strength,
            echo_level,
        }
    }

    /// `10·strength·(f(ε) - f(0))` with `f` a Fermi function centred on
    /// [`EPS_SCALE`].
    pub fn factor(&self, e: f64) -> f64 {
        10.0 * self.strength
            * (1.0 / ((-(e - EPS_SCALE) / XI).exp() + 1.0) - 1.0 / ((EPS_SCALE / XI).exp() + 1.0))
    }

    fn verbose(&self, e: f64) -> bool {
        e > EPS_SCALE && self.echo_level > 5
    }

    /// Regulate shear and bulk of `cell`.
    pub fn shear_bulk(&self, cell: &mut FluidCell, eos: &dyn Eos, at: CellIndex) -> RevertReport {
        let e = cell.epsilon;
        let factor = self.factor(e);
        let w = &cell.w;

        let pisize = w[0] * w[0] + w[4] * w[4] + w[7] * w[7] + w[9] * w[9]
            - 2.0 * (w[1] * w[1] + w[2] * w[2] + w[3] * w[3])
            + 2.0 * (w[5] * w[5] + w[6] * w[6] + w[8] * w[8]);
        let bulksize = 3.0 * cell.pi_b * cell.pi_b;
        let p = eos.pressure(e, cell.rhob);
        let eq_size = e * e + 3.0 * p * p;

        let rho_shear = (pisize / eq_size).sqrt() / factor;
        let rho_bulk = (bulksize / eq_size).sqrt() / factor;

        let shear = if rho_shear.is_nan() {
            cell.w[..SHEAR_LEN].fill(0.0);
            cell.lambdas = [0.0; 3];
            ShearAction::Zeroed
        } else if rho_shear > RHO_MAX {
            if self.verbose(e) {
                log::warn!("{at:?}: e = {e:e}, shear |pi/(e+3P)| = {rho_shear:e}, rescaling");
            }
            let scale = RHO_MAX / rho_shear;
            for value in &mut cell.w[..SHEAR_LEN] {
                *value *= scale;
            }
            for lam in &mut cell.lambdas {
                *lam *= scale;
            }
            ShearAction::Scaled(scale)
        } else {
            ShearAction::Untouched
        };

        let bulk_scale = if rho_bulk > RHO_MAX {
            if self.verbose(e) {
                log::warn!("{at:?}: e = {e:e}, bulk |Pi/(e+3P)| = {rho_bulk:e}, rescaling");
            }
            let scale = RHO_MAX / rho_bulk;
            cell.pi_b *= scale;
            Some(scale)
        } else {
            None
        };

        RevertReport { shear, bulk_scale }
    }

    /// Regulate the diffusion current of `cell` against `ρ_B`.
    pub fn diffusion(&self, cell: &mut FluidCell, at: CellIndex) -> DiffusionAction {
        let q = &mut cell.w[DIFFUSION_OFFSET..DIFFUSION_OFFSET + 4];
        let q_size = -q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3];
        if q_size < 0.0 {
            log::warn!("{at:?}: q^mu q_mu = {q_size:e} < 0, resetting diffusion current");
            q.fill(0.0);
            return DiffusionAction::Reset;
        }

        let e = cell.epsilon;
        let rhob = cell.rhob;
        let rho_q = (q_size / (rhob * rhob)).sqrt() / self.factor(e);
        if rho_q > RHO_MAX {
            if self.verbose(e) {
                log::warn!("{at:?}: e = {e:e}, rhob = {rhob:e}, diffusion |q/rhob| = {rho_q:e}");
            }
            let scale = RHO_MAX / rho_q;
            for value in q.iter_mut() {
                *value *= scale;
            }
            return DiffusionAction::Scaled(scale);
        }
        DiffusionAction::Untouched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tauflow_test_utils::LinearEos;

    const AT: CellIndex = CellIndex {
        ix: 0,
        iy: 0,
        ieta: 0,
    };

    fn normalized_shear(cell: &FluidCell, eos: &LinearEos, regulator: &QuestRevert) -> f64 {
        let w = &cell.w;
        let pisize = w[0] * w[0] + w[4] * w[4] + w[7] * w[7] + w[9] * w[9]
            - 2.0 * (w[1] * w[1] + w[2] * w[2] + w[3] * w[3])
            + 2.0 * (w[5] * w[5] + w[6] * w[6] + w[8] * w[8]);
        let p = eos.pressure(cell.epsilon, cell.rhob);
        let eq = cell.epsilon * cell.epsilon + 3.0 * p * p;
        (pisize / eq).sqrt() / regulator.factor(cell.epsilon)
    }

    #[test]
    fn factor_vanishes_in_vacuum() {
        let regulator = QuestRevert::new(1.0, 1);
        assert!(regulator.factor(0.0).abs() < 1e-15);
        // Saturates at 10·(1 - f(0)) in dense matter.
        let saturated = 10.0 * (1.0 - 1.0 / (2.0f64.exp() + 1.0));
        assert!((regulator.factor(1.0) - saturated).abs() < 1e-6);
    }

    #[test]
    fn huge_shear_in_dilute_cell_is_capped() {
        let eos = LinearEos::CONFORMAL;
        let regulator = QuestRevert::new(1.0, 1);
        let mut cell = FluidCell::at_rest(0.05, 0.0);
        cell.w[4] = 10.0;
        cell.w[7] = 10.0;
        cell.w[9] = 10.0;
        cell.lambdas = [10.0, -20.0, 10.0];

        let report = regulator.shear_bulk(&mut cell, &eos, AT);
        let scale = match report.shear {
            ShearAction::Scaled(scale) => scale,
            other => panic!("expected Scaled, got {other:?}"),
        };
        assert!((normalized_shear(&cell, &eos, &regulator) - RHO_MAX).abs() < 1e-12);
        // Uniform: the ratios between entries survive.
        assert_eq!(cell.w[4], cell.w[7]);
        assert!((cell.lambdas[1] + 20.0 * scale).abs() < 1e-12);
        assert_eq!(report.bulk_scale, None);
    }

    #[test]
    fn moderate_shear_in_dense_cell_is_untouched() {
        let eos = LinearEos::CONFORMAL;
        let regulator = QuestRevert::new(1.0, 1);
        let mut cell = FluidCell::at_rest(10.0, 0.0);
        cell.w[4] = 0.1;
        cell.w[7] = -0.1;
        let before = cell;
        let report = regulator.shear_bulk(&mut cell, &eos, AT);
        assert_eq!(report.shear, ShearAction::Untouched);
        assert_eq!(cell, before);
    }

    #[test]
    fn nan_shear_is_zeroed() {
        let eos = LinearEos::CONFORMAL;
        let regulator = QuestRevert::new(1.0, 1);
        let mut cell = FluidCell::at_rest(1.0, 0.0);
        cell.w[5] = f64::NAN;
        cell.lambdas = [f64::NAN; 3];
        let report = regulator.shear_bulk(&mut cell, &eos, AT);
        assert_eq!(report.shear, ShearAction::Zeroed);
        assert!(cell.w[..SHEAR_LEN].iter().all(|&w| w == 0.0));
        assert_eq!(cell.lambdas, [0.0; 3]);
    }

    #[test]
    fn large_bulk_is_capped() {
        let eos = LinearEos::CONFORMAL;
        let regulator = QuestRevert::new(1.0, 1);
        let mut cell = FluidCell::at_rest(1.0, 0.0);
        cell.pi_b = -5.0;
        let report = regulator.shear_bulk(&mut cell, &eos, AT);
        let scale = report.bulk_scale.expect("bulk should be rescaled");
        assert!((cell.pi_b + 5.0 * scale).abs() < 1e-12);
        let eq = 1.0 + 3.0 / 9.0;
        let rho = (3.0 * cell.pi_b * cell.pi_b / eq).sqrt() / regulator.factor(1.0);
        assert!((rho - RHO_MAX).abs() < 1e-12);
    }

    #[test]
    fn negative_diffusion_norm_is_reset() {
        let regulator = QuestRevert::new(1.0, 1);
        let mut cell = FluidCell::at_rest(1.0, 1.0);
        cell.w[10] = 0.5;
        cell.w[11] = 0.1;
        assert_eq!(regulator.diffusion(&mut cell, AT), DiffusionAction::Reset);
        assert_eq!(&cell.w[10..14], &[0.0; 4]);
    }

    #[test]
    fn large_diffusion_is_capped_against_baryon_density() {
        let regulator = QuestRevert::new(1.0, 1);
        let mut cell = FluidCell::at_rest(1.0, 0.1);
        cell.w[11] = 1.0;
        match regulator.diffusion(&mut cell, AT) {
            DiffusionAction::Scaled(_) => {}
            other => panic!("expected Scaled, got {other:?}"),
        }
        let rho_q = (cell.w[11] * cell.w[11] / 0.01).sqrt() / regulator.factor(1.0);
        assert!((rho_q - RHO_MAX).abs() < 1e-12);
    }
}
