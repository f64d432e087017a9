//! Eigenvalues of the shear-stress tensor.

use nalgebra::Matrix4;
use tauflow_core::{SHEAR_LEN, W_LEN};

/// Ordered shear eigenvalues `[min, -min - max, max]`.
///
/// The eigenproblem is that of the mixed tensor `π^μ_ν`, i.e. the matrix
/// `π^{μν}·diag(-1, 1, 1, 1)`. Only real parts are kept. The middle entry
/// is reconstructed from tracelessness so the three always sum to zero.
///
/// A non-finite shear tensor yields NaN eigenvalues without running the
/// iterative solver, which would not terminate on NaN input.
pub fn shear_eigenvalues(w: &[f64; W_LEN]) -> [f64; 3] {
    let shear = &w[..SHEAR_LEN];
    if shear.iter().any(|x| !x.is_finite()) {
        return [f64::NAN; 3];
    }
    if shear.iter().all(|&x| x == 0.0) {
        return [0.0; 3];
    }
    #[rustfmt::skip]
    let a = Matrix4::new(
        -w[0], w[1], w[2], w[3],
        -w[1], w[4], w[5], w[6],
        -w[2], w[5], w[7], w[8],
        -w[3], w[6], w[8], w[9],
    );
    let eigenvalues = a.complex_eigenvalues();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for z in eigenvalues.iter() {
        min = min.min(z.re);
        max = max.max(z.re);
    }
    [min, -min - max, max]
}
