//! Ideal energy-momentum tensor and baryon current of a primitive state.

use tauflow_core::{Eos, ReconstCell};

/// `T^{μν}` for `μ < 4`, or `J^ν = ρ_B u^ν` for `μ = 4`, of an ideal
/// fluid: `(ε + P) u^μ u^ν + P g^{μν}` with `g = diag(-1, 1, 1, 1)`.
pub fn tjb(eos: &dyn Eos, cell: &ReconstCell, mu: usize, nu: usize) -> f64 {
    if mu == 4 {
        return cell.rhob * cell.u[nu];
    }
    let p = eos.pressure(cell.e, cell.rhob);
    let gfac = match (mu, nu) {
        (0, 0) => -1.0,
        (a, b) if a == b => 1.0,
        _ => 0.0,
    };
    (cell.e + p) * cell.u[mu] * cell.u[nu] + p * gfac
}

/// Row `(T^{ν0}, T^{ν1}, T^{ν2}, T^{ν3}, J^ν)` used as the conserved
/// vector (`ν = 0`) or its flux along direction `ν`.
pub fn tjb_row(eos: &dyn Eos, cell: &ReconstCell, nu: usize) -> [f64; 5] {
    let p = eos.pressure(cell.e, cell.rhob);
    let h = cell.e + p;
    let mut row = [0.0; 5];
    for (alpha, slot) in row.iter_mut().take(4).enumerate() {
        let gfac = match (alpha, nu) {
            (0, 0) => -1.0,
            (a, b) if a == b => 1.0,
            _ => 0.0,
        };
        *slot = h * cell.u[alpha] * cell.u[nu] + p * gfac;
    }
    row[4] = cell.rhob * cell.u[nu];
    row
}
