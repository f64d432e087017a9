//! Kinematic derivative quantities consumed by the dissipative stepper.

/// Derivatives of the flow field at one cell.
///
/// Produced by the differentiation collaborator from neighbouring
/// *previous* and *current* cells and passed unchanged to the
/// dissipative source and right-hand-side terms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KinematicBundle {
    /// Expansion rate `θ = ∂_μ u^μ`.
    pub theta: f64,
    /// Four-acceleration `D u^μ`; the fifth slot carries `D u^τ` from the
    /// time derivative alone.
    pub a: [f64; 5],
    /// Velocity-shear tensor `σ^{μν}` in the flat shear layout.
    pub sigma: [f64; 10],
    /// Kinetic vorticity `ω^{μν}` upper triangle without the diagonal.
    pub omega: [f64; 6],
    /// Diffusion driving vector `∇^μ (μ_B / T)`.
    pub dmu_mub_over_t: [f64; 4],
}

impl KinematicBundle {
    /// Bundle for a homogeneous, non-expanding fluid.
    pub fn at_rest() -> Self {
        Self::default()
    }

    /// Bundle for Bjorken flow at proper time `tau`: `θ = 1/τ` and the
    /// longitudinal shear `σ^{ηη} = -2/(3τ)` with `σ^{xx} = σ^{yy} = 1/(3τ)`.
    pub fn bjorken(tau: f64) -> Self {
        let mut sigma = [0.0; 10];
        sigma[4] = 1.0 / (3.0 * tau);
        sigma[7] = 1.0 / (3.0 * tau);
        sigma[9] = -2.0 / (3.0 * tau);
        Self {
            theta: 1.0 / tau,
            sigma,
            ..Self::default()
        }
    }
}
