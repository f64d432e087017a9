//! Generalized minmod slope limiter.

/// Slope limiter applied to one-sided differences of a conserved quantity.
///
/// With `Δ+ = up1 - a` and `Δ- = a - am1`, the limited slope is zero at
/// extrema (`Δ+·Δ- ≤ 0`) and otherwise
/// `sign(Δ-)·min(θ|Δ-|, ½|Δ+ + Δ-|, θ|Δ+|)`. `θ = 1` is the classic
/// minmod; larger `θ` is less diffusive, up to the MC limiter at `θ = 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minmod {
    theta: f64,
}

impl Default for Minmod {
    fn default() -> Self {
        Self { theta: 1.0 }
    }
}

impl Minmod {
    /// Limiter with the given `θ`. Range checking happens in config
    /// validation.
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }

    /// The limiter parameter.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Limited slope around `a` from its upper (`up1`) and lower (`am1`)
    /// neighbours.
    pub fn dx(&self, up1: f64, a: f64, am1: f64) -> f64 {
        let diff_plus = up1 - a;
        let diff_minus = a - am1;
        if diff_plus * diff_minus <= 0.0 {
            return 0.0;
        }
        let central = 0.5 * (diff_plus + diff_minus).abs();
        let magnitude = (self.theta * diff_minus.abs())
            .min(central)
            .min(self.theta * diff_plus.abs());
        magnitude.copysign(diff_minus)
    }
}
