//! Bracketing bisection on a closure.

/// Find a sign change of `f` in `[left, right]` to within `tol`.
///
/// The bracket must keep a sign change at every iteration: if `f(left)`
/// and `f(right)` share a sign (or either is NaN) the search fails with
/// `None`. Midpoints with `f ≥ 0` move `left`, the others move `right`;
/// the final `left` is returned. When `f(left) ≥ 0` on entry the result
/// therefore never lands where `f` is negative.
///
/// # Examples
///
/// ```
/// use tauflow_advance::causality::bisect;
///
/// let root = bisect(0.0, 2.0, 1e-6, |x| 1.0 - x * x).unwrap();
/// assert!((root - 1.0).abs() < 1e-5);
/// assert!(bisect(0.0, 0.5, 1e-6, |x| 1.0 - x * x).is_none());
/// ```
pub fn bisect(mut left: f64, mut right: f64, tol: f64, f: impl Fn(f64) -> f64) -> Option<f64> {
    while right - left > tol {
        let product = f(right) * f(left);
        if product > 0.0 || product.is_nan() {
            return None;
        }
        let mid = 0.5 * (left + right);
        if f(mid) < 0.0 {
            right = mid;
        } else {
            left = mid;
        }
    }
    Some(left)
}
