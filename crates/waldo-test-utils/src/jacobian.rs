//! Jacobian oracles for an N-link planar revolute arm.
//!
//! [`reference_jacobian`] is derived independently of the production code by
//! direct trigonometric summation: it is the exact partial derivative of the
//! textbook cumulative-angle position map [`trig_position`]. Keeping the
//! derivation separate from `waldo-ik`'s geometric construction is the whole
//! point; do not refactor the two into a shared path.

use nalgebra::Vector2;

/// Textbook cumulative-angle position map for an N-link planar arm:
/// `p(q) = Σ_k L_k · (cos cum_k, sin cum_k)` with `cum_k = q_1 + … + q_k`.
pub fn trig_position(link_lengths: &[f64], q: &[f64]) -> Vector2<f64> {
    assert_eq!(link_lengths.len(), q.len());

    let mut position = Vector2::zeros();
    let mut cumulative = 0.0;
    for (&length, &angle) in link_lengths.iter().zip(q) {
        cumulative += angle;
        position.x += length * cumulative.cos();
        position.y += length * cumulative.sin();
    }
    position
}

/// 2×N Jacobian of [`trig_position`] by trigonometric summation.
///
/// Column i sums the contributions of links i..N:
/// `(−Σ L_k·sin cum_k, Σ L_k·cos cum_k)`.
pub fn reference_jacobian(link_lengths: &[f64], q: &[f64]) -> Vec<Vector2<f64>> {
    assert_eq!(link_lengths.len(), q.len());
    let n = q.len();

    let mut cumulative = Vec::with_capacity(n);
    let mut sum = 0.0;
    for &angle in q {
        sum += angle;
        cumulative.push(sum);
    }

    (0..n)
        .map(|i| {
            let mut dx = 0.0;
            let mut dy = 0.0;
            for k in i..n {
                dx -= link_lengths[k] * cumulative[k].sin();
                dy += link_lengths[k] * cumulative[k].cos();
            }
            Vector2::new(dx, dy)
        })
        .collect()
}

/// Central finite-difference Jacobian of an arbitrary planar position map.
pub fn numerical_jacobian<F>(position: F, q: &[f64], h: f64) -> Vec<Vector2<f64>>
where
    F: Fn(&[f64]) -> Vector2<f64>,
{
    (0..q.len())
        .map(|i| {
            let mut plus = q.to_vec();
            let mut minus = q.to_vec();
            plus[i] += h;
            minus[i] -= h;
            (position(&plus) - position(&minus)) / (2.0 * h)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn straight_two_link_arm() {
        // Joint 1 moves both links, joint 2 only the second.
        let j = reference_jacobian(&[1.0, 1.0], &[0.0, 0.0]);
        assert_relative_eq!(j[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(j[0].y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(j[1].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(j[1].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn right_angle_two_link_arm() {
        let j = reference_jacobian(&[1.0, 1.0], &[FRAC_PI_2, 0.0]);
        assert_relative_eq!(j[0].x, -2.0, epsilon = 1e-12);
        assert_relative_eq!(j[0].y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(j[1].x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(j[1].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn matches_finite_differences_of_trig_map() {
        let lengths = [1.0, 1.0, 0.5];
        let q = [0.3, -0.7, 1.2];

        let analytic = reference_jacobian(&lengths, &q);
        let numeric = numerical_jacobian(|q| trig_position(&lengths, q), &q, 1e-6);

        for (a, n) in analytic.iter().zip(&numeric) {
            assert_relative_eq!(a.x, n.x, epsilon = 1e-4);
            assert_relative_eq!(a.y, n.y, epsilon = 1e-4);
        }
    }

    #[test]
    fn empty_chain_has_empty_jacobian() {
        assert!(reference_jacobian(&[], &[]).is_empty());
        let p = trig_position(&[], &[]);
        assert_relative_eq!(p.norm(), 0.0, epsilon = 1e-12);
    }
}
