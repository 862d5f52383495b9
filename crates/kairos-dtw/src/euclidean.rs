//! Euclidean distance with early abandoning.

/// Euclidean distance between equal-length slices, abandoned once it provably exceeds `cutoff`.
///
/// Returns `f64::INFINITY` when abandoned. Partial sums of squares only grow,
/// so a partial sum whose square root already exceeds `cutoff` proves the
/// full distance does too. A finite result is bit-identical to the
/// unabandoned computation. Callers guarantee `a.len() == b.len()`.
#[must_use]
pub fn euclidean_with_cutoff(a: &[f64], b: &[f64], cutoff: f64) -> f64 {
    let cutoff_sq = cutoff * cutoff;
    let mut sum = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        sum += (x - y).powi(2);
        if sum > cutoff_sq && sum.sqrt() > cutoff {
            return f64::INFINITY;
        }
    }
    sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_four_five() {
        assert_eq!(euclidean_with_cutoff(&[0.0, 0.0], &[3.0, 4.0], f64::INFINITY), 5.0);
    }

    #[test]
    fn abandons_only_above_cutoff() {
        let a = [0.0, 0.0, 0.0];
        let b = [3.0, 4.0, 0.0];
        assert_eq!(euclidean_with_cutoff(&a, &b, 5.0), 5.0);
        assert_eq!(euclidean_with_cutoff(&a, &b, 4.99), f64::INFINITY);
    }

    #[test]
    fn identical_is_zero() {
        let a = [1.5, -2.0, 7.25];
        assert_eq!(euclidean_with_cutoff(&a, &a, 0.0), 0.0);
    }
}
