//! Sakoe-Chiba envelopes and the LB_Keogh lower bound.

use std::collections::VecDeque;

use crate::constraint::BandConstraint;
use crate::series::TimeSeriesView;

/// Precomputed upper and lower Sakoe-Chiba envelope for a time series.
///
/// For each time step `i`, `upper[i]` is the maximum of `series[j]` over
/// `|i - j| <= radius`, and `lower[i]` the minimum. Unconstrained envelopes
/// are the global max/min repeated.
#[derive(Debug, Clone)]
pub struct SeriesEnvelope {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

/// Centered sliding-window extreme of `data` with half-width `radius`.
///
/// `dominates(a, b)` is true when `a` should replace `b` as the extreme
/// (`>=` for a maximum, `<=` for a minimum). The deque holds indices whose
/// values are strictly monotone from front to back, so the front is always
/// the extreme of the current window.
fn sliding_extreme(data: &[f64], radius: usize, dominates: impl Fn(f64, f64) -> bool) -> Vec<f64> {
    let n = data.len();
    let mut out = Vec::with_capacity(n);
    let mut deque: VecDeque<usize> = VecDeque::new();
    let mut next = 0;

    for i in 0..n {
        let hi = (i + radius).min(n - 1);
        while next <= hi {
            while deque.back().is_some_and(|&back| dominates(data[next], data[back])) {
                deque.pop_back();
            }
            deque.push_back(next);
            next += 1;
        }

        let lo = i.saturating_sub(radius);
        while deque.front().is_some_and(|&front| front < lo) {
            deque.pop_front();
        }

        // Index `i` itself was pushed and is inside the window, so something
        // at least as extreme is at the front.
        let front = deque.front().copied().unwrap_or(i);
        out.push(data[front]);
    }
    out
}

impl SeriesEnvelope {
    /// Compute upper and lower envelopes for a series under the given constraint.
    ///
    /// O(n) per envelope using monotonic deques.
    #[must_use]
    pub fn compute(series: TimeSeriesView<'_>, constraint: BandConstraint) -> Self {
        let data = series.as_slice();
        let radius = constraint.radius(data.len());
        Self {
            upper: sliding_extreme(data, radius, |a, b| a >= b),
            lower: sliding_extreme(data, radius, |a, b| a <= b),
        }
    }

    /// Return the upper envelope values.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Return the lower envelope values.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Return the length of the envelope (same as the original series).
    #[must_use]
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    /// Return true if the envelope is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}

/// LB_Keogh lower bound on the banded DTW distance between `query` and the
/// series `envelope` was computed from.
///
/// Sums the squared excursion of each query point outside the envelope and
/// returns the square root. For equal-length series and the same band,
/// `lb_keogh(q, env(c)) <= dtw(q, c)`.
#[must_use]
pub fn lb_keogh(query: &[f64], envelope: &SeriesEnvelope) -> f64 {
    query
        .iter()
        .zip(envelope.upper.iter().zip(&envelope.lower))
        .map(|(&q, (&u, &l))| {
            if q > u {
                (q - u) * (q - u)
            } else if q < l {
                (l - q) * (l - q)
            } else {
                0.0
            }
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dtw::Dtw;
    use crate::series::TimeSeries;

    fn envelope(data: &[f64], constraint: BandConstraint) -> SeriesEnvelope {
        let ts = TimeSeries::new(data.to_vec()).unwrap();
        SeriesEnvelope::compute(ts.as_view(), constraint)
    }

    /// Brute-force window max/min for comparison.
    fn naive(data: &[f64], radius: usize) -> (Vec<f64>, Vec<f64>) {
        let n = data.len();
        (0..n)
            .map(|i| {
                let window = &data[i.saturating_sub(radius)..(i + radius + 1).min(n)];
                let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = window.iter().copied().fold(f64::INFINITY, f64::min);
                (max, min)
            })
            .unzip()
    }

    #[test]
    fn matches_naive_window_extremes() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0, 5.0];
        for radius in 0..=data.len() {
            let env = envelope(&data, BandConstraint::SakoeChibaRadius(radius));
            let (upper, lower) = naive(&data, radius);
            assert_eq!(env.upper(), upper.as_slice(), "upper, radius {radius}");
            assert_eq!(env.lower(), lower.as_slice(), "lower, radius {radius}");
        }
    }

    #[test]
    fn radius_zero_is_the_series_itself() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0];
        let env = envelope(&data, BandConstraint::SakoeChibaRadius(0));
        assert_eq!(env.upper(), &data);
        assert_eq!(env.lower(), &data);
    }

    #[test]
    fn unconstrained_is_global_extremes() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let env = envelope(&data, BandConstraint::Unconstrained);
        assert!(env.upper().iter().all(|&u| u == 9.0));
        assert!(env.lower().iter().all(|&l| l == 1.0));
        assert_eq!(env.len(), data.len());
    }

    #[test]
    fn lb_keogh_never_exceeds_dtw() {
        let pairs: [(&[f64], &[f64]); 5] = [
            (&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 4.0, 3.0, 2.0, 1.0]),
            (&[0.0, 0.0, 0.0, 0.0], &[1.0, 2.0, 3.0, 4.0]),
            (&[1.0, 3.0, 2.0, 5.0, 4.0], &[2.0, 1.0, 4.0, 3.0, 6.0]),
            (&[10.0, -10.0, 10.0, -10.0], &[-10.0, 10.0, -10.0, 10.0]),
            (&[1.0, 1.5, 2.0, 2.5, 3.0], &[1.0, 1.5, 2.0, 2.5, 3.0]),
        ];
        for radius in 0..4 {
            let constraint = BandConstraint::SakoeChibaRadius(radius);
            let dtw = Dtw::with_sakoe_chiba(radius);
            for (q, c) in pairs {
                let qs = TimeSeries::new(q.to_vec()).unwrap();
                let cs = TimeSeries::new(c.to_vec()).unwrap();
                let lb = lb_keogh(q, &SeriesEnvelope::compute(cs.as_view(), constraint));
                let d = dtw.distance(qs.as_view(), cs.as_view()).value();
                assert!(lb <= d + 1e-9, "radius {radius}: lb {lb} > dtw {d} for {q:?} vs {c:?}");
            }
        }
    }

    #[test]
    fn lb_keogh_identical_series_zero() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let env = envelope(&data, BandConstraint::SakoeChibaRadius(2));
        assert_eq!(lb_keogh(&data, &env), 0.0);
    }
}
