//! Property tests for early abandoning.

use kairos_dtw::{DistanceMetric, TimeSeries, WarpingWindow};
use proptest::prelude::*;

fn pair_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..24).prop_flat_map(|len| {
        (
            prop::collection::vec(-100.0f64..100.0, len),
            prop::collection::vec(-100.0f64..100.0, len),
        )
    })
}

proptest! {
    #[test]
    fn abandoning_never_under_reports(
        (a, b) in pair_strategy(),
        window in 0.0f64..=1.0,
        cutoff in 0.0f64..400.0,
    ) {
        let a = TimeSeries::new(a).unwrap();
        let b = TimeSeries::new(b).unwrap();
        for metric in [DistanceMetric::Euclidean, DistanceMetric::Dtw(WarpingWindow::new(window).unwrap())] {
            let exact = metric.distance(a.as_view(), b.as_view()).unwrap();
            let bounded = metric.distance_with_cutoff(a.as_view(), b.as_view(), cutoff).unwrap();
            prop_assert!(bounded.value() >= exact.value());
            if !bounded.is_abandoned() {
                prop_assert_eq!(bounded, exact);
            }
            if exact.value() <= cutoff {
                prop_assert_eq!(bounded, exact);
            }

            let envelope = metric.envelope(b.as_view());
            let pruned = metric
                .distance_pruned(a.as_view(), b.as_view(), envelope.as_ref(), cutoff)
                .unwrap();
            prop_assert!(pruned.value() >= exact.value());
            if !pruned.is_abandoned() {
                prop_assert_eq!(pruned, exact);
            }
        }
    }
}
