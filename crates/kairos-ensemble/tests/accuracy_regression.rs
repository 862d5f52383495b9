//! Accuracy regression tests for kairos-ensemble.
//!
//! These tests verify that an ensemble of elastic nearest-neighbour groups
//! stays accurate on a deterministic synthetic dataset.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kairos_dtw::DistanceMetric;
use kairos_ensemble::{ConstituentGroup, ElasticNearestNeighborGroup, Ensemble, FittedEnsemble};
use kairos_nn::{Dataset, NearestNeighborConfig, WindowSearch};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic series datasets
// ---------------------------------------------------------------------------

const SERIES_LEN: usize = 32;

/// Three shapes at random offsets: a step up, a step down, and a single
/// spike on a raised baseline.
fn make_rows(rng: &mut ChaCha8Rng, per_class: usize) -> Vec<(Vec<f64>, &'static str)> {
    let mut rows = Vec::with_capacity(per_class * 3);
    for _ in 0..per_class {
        let at: usize = rng.gen_range(8..24);
        let mut noisy = |base: f64| base + rng.gen_range(-0.1..0.1);
        let up: Vec<f64> = (0..SERIES_LEN).map(|i| noisy(if i >= at { 1.0 } else { 0.0 })).collect();
        let down: Vec<f64> = (0..SERIES_LEN).map(|i| noisy(if i < at { 1.0 } else { 0.0 })).collect();
        let spike: Vec<f64> = (0..SERIES_LEN).map(|i| noisy(if i == at { 2.5 } else { 0.5 })).collect();
        rows.push((up, "up"));
        rows.push((down, "down"));
        rows.push((spike, "spike"));
    }
    rows
}

fn fit_ensemble() -> (FittedEnsemble, Vec<(Vec<f64>, &'static str)>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let train = Dataset::new(make_rows(&mut rng, 15)).unwrap();
    let test = make_rows(&mut rng, 15);

    let quick = ElasticNearestNeighborGroup::empty("quick")
        .with_member("euclidean", NearestNeighborConfig::fixed(DistanceMetric::Euclidean))
        .with_member("dtw_r0.1", NearestNeighborConfig::fixed(DistanceMetric::dtw(0.1).unwrap()));
    let searched = ElasticNearestNeighborGroup::empty("searched").with_member(
        "dtw_searched",
        NearestNeighborConfig::searched(WindowSearch::new(0.25, 2).unwrap()),
    );

    let groups: Vec<Box<dyn ConstituentGroup>> = vec![
        Box::new(ElasticNearestNeighborGroup::new("elastic")),
        Box::new(quick),
        Box::new(searched),
    ];
    let fitted = Ensemble::new(groups).fit(&train).unwrap();
    (fitted, test)
}

// ---------------------------------------------------------------------------
// a) test_accuracy_above_threshold
// ---------------------------------------------------------------------------

/// Held-out accuracy must exceed 0.9.
#[test]
fn test_accuracy_above_threshold() {
    let (fitted, test) = fit_ensemble();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let correct = test
        .iter()
        .filter(|(values, name)| {
            let label = fitted.predict(values, &mut rng).unwrap();
            fitted.alphabet().name(label) == Some(*name)
        })
        .count();
    let accuracy = correct as f64 / test.len() as f64;
    assert!(accuracy > 0.9, "test accuracy {accuracy} <= 0.9");
}

// ---------------------------------------------------------------------------
// b) train_accuracy_is_available
// ---------------------------------------------------------------------------

#[test]
fn train_accuracy_is_available() {
    let (fitted, _) = fit_ensemble();
    let acc = fitted
        .train_accuracy(&mut ChaCha8Rng::seed_from_u64(0))
        .unwrap()
        .expect("elastic members supply training predictions");
    assert!(acc > 0.8, "train accuracy {acc} <= 0.8");
}

// ---------------------------------------------------------------------------
// c) weights_and_probabilities
// ---------------------------------------------------------------------------

#[test]
fn weights_and_probabilities() {
    let (fitted, test) = fit_ensemble();
    assert_eq!(fitted.state().n_members(), 6);
    let total: f64 = fitted
        .state()
        .groups()
        .iter()
        .flat_map(|g| &g.members)
        .map(|m| m.weight)
        .sum();
    assert!((fitted.cv_sum() - total).abs() < 1e-12);

    for (values, _) in test.iter().take(10) {
        let proba = fitted.predict_proba(values).unwrap();
        let sum: f64 = proba.as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "probabilities sum to {sum}");
    }
}

// ---------------------------------------------------------------------------
// d) tuned_parameters_reported
// ---------------------------------------------------------------------------

#[test]
fn tuned_parameters_reported() {
    let (fitted, _) = fit_ensemble();
    let tuned = fitted.tuned_parameters();
    assert_eq!(tuned.len(), 3);
    let (name, params) = &tuned[2];
    assert_eq!(name, "searched");
    assert_eq!(params.len(), 1);
    assert!(params[0].value <= 0.25);
}
