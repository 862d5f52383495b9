//! Class probability distributions returned by `predict_proba`.

use crate::dataset::ClassLabel;

/// Probability per class, indexed by [`ClassLabel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDistribution {
    probs: Vec<f64>,
}

impl ClassDistribution {
    /// Wrap per-class probabilities in alphabet order.
    #[must_use]
    pub fn new(probs: Vec<f64>) -> Self {
        Self { probs }
    }

    /// All mass on `label`.
    pub(crate) fn one_hot(label: ClassLabel, n_classes: usize) -> Self {
        let mut probs = vec![0.0; n_classes];
        if let Some(p) = probs.get_mut(label.index()) {
            *p = 1.0;
        }
        Self { probs }
    }

    /// Return the probability of `label`, 0.0 if it is out of range.
    #[must_use]
    pub fn probability(&self, label: ClassLabel) -> f64 {
        self.probs.get(label.index()).copied().unwrap_or(0.0)
    }

    /// Return the first class with the highest probability.
    #[must_use]
    pub fn most_likely(&self) -> ClassLabel {
        let mut best = 0;
        for (i, &p) in self.probs.iter().enumerate() {
            if p > self.probs[best] {
                best = i;
            }
        }
        ClassLabel::new(best)
    }

    /// Return the top-k classes sorted by descending probability.
    ///
    /// Equal probabilities keep alphabet order.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(ClassLabel, f64)> {
        let mut indexed: Vec<(ClassLabel, f64)> = self.iter().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
        indexed.truncate(k);
        indexed
    }

    /// Iterate over `(label, probability)` pairs in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassLabel, f64)> + '_ {
        self.probs.iter().enumerate().map(|(i, &p)| (ClassLabel::new(i), p))
    }

    /// Return the probabilities as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// Return the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Return true if the distribution covers no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}
