//! Vote records, per-class tallies and tie-breaking.

use kairos_nn::ClassLabel;
use rand::Rng;

use crate::error::EnsembleError;

/// Relative gap under which two class weights count as tied.
///
/// Weights are sums of accuracies like `k / n`, so classes that tie exactly
/// on paper can land a few ULPs apart after summation.
pub const TIE_TOLERANCE: f64 = 1e-12;

/// One member's vote for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberVote {
    /// Index of the member's group in the ensemble.
    pub group_id: usize,
    /// Index of the member within its group.
    pub member_id: usize,
    /// The class the member predicted.
    pub predicted: ClassLabel,
    /// The member's training-time accuracy weight.
    pub weight: f64,
}

/// Summed vote weight per class.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    weights: Vec<f64>,
}

impl Tally {
    /// Sum vote weights per class over an `n_classes` alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::LabelOutOfRange`] if a vote names a class outside the alphabet.
    pub fn from_votes(votes: &[MemberVote], n_classes: usize) -> Result<Self, EnsembleError> {
        let mut weights = vec![0.0; n_classes];
        for vote in votes {
            let slot = weights
                .get_mut(vote.predicted.index())
                .ok_or(EnsembleError::LabelOutOfRange {
                    label: vote.predicted,
                    n_classes,
                })?;
            *slot += vote.weight;
        }
        Ok(Self { weights })
    }

    /// Return the summed weight for `label`.
    #[must_use]
    pub fn weight(&self, label: ClassLabel) -> f64 {
        self.weights.get(label.index()).copied().unwrap_or(0.0)
    }

    /// Return the per-class weights in alphabet order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Every class within [`TIE_TOLERANCE`] of the maximum weight, in alphabet order.
    ///
    /// Empty only for an empty alphabet.
    #[must_use]
    pub fn tied_leaders(&self) -> Vec<ClassLabel> {
        let max = self.weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let slack = TIE_TOLERANCE * max.abs();
        self.weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| max - w <= slack)
            .map(|(i, _)| ClassLabel::new(i))
            .collect()
    }
}

/// Pick one of the `tied` classes uniformly at random.
///
/// A singleton is returned without touching `rng`; an empty slice yields `None`.
pub fn break_tie<R: Rng + ?Sized>(tied: &[ClassLabel], rng: &mut R) -> Option<ClassLabel> {
    match tied {
        [] => None,
        [only] => Some(*only),
        _ => Some(tied[rng.gen_range(0..tied.len())]),
    }
}
