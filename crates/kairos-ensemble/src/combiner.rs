//! Accuracy-weighted combination of member votes.

use kairos_nn::{ClassDistribution, ClassLabel};
use rand::Rng;

use crate::error::EnsembleError;
use crate::vote::{MemberVote, Tally, break_tie};

/// Final label and class probabilities for one query.
#[derive(Debug, Clone)]
pub struct EnsemblePrediction {
    /// The winning class.
    pub label: ClassLabel,
    /// Each class's share of the total member weight.
    pub distribution: ClassDistribution,
}

/// Turns member votes into a label and a probability distribution.
///
/// Probabilities divide each class's vote weight by `cv_sum`, the total
/// member weight fixed at training time, so they sum to 1 whenever every
/// member votes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleCombiner {
    cv_sum: f64,
    n_classes: usize,
}

impl EnsembleCombiner {
    /// Create a combiner for an `n_classes` alphabet with total member weight `cv_sum`.
    #[must_use]
    pub fn new(cv_sum: f64, n_classes: usize) -> Self {
        Self { cv_sum, n_classes }
    }

    /// Return the total member weight.
    #[must_use]
    pub fn cv_sum(&self) -> f64 {
        self.cv_sum
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Fail unless `cv_sum` is a positive finite number.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::EnsembleNotReady`] otherwise.
    pub fn ensure_ready(&self) -> Result<(), EnsembleError> {
        if !(self.cv_sum > 0.0 && self.cv_sum.is_finite()) {
            return Err(EnsembleError::EnsembleNotReady { cv_sum: self.cv_sum });
        }
        Ok(())
    }

    /// Class probabilities for `votes`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EnsembleError::EnsembleNotReady`] | `cv_sum` is not positive |
    /// | [`EnsembleError::LabelOutOfRange`] | A vote names a class outside the alphabet |
    pub fn probabilities(&self, votes: &[MemberVote]) -> Result<ClassDistribution, EnsembleError> {
        self.ensure_ready()?;
        let tally = Tally::from_votes(votes, self.n_classes)?;
        Ok(self.normalize(&tally))
    }

    /// Label and probabilities for `votes`; ties are broken with `rng`.
    ///
    /// # Errors
    ///
    /// Same as [`probabilities`][Self::probabilities].
    pub fn combine<R: Rng + ?Sized>(&self, votes: &[MemberVote], rng: &mut R) -> Result<EnsemblePrediction, EnsembleError> {
        self.ensure_ready()?;
        let tally = Tally::from_votes(votes, self.n_classes)?;
        let label = break_tie(&tally.tied_leaders(), rng).ok_or(EnsembleError::EnsembleNotReady { cv_sum: self.cv_sum })?;
        Ok(EnsemblePrediction {
            label,
            distribution: self.normalize(&tally),
        })
    }

    fn normalize(&self, tally: &Tally) -> ClassDistribution {
        ClassDistribution::new(tally.as_slice().iter().map(|w| w / self.cv_sum).collect())
    }
}
