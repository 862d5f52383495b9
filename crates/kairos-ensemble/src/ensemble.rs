//! Ensemble training and prediction.

use kairos_nn::{CancelToken, ClassDistribution, ClassLabel, Dataset, LabelAlphabet, NnError};
use rand::Rng;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::capability::TunedParameter;
use crate::combiner::EnsemblePrediction;
use crate::error::EnsembleError;
use crate::group::{ConstituentGroup, MemberFit};
use crate::state::EnsembleState;
use crate::vote::MemberVote;

/// An untrained ensemble of constituent groups.
///
/// Construct via [`Ensemble::new`], optionally share a [`CancelToken`], then
/// call [`fit`][Self::fit].
pub struct Ensemble {
    groups: Vec<Box<dyn ConstituentGroup>>,
    cancel: CancelToken,
}

impl Ensemble {
    /// Create an ensemble over `groups`.
    #[must_use]
    pub fn new(groups: Vec<Box<dyn ConstituentGroup>>) -> Self {
        Self {
            groups,
            cancel: CancelToken::new(),
        }
    }

    /// Share a cancel token with the caller.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Return the number of groups.
    #[must_use]
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Train every group in parallel and fix the member weights.
    ///
    /// Groups train on rayon workers; the state is built only after all of
    /// them have finished. The cancel token is checked before each group.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EnsembleError::Group`] | A group fails to train |
    /// | [`EnsembleError::InvalidMemberWeight`] | A member reports a negative or non-finite weight |
    /// | [`EnsembleError::TrainPredictionMismatch`] | A member's training predictions do not cover `dataset` |
    /// | [`EnsembleError::Cancelled`] | The cancel token fired |
    #[instrument(skip_all, fields(n_groups = self.groups.len(), n_series = dataset.len()))]
    pub fn fit(mut self, dataset: &Dataset) -> Result<FittedEnsemble, EnsembleError> {
        info!(n_classes = dataset.n_classes(), "training ensemble");
        let cancel = self.cancel.clone();

        let group_fits: Vec<(String, Vec<MemberFit>)> = self
            .groups
            .par_iter_mut()
            .map(|group| {
                cancel.check().map_err(|_| EnsembleError::Cancelled)?;
                let fits = group.train(dataset, &cancel)?;
                debug!(group = group.name(), n_members = fits.len(), "group trained");
                Ok((group.name().to_owned(), fits))
            })
            .collect::<Result<_, EnsembleError>>()?;

        let state = EnsembleState::new(group_fits, dataset.len(), dataset.n_classes())?;
        info!(
            n_members = state.n_members(),
            cv_sum = state.cv_sum(),
            "ensemble trained"
        );

        Ok(FittedEnsemble {
            groups: self.groups,
            state,
            train_labels: dataset.labels(),
            alphabet: dataset.alphabet().clone(),
            series_len: dataset.series_len(),
            cancel,
        })
    }
}

/// A trained ensemble. Prediction never mutates it.
pub struct FittedEnsemble {
    groups: Vec<Box<dyn ConstituentGroup>>,
    state: EnsembleState,
    train_labels: Vec<ClassLabel>,
    alphabet: LabelAlphabet,
    series_len: usize,
    cancel: CancelToken,
}

impl FittedEnsemble {
    /// Collect every member's vote for `query`.
    ///
    /// The cancel token is checked between groups.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EnsembleError::Nn`] | `query.len()` differs from the training series length |
    /// | [`EnsembleError::MemberCountMismatch`] | A group returns the wrong number of predictions |
    /// | [`EnsembleError::Cancelled`] | The cancel token fired |
    pub fn votes(&self, query: &[f64]) -> Result<Vec<MemberVote>, EnsembleError> {
        if query.len() != self.series_len {
            return Err(NnError::DimensionMismatch {
                expected: self.series_len,
                got: query.len(),
            }
            .into());
        }
        let mut votes = Vec::with_capacity(self.state.n_members());
        for (group_id, group) in self.groups.iter().enumerate() {
            self.cancel.check().map_err(|_| EnsembleError::Cancelled)?;
            let predictions = group.predict_members(query)?;
            votes.extend(self.state.votes(group_id, &predictions)?);
        }
        Ok(votes)
    }

    /// Predict the label and class probabilities of `query`, breaking ties with `rng`.
    ///
    /// # Errors
    ///
    /// [`EnsembleError::EnsembleNotReady`] if the total member weight is zero,
    /// otherwise as [`votes`][Self::votes].
    pub fn predict_with_proba<R: Rng + ?Sized>(
        &self,
        query: &[f64],
        rng: &mut R,
    ) -> Result<EnsemblePrediction, EnsembleError> {
        self.state.combiner().ensure_ready()?;
        let votes = self.votes(query)?;
        self.state.combiner().combine(&votes, rng)
    }

    /// Predict the label of `query`, breaking ties with `rng`.
    ///
    /// # Errors
    ///
    /// See [`predict_with_proba`][Self::predict_with_proba].
    pub fn predict<R: Rng + ?Sized>(&self, query: &[f64], rng: &mut R) -> Result<ClassLabel, EnsembleError> {
        Ok(self.predict_with_proba(query, rng)?.label)
    }

    /// Return each class's share of the total member weight for `query`.
    ///
    /// # Errors
    ///
    /// See [`predict_with_proba`][Self::predict_with_proba].
    pub fn predict_proba(&self, query: &[f64]) -> Result<ClassDistribution, EnsembleError> {
        self.state.combiner().ensure_ready()?;
        let votes = self.votes(query)?;
        self.state.combiner().probabilities(&votes)
    }

    /// Accuracy of the ensemble on its training set, from members' held-out predictions.
    ///
    /// Combines the members' training predictions per series with the same
    /// weights and tie-breaking as [`predict`][Self::predict]. Returns `None`
    /// if any member did not supply training predictions.
    ///
    /// # Errors
    ///
    /// [`EnsembleError::EnsembleNotReady`] if the total member weight is zero.
    pub fn train_accuracy<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<f64>, EnsembleError> {
        if !self.state.has_training_predictions() || self.train_labels.is_empty() {
            return Ok(None);
        }
        let combiner = self.state.combiner();
        combiner.ensure_ready()?;

        let mut correct = 0usize;
        for (index, &truth) in self.train_labels.iter().enumerate() {
            let Some(votes) = self.state.training_votes(index) else {
                return Ok(None);
            };
            if combiner.combine(&votes, rng)?.label == truth {
                correct += 1;
            }
        }
        Ok(Some(correct as f64 / self.train_labels.len() as f64))
    }

    /// Hyperparameters selected by groups that expose the [`Tunable`](crate::Tunable) capability.
    #[must_use]
    pub fn tuned_parameters(&self) -> Vec<(String, Vec<TunedParameter>)> {
        self.groups
            .iter()
            .filter_map(|g| g.as_tunable().map(|t| (g.name().to_owned(), t.tuned_parameters())))
            .collect()
    }

    /// Return the total member weight fixed at training time.
    #[must_use]
    pub fn cv_sum(&self) -> f64 {
        self.state.cv_sum()
    }

    /// Return the training-time state.
    #[must_use]
    pub fn state(&self) -> &EnsembleState {
        &self.state
    }

    /// Return the label alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &LabelAlphabet {
        &self.alphabet
    }

    /// Return the number of groups.
    #[must_use]
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }
}
