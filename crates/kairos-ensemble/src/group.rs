//! The constituent group seam and what groups report after training.

use kairos_nn::{CancelToken, ClassLabel, Dataset};

use crate::capability::Tunable;
use crate::error::EnsembleError;

/// One trained member of a group, as reported at the end of training.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberFit {
    /// Member name, unique within its group.
    pub name: String,
    /// Training-only accuracy estimate; becomes the member's vote weight.
    pub cv_accuracy: f64,
    /// Held-out prediction for each training series, if the member computed them.
    pub cv_predictions: Option<Vec<ClassLabel>>,
}

impl MemberFit {
    /// A member fit without per-series training predictions.
    #[must_use]
    pub fn new(name: impl Into<String>, cv_accuracy: f64) -> Self {
        Self {
            name: name.into(),
            cv_accuracy,
            cv_predictions: None,
        }
    }

    /// Attach per-series training predictions.
    #[must_use]
    pub fn with_cv_predictions(mut self, predictions: Vec<ClassLabel>) -> Self {
        self.cv_predictions = Some(predictions);
        self
    }
}

/// An independently trained classifier contributing one vote per member.
///
/// Groups train on rayon workers, so implementations must be `Send + Sync`
/// and must not share mutable state with other groups.
pub trait ConstituentGroup: Send + Sync {
    /// Group name used in logs and errors.
    fn name(&self) -> &str;

    /// Train on `dataset` and report every member's fit, in member order.
    ///
    /// `cancel` should be checked between units of work.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::Group`] or [`EnsembleError::Cancelled`] on failure.
    fn train(&mut self, dataset: &Dataset, cancel: &CancelToken) -> Result<Vec<MemberFit>, EnsembleError>;

    /// Predict one label per member for `query`, in the order reported by [`train`][Self::train].
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::ModelNotFitted`] before training.
    fn predict_members(&self, query: &[f64]) -> Result<Vec<ClassLabel>, EnsembleError>;

    /// Return this group's tuning capability, if it has one.
    fn as_tunable(&self) -> Option<&dyn Tunable> {
        None
    }
}
