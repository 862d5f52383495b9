use kairos_nn::{ClassLabel, NnError};

/// Errors from ensemble training and combination.
#[derive(Debug, thiserror::Error)]
pub enum EnsembleError {
    /// Returned when a group is asked to predict before it was trained.
    #[error("group {group:?} is not fitted")]
    ModelNotFitted {
        /// Name of the unfitted group.
        group: String,
    },

    /// Returned when the total member weight is not positive, so probabilities are undefined.
    #[error("ensemble has total member weight {cv_sum}; at least one member needs a positive weight")]
    EnsembleNotReady {
        /// The total member weight fixed at training time.
        cv_sum: f64,
    },

    /// Returned when a group predicts for a different number of members than it trained.
    #[error("group {group:?} returned {got} member predictions, expected {expected}")]
    MemberCountMismatch {
        /// Name of the offending group.
        group: String,
        /// Number of members reported at training time.
        expected: usize,
        /// Number of predictions returned.
        got: usize,
    },

    /// Returned when votes are requested for a group index the ensemble does not have.
    #[error("no group at index {group_id}; ensemble has {n_groups} groups")]
    UnknownGroup {
        /// The requested group index.
        group_id: usize,
        /// Number of groups in the ensemble.
        n_groups: usize,
    },

    /// Returned when a member weight is negative or non-finite.
    #[error("member {member:?} of group {group:?} has invalid weight {weight}")]
    InvalidMemberWeight {
        /// Name of the group.
        group: String,
        /// Name of the member.
        member: String,
        /// The invalid weight.
        weight: f64,
    },

    /// Returned when a vote names a class outside the label alphabet.
    #[error("vote for {label} is outside the {n_classes}-class alphabet")]
    LabelOutOfRange {
        /// The offending label.
        label: ClassLabel,
        /// Number of classes in the alphabet.
        n_classes: usize,
    },

    /// Returned when a member's training predictions do not cover the training set.
    #[error("member {member:?} of group {group:?} has {got} training predictions, expected {expected}")]
    TrainPredictionMismatch {
        /// Name of the group.
        group: String,
        /// Name of the member.
        member: String,
        /// Number of training series.
        expected: usize,
        /// Number of predictions supplied.
        got: usize,
    },

    /// Returned when a group fails to train or predict.
    #[error("group {group:?} failed")]
    Group {
        /// Name of the failing group.
        group: String,
        /// The underlying error.
        source: NnError,
    },

    /// Returned when an ensemble-level check fails, such as a query of the wrong length.
    #[error(transparent)]
    Nn(#[from] NnError),

    /// Returned when the cancel token fired before the operation completed.
    #[error("operation cancelled")]
    Cancelled,
}

impl EnsembleError {
    /// Attribute a nearest-neighbour error to `group`, keeping cancellation distinct.
    #[must_use]
    pub fn from_group(group: &str, source: NnError) -> Self {
        match source {
            NnError::Cancelled => Self::Cancelled,
            source => Self::Group {
                group: group.to_owned(),
                source,
            },
        }
    }
}
