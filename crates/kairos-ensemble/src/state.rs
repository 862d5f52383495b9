//! Training-time member weights shared by every prediction.

use kairos_nn::ClassLabel;

use crate::combiner::EnsembleCombiner;
use crate::error::EnsembleError;
use crate::group::MemberFit;
use crate::vote::MemberVote;

/// A trained member and its vote weight.
#[derive(Debug, Clone)]
pub struct MemberRecord {
    /// Member name.
    pub name: String,
    /// Training-time accuracy used as the vote weight.
    pub weight: f64,
    cv_predictions: Option<Vec<ClassLabel>>,
}

/// A trained group and its members, in the order the group predicts them.
#[derive(Debug, Clone)]
pub struct GroupRecord {
    /// Group name.
    pub name: String,
    /// Member records.
    pub members: Vec<MemberRecord>,
}

/// Fixed at the end of training; read-only afterwards.
#[derive(Debug, Clone)]
pub struct EnsembleState {
    groups: Vec<GroupRecord>,
    combiner: EnsembleCombiner,
}

impl EnsembleState {
    /// Validate group fits and fix the weight normalizer.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EnsembleError::InvalidMemberWeight`] | A weight is negative or non-finite |
    /// | [`EnsembleError::TrainPredictionMismatch`] | Training predictions do not cover `n_series` series |
    pub(crate) fn new(
        group_fits: Vec<(String, Vec<MemberFit>)>,
        n_series: usize,
        n_classes: usize,
    ) -> Result<Self, EnsembleError> {
        let mut groups = Vec::with_capacity(group_fits.len());
        for (group, fits) in group_fits {
            let mut members = Vec::with_capacity(fits.len());
            for fit in fits {
                if !(fit.cv_accuracy.is_finite() && fit.cv_accuracy >= 0.0) {
                    return Err(EnsembleError::InvalidMemberWeight {
                        group,
                        member: fit.name,
                        weight: fit.cv_accuracy,
                    });
                }
                if let Some(preds) = &fit.cv_predictions
                    && preds.len() != n_series
                {
                    return Err(EnsembleError::TrainPredictionMismatch {
                        group,
                        member: fit.name,
                        expected: n_series,
                        got: preds.len(),
                    });
                }
                members.push(MemberRecord {
                    name: fit.name,
                    weight: fit.cv_accuracy,
                    cv_predictions: fit.cv_predictions,
                });
            }
            groups.push(GroupRecord { name: group, members });
        }

        let cv_sum = groups.iter().flat_map(|g| &g.members).map(|m| m.weight).sum();
        Ok(Self {
            groups,
            combiner: EnsembleCombiner::new(cv_sum, n_classes),
        })
    }

    /// Return the total member weight.
    #[must_use]
    pub fn cv_sum(&self) -> f64 {
        self.combiner.cv_sum()
    }

    /// Return the combiner built from this state.
    #[must_use]
    pub fn combiner(&self) -> &EnsembleCombiner {
        &self.combiner
    }

    /// Return every group record in ensemble order.
    #[must_use]
    pub fn groups(&self) -> &[GroupRecord] {
        &self.groups
    }

    /// Return the total number of members across groups.
    #[must_use]
    pub fn n_members(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// Pair group `group_id`'s member predictions with the member weights.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EnsembleError::UnknownGroup`] | `group_id` is not a group of this ensemble |
    /// | [`EnsembleError::MemberCountMismatch`] | `predictions` does not have one entry per member |
    pub fn votes(&self, group_id: usize, predictions: &[ClassLabel]) -> Result<Vec<MemberVote>, EnsembleError> {
        let group = self.groups.get(group_id).ok_or(EnsembleError::UnknownGroup {
            group_id,
            n_groups: self.groups.len(),
        })?;
        if group.members.len() != predictions.len() {
            return Err(EnsembleError::MemberCountMismatch {
                group: group.name.clone(),
                expected: group.members.len(),
                got: predictions.len(),
            });
        }
        Ok(group
            .members
            .iter()
            .zip(predictions)
            .enumerate()
            .map(|(member_id, (member, &predicted))| MemberVote {
                group_id,
                member_id,
                predicted,
                weight: member.weight,
            })
            .collect())
    }

    /// Return true if every member supplied training predictions.
    #[must_use]
    pub fn has_training_predictions(&self) -> bool {
        self.groups
            .iter()
            .flat_map(|g| &g.members)
            .all(|m| m.cv_predictions.is_some())
    }

    /// Votes every member cast for training series `index` while held out.
    ///
    /// `None` if any member lacks training predictions.
    pub(crate) fn training_votes(&self, index: usize) -> Option<Vec<MemberVote>> {
        let mut votes = Vec::with_capacity(self.n_members());
        for (group_id, group) in self.groups.iter().enumerate() {
            for (member_id, member) in group.members.iter().enumerate() {
                let predicted = *member.cv_predictions.as_ref()?.get(index)?;
                votes.push(MemberVote {
                    group_id,
                    member_id,
                    predicted,
                    weight: member.weight,
                });
            }
        }
        Some(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fits() -> Vec<(String, Vec<MemberFit>)> {
        vec![
            ("g0".into(), vec![MemberFit::new("m0", 0.5), MemberFit::new("m1", 0.25)]),
            ("g1".into(), vec![MemberFit::new("m0", 0.75)]),
        ]
    }

    #[test]
    fn cv_sum_covers_every_member() {
        let state = EnsembleState::new(fits(), 4, 2).unwrap();
        assert_eq!(state.cv_sum(), 1.5);
        assert_eq!(state.n_members(), 3);
        assert!(!state.has_training_predictions());
        assert!(state.training_votes(0).is_none());
    }

    #[test]
    fn votes_are_explicit_records() {
        let state = EnsembleState::new(fits(), 4, 2).unwrap();
        let votes = state.votes(0, &[ClassLabel::new(1), ClassLabel::new(0)]).unwrap();
        assert_eq!(votes[1].group_id, 0);
        assert_eq!(votes[1].member_id, 1);
        assert_eq!(votes[1].predicted, ClassLabel::new(0));
        assert_eq!(votes[1].weight, 0.25);
    }

    #[test]
    fn wrong_prediction_count_is_rejected() {
        let state = EnsembleState::new(fits(), 4, 2).unwrap();
        let err = state.votes(1, &[ClassLabel::new(0), ClassLabel::new(0)]).unwrap_err();
        assert!(matches!(err, EnsembleError::MemberCountMismatch { expected: 1, got: 2, .. }));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let state = EnsembleState::new(fits(), 4, 2).unwrap();
        let err = state.votes(2, &[ClassLabel::new(0)]).unwrap_err();
        assert!(matches!(err, EnsembleError::UnknownGroup { group_id: 2, n_groups: 2 }));
    }

    #[test]
    fn invalid_weights_are_rejected() {
        for weight in [-0.1, f64::NAN, f64::INFINITY] {
            let fits = vec![("g".to_owned(), vec![MemberFit::new("m", weight)])];
            assert!(matches!(
                EnsembleState::new(fits, 1, 1),
                Err(EnsembleError::InvalidMemberWeight { .. })
            ));
        }
    }

    #[test]
    fn training_predictions_must_cover_the_dataset() {
        let fits = vec![(
            "g".to_owned(),
            vec![MemberFit::new("m", 1.0).with_cv_predictions(vec![ClassLabel::new(0)])],
        )];
        assert!(matches!(
            EnsembleState::new(fits, 3, 1),
            Err(EnsembleError::TrainPredictionMismatch { expected: 3, got: 1, .. })
        ));
    }
}
