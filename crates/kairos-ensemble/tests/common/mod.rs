//! Scripted constituent groups for exercising the combiner end to end.

#![allow(dead_code)]

use kairos_ensemble::{ConstituentGroup, EnsembleError, MemberFit};
use kairos_nn::{CancelToken, ClassLabel, Dataset};

/// A group whose members always vote for a fixed class with a fixed weight.
pub struct ScriptedGroup {
    name: String,
    members: Vec<(f64, usize)>,
    cv_predictions: Option<Vec<Vec<usize>>>,
    extra_vote: bool,
    trained: bool,
}

impl ScriptedGroup {
    /// Members given as `(weight, class index)`.
    pub fn new(name: &str, members: &[(f64, usize)]) -> Self {
        Self {
            name: name.to_owned(),
            members: members.to_vec(),
            cv_predictions: None,
            extra_vote: false,
            trained: false,
        }
    }

    /// Per-member training predictions, as class indices.
    pub fn with_cv_predictions(mut self, predictions: Vec<Vec<usize>>) -> Self {
        self.cv_predictions = Some(predictions);
        self
    }

    /// Return one more prediction than there are members.
    pub fn misbehaving(mut self) -> Self {
        self.extra_vote = true;
        self
    }

    pub fn boxed(self) -> Box<dyn ConstituentGroup> {
        Box::new(self)
    }
}

impl ConstituentGroup for ScriptedGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&mut self, _dataset: &Dataset, cancel: &CancelToken) -> Result<Vec<MemberFit>, EnsembleError> {
        if cancel.is_cancelled() {
            return Err(EnsembleError::Cancelled);
        }
        self.trained = true;
        Ok(self
            .members
            .iter()
            .enumerate()
            .map(|(i, &(weight, _))| {
                let fit = MemberFit::new(format!("m{i}"), weight);
                match &self.cv_predictions {
                    Some(all) => fit.with_cv_predictions(all[i].iter().copied().map(ClassLabel::new).collect()),
                    None => fit,
                }
            })
            .collect())
    }

    fn predict_members(&self, _query: &[f64]) -> Result<Vec<ClassLabel>, EnsembleError> {
        if !self.trained {
            return Err(EnsembleError::ModelNotFitted {
                group: self.name.clone(),
            });
        }
        let mut labels: Vec<ClassLabel> = self.members.iter().map(|&(_, c)| ClassLabel::new(c)).collect();
        if self.extra_vote {
            labels.push(ClassLabel::new(0));
        }
        Ok(labels)
    }
}

/// One length-1 series per class name.
pub fn dataset(classes: &[&str]) -> Dataset {
    Dataset::new(
        classes
            .iter()
            .enumerate()
            .map(|(i, name)| (vec![i as f64], *name))
            .collect(),
    )
    .unwrap()
}
