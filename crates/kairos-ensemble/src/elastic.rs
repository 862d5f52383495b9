//! A constituent group of nearest-neighbour classifiers over different distances.

use kairos_dtw::DistanceMetric;
use kairos_nn::{
    CancelToken, ClassLabel, Dataset, NearestNeighborClassifier, NearestNeighborConfig, TrainEstimateMode,
    WindowSearch,
};
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use tracing::debug;

use crate::capability::{Tunable, TunedParameter};
use crate::error::EnsembleError;
use crate::group::{ConstituentGroup, MemberFit};

struct Member {
    name: String,
    classifier: NearestNeighborClassifier,
}

/// 1-NN members that each vote with their own leave-one-out accuracy.
///
/// Every member computes a leave-one-out estimate during training, whatever
/// its config says, because the estimate is its vote weight.
pub struct ElasticNearestNeighborGroup {
    name: String,
    members: Vec<Member>,
}

impl ElasticNearestNeighborGroup {
    /// A group with no members; add them with [`with_member`][Self::with_member].
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// The default members: Euclidean, full-window DTW and searched-window DTW.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::empty(name)
            .with_member("euclidean", NearestNeighborConfig::fixed(DistanceMetric::Euclidean))
            .with_member("dtw_full", NearestNeighborConfig::fixed(DistanceMetric::full_dtw()))
            .with_member("dtw_searched", NearestNeighborConfig::searched(WindowSearch::default()))
    }

    /// Append a member.
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, config: NearestNeighborConfig) -> Self {
        let config = config.with_train_estimate(TrainEstimateMode::Enabled);
        self.members.push(Member {
            name: name.into(),
            classifier: NearestNeighborClassifier::new(config),
        });
        self
    }

    /// Return the member names in vote order.
    #[must_use]
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }
}

impl ConstituentGroup for ElasticNearestNeighborGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn train(&mut self, dataset: &Dataset, cancel: &CancelToken) -> Result<Vec<MemberFit>, EnsembleError> {
        let group = self.name.as_str();
        self.members
            .par_iter_mut()
            .map(|member| {
                cancel.check().map_err(|_| EnsembleError::Cancelled)?;
                let config = member.classifier.config().clone().with_cancel_token(cancel.clone());
                member.classifier = NearestNeighborClassifier::new(config);
                let model = member
                    .classifier
                    .train(dataset)
                    .map_err(|e| EnsembleError::from_group(group, e))?;
                let estimate = model.train_estimate().ok_or_else(|| EnsembleError::ModelNotFitted {
                    group: group.to_owned(),
                })?;
                debug!(
                    group,
                    member = member.name.as_str(),
                    window = model.selected_window().fraction(),
                    accuracy = estimate.accuracy,
                    "member trained"
                );
                Ok(MemberFit::new(member.name.clone(), estimate.accuracy)
                    .with_cv_predictions(estimate.predictions.clone()))
            })
            .collect()
    }

    fn predict_members(&self, query: &[f64]) -> Result<Vec<ClassLabel>, EnsembleError> {
        self.members
            .iter()
            .map(|member| match member.classifier.model() {
                Ok(model) => model.predict(query).map_err(|e| EnsembleError::from_group(&self.name, e)),
                Err(_) => Err(EnsembleError::ModelNotFitted {
                    group: self.name.clone(),
                }),
            })
            .collect()
    }

    fn as_tunable(&self) -> Option<&dyn Tunable> {
        Some(self)
    }
}

impl Tunable for ElasticNearestNeighborGroup {
    fn tuned_parameters(&self) -> Vec<TunedParameter> {
        self.members
            .iter()
            .filter_map(|member| {
                let window = member.classifier.selected_window().ok()?;
                Some(TunedParameter {
                    member: member.name.clone(),
                    parameter: "window",
                    value: window.fraction(),
                })
            })
            .collect()
    }
}
