//! 1-nearest-neighbour time series classification.
//!
//! Fits a [`DistanceMetric`](kairos_dtw::DistanceMetric) to a labeled
//! [`Dataset`], either with a fixed window or by leave-one-out search over
//! DTW warping windows, then classifies queries by their nearest training
//! series. Candidate windows and held-out series are evaluated in parallel
//! via rayon.

mod cancel;
mod classifier;
mod config;
mod confusion;
mod dataset;
mod distribution;
mod error;
mod loocv;
mod predict;
mod search;

pub use cancel::CancelToken;
pub use classifier::{NearestNeighborClassifier, NearestNeighborModel};
pub use config::{NearestNeighborConfig, TrainEstimateMode, WindowPolicy};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use dataset::{ClassLabel, Dataset, LabelAlphabet, LabeledSeries};
pub use distribution::ClassDistribution;
pub use error::NnError;
pub use loocv::{TrainEstimate, leave_one_out};
pub use search::{WindowCandidate, WindowSearch};
