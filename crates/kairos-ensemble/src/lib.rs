//! Accuracy-weighted ensembles of time series classifiers.
//!
//! Each [`ConstituentGroup`] trains independently, on its own rayon worker,
//! and reports a training-only accuracy for every member. At prediction time
//! every member votes for one class with that accuracy as its weight; class
//! probabilities are the summed weights divided by the total member weight
//! fixed at the end of training, and ties for the top class are broken with
//! a caller-supplied random source.

mod capability;
mod combiner;
mod elastic;
mod ensemble;
mod error;
mod group;
mod state;
mod vote;

pub use capability::{Tunable, TunedParameter};
pub use combiner::{EnsembleCombiner, EnsemblePrediction};
pub use elastic::ElasticNearestNeighborGroup;
pub use ensemble::{Ensemble, FittedEnsemble};
pub use error::EnsembleError;
pub use group::{ConstituentGroup, MemberFit};
pub use state::{EnsembleState, GroupRecord, MemberRecord};
pub use vote::{MemberVote, TIE_TOLERANCE, Tally, break_tie};
