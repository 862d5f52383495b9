//! Optional capabilities a constituent group may expose.

use std::fmt;

/// A hyperparameter value chosen during training.
#[derive(Debug, Clone, PartialEq)]
pub struct TunedParameter {
    /// Member the value belongs to.
    pub member: String,
    /// Parameter name.
    pub parameter: &'static str,
    /// Selected value.
    pub value: f64,
}

impl fmt::Display for TunedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.member, self.parameter, self.value)
    }
}

/// A group that selects hyperparameters from its training data.
pub trait Tunable {
    /// Values selected by the most recent training run; empty before training.
    fn tuned_parameters(&self) -> Vec<TunedParameter>;
}
