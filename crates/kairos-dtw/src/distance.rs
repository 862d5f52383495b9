//! Distance newtype returned by every metric.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative distance value.
///
/// An early-abandoned comparison yields [`Distance::ABANDONED`], which is
/// `+inf` and therefore never smaller than the true distance.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    /// Sentinel for a comparison abandoned because it exceeded its cutoff.
    pub const ABANDONED: Self = Self(f64::INFINITY);

    /// Create a distance from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return true if this is the abandoned sentinel.
    #[must_use]
    pub fn is_abandoned(self) -> bool {
        self.0 == f64::INFINITY
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_abandoned() {
            return f.write_str("abandoned");
        }
        write!(f, "{:.6}", self.0)
    }
}
