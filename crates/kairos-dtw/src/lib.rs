//! Distance measures for equal-length time series.
//!
//! Pure math library, zero I/O. Provides plain Euclidean distance and
//! Dynamic Time Warping constrained by a Sakoe-Chiba warping window expressed
//! as a fraction of the series length. Both support exact early abandoning
//! against a best-so-far bound, and windowed DTW can additionally be pruned with
//! the LB_Keogh envelope lower bound.

mod constraint;
mod distance;
mod dtw;
mod envelope;
mod error;
mod euclidean;
mod metric;
mod series;
mod window;

pub use constraint::BandConstraint;
pub use distance::Distance;
pub use dtw::Dtw;
pub use envelope::{SeriesEnvelope, lb_keogh};
pub use error::DtwError;
pub use euclidean::euclidean_with_cutoff;
pub use metric::DistanceMetric;
pub use series::{TimeSeries, TimeSeriesView};
pub use window::WarpingWindow;
