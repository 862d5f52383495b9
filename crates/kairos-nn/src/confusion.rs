//! Confusion matrix over leave-one-out predictions.

use std::fmt;

use crate::dataset::ClassLabel;

/// Counts of (true class, predicted class) pairs.
///
/// Entry `rows[t][p]` counts training series of class `t` whose nearest
/// other series had class `p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    rows: Vec<Vec<usize>>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    /// The class.
    pub class: ClassLabel,
    /// TP / (TP + FP); 0.0 if the class was never predicted.
    pub precision: f64,
    /// TP / (TP + FN); 0.0 if the class has no true series.
    pub recall: f64,
    /// Harmonic mean of precision and recall; 0.0 if both are zero.
    pub f1: f64,
    /// Number of true series in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Tally paired true and predicted labels over `n_classes` classes.
    ///
    /// Labels with an index of `n_classes` or more are ignored.
    #[must_use]
    pub fn from_labels(true_labels: &[ClassLabel], predicted: &[ClassLabel], n_classes: usize) -> Self {
        let mut rows = vec![vec![0usize; n_classes]; n_classes];
        for (t, p) in true_labels.iter().zip(predicted) {
            if let Some(cell) = rows.get_mut(t.index()).and_then(|row| row.get_mut(p.index())) {
                *cell += 1;
            }
        }
        Self { rows }
    }

    /// Number of correct predictions (the trace).
    #[must_use]
    pub fn n_correct(&self) -> usize {
        self.rows.iter().enumerate().map(|(i, row)| row[i]).sum()
    }

    /// Total number of tallied predictions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().flatten().sum()
    }

    /// Overall accuracy; 0.0 when nothing was tallied.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.n_correct() as f64 / total as f64,
        }
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.rows.len();
        (0..n)
            .map(|c| {
                let tp = self.rows[c][c];
                let predicted: usize = self.rows.iter().map(|row| row[c]).sum();
                let support: usize = self.rows[c].iter().sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: ClassLabel::new(c),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the matrix rows, indexed by true class.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.rows.len()
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "")?;
        for j in 0..self.rows.len() {
            write!(f, " pred_{j:>3}")?;
        }
        writeln!(f)?;

        for (i, row) in self.rows.iter().enumerate() {
            write!(f, "true_{i:>3}")?;
            for val in row {
                write!(f, " {val:>7}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
