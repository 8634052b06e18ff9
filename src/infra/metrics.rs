// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Accuracy, the confusion matrix, and the plain-text metrics
// file that CI jobs read.
//
// Metrics file format — a single line, overwritten every run:
//   Accuracy:0.87
//
// The float is printed with Rust's Debug formatting so whole
// numbers keep a decimal point ("1.0", never "1").
//
// Confusion matrix layout:
//   matrix[true_label][predicted_label] = count
//
//                 Pred NORMAL   Pred SARCASTIC
//   NORMAL            TN              FP
//   SARCASTIC         FN              TP
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{fmt, fs, path::Path};

use crate::domain::error::{Result, TrainerError};
use crate::domain::sample::Label;

/// Fraction of positions where prediction equals the gold label.
/// Returns 0.0 for empty input.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> f64 {
    let total = y_true.len().min(y_pred.len());
    if total == 0 {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / total as f64
}

/// Overwrite `path` with the accuracy line.
pub fn write_metrics_file(path: &Path, accuracy: f64) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
    }
    fs::write(path, format!("Accuracy:{accuracy:?}\n")).map_err(|e| TrainerError::io(path, e))?;
    tracing::debug!("Wrote metrics to '{}'", path.display());
    Ok(())
}

/// Two-class confusion matrix indexed by `Label::index()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    matrix: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> Self {
        let mut matrix = [[0usize; 2]; 2];
        for (t, p) in y_true.iter().zip(y_pred) {
            matrix[t.index()][p.index()] += 1;
        }
        Self { matrix }
    }

    /// Count of rows with gold `actual` predicted as `predicted`
    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.matrix[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Largest single cell, used to scale plot colours
    pub fn max_count(&self) -> usize {
        self.matrix.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..2).map(|i| self.matrix[i][i]).sum();
        correct as f64 / total as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>12}", "")?;
        for predicted in Label::ALL {
            write!(f, "{:>12}", format!("pred {}", predicted.name()))?;
        }
        writeln!(f)?;
        for actual in Label::ALL {
            write!(f, "{:>12}", actual.name())?;
            for predicted in Label::ALL {
                write!(f, "{:>12}", self.get(actual, predicted))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
