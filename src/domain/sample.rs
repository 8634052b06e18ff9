// ============================================================
// Layer 3 — Labelled Text Domain Types
// ============================================================
// The dataset is a flat list of (text, label) rows. Each row
// is one headline or sentence plus whether it is sarcastic.
//
// Labels arrive from CSV files in several spellings:
//   "0" / "1"                    (numeric export)
//   "NORMAL" / "SARCASTIC"       (named export, any case)
// Both are mapped onto the same two-variant enum so the rest
// of the system never deals with raw strings.
//
// The numeric index of a label doubles as the class index the
// classifier predicts, so NORMAL must stay 0 and SARCASTIC 1.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two classes the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Normal,
    Sarcastic,
}

impl Label {
    /// Every label in class-index order
    pub const ALL: [Label; 2] = [Label::Normal, Label::Sarcastic];

    /// Class index used by the classifier (NORMAL = 0, SARCASTIC = 1)
    pub fn index(self) -> usize {
        match self {
            Label::Normal    => 0,
            Label::Sarcastic => 1,
        }
    }

    /// Inverse of `index()`
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name used in plots and reports
    pub fn name(self) -> &'static str {
        match self {
            Label::Normal    => "NORMAL",
            Label::Sarcastic => "SARCASTIC",
        }
    }

    /// Parse a label cell from a CSV file.
    /// Returns None for anything that isn't a known spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw {
            "0" | "0.0" => return Some(Label::Normal),
            "1" | "1.0" => return Some(Label::Sarcastic),
            _ => {}
        }
        if raw.eq_ignore_ascii_case("normal") {
            Some(Label::Normal)
        } else if raw.eq_ignore_ascii_case("sarcastic") {
            Some(Label::Sarcastic)
        } else {
            None
        }
    }

    /// Class names in index order, as handed to the plotter
    pub fn class_names() -> Vec<String> {
        Self::ALL.iter().map(|l| l.name().to_string()).collect()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the dataset: the raw text and its gold label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text:  String,
    pub label: Label,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self { text: text.into(), label }
    }
}
