// ============================================================
// Layer 3 — Model Kind
// ============================================================
// Which classifier family a run should train.
//
// Only the softmax linear classifier is supported today.
// Anything else parses into `Unsupported` rather than failing
// at parse time, so the run can still be constructed and its
// parameters recorded;
// the pipeline then refuses to fit with a Configuration error.
//
// "LinearRegression" trains the same softmax classifier as
// "LogisticRegression" but keeps its own variant, so the
// recorded `model` parameter and the plot title show the name
// the caller asked for.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{convert::Infallible, fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    LogisticRegression,
    LinearRegression,
    Unsupported(String),
}

impl ModelKind {
    pub fn is_supported(&self) -> bool {
        matches!(self, ModelKind::LogisticRegression | ModelKind::LinearRegression)
    }
}

impl FromStr for ModelKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Ok(match normalised.as_str() {
            "logisticregression" | "logreg" => ModelKind::LogisticRegression,
            "linearregression"              => ModelKind::LinearRegression,
            _ => ModelKind::Unsupported(s.trim().to_string()),
        })
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::LogisticRegression => f.write_str("LogisticRegression"),
            ModelKind::LinearRegression   => f.write_str("LinearRegression"),
            ModelKind::Unsupported(name)  => f.write_str(name),
        }
    }
}

impl Serialize for ModelKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|never: Infallible| match never {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_are_supported() {
        for name in ["LogisticRegression", "LinearRegression", "logistic_regression", "logreg"] {
            let kind: ModelKind = name.parse().unwrap();
            assert!(kind.is_supported(), "{name} should be supported");
        }
    }

    #[test]
    fn test_linear_regression_keeps_its_name() {
        for name in ["LinearRegression", "linear_regression", "linear-regression"] {
            let kind: ModelKind = name.parse().unwrap();
            assert_eq!(kind, ModelKind::LinearRegression);
            assert_eq!(kind.to_string(), "LinearRegression");
        }
        let json = serde_json::to_string(&ModelKind::LinearRegression).unwrap();
        assert_eq!(json, "\"LinearRegression\"");
    }

    #[test]
    fn test_unknown_name_keeps_original_spelling() {
        let kind: ModelKind = " XGBoost ".parse().unwrap();
        assert_eq!(kind, ModelKind::Unsupported("XGBoost".to_string()));
        assert_eq!(kind.to_string(), "XGBoost");
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&ModelKind::LogisticRegression).unwrap();
        assert_eq!(json, "\"LogisticRegression\"");
        let back: ModelKind = serde_json::from_str("\"svm\"").unwrap();
        assert!(!back.is_supported());
    }
}
