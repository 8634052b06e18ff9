// ============================================================
// Layer 5 — Vectorizer + Classifier Pipeline
// ============================================================
// A Pipeline is the recipe: vectorizer settings plus the
// estimator to train. Fitting it produces a FittedPipeline,
// which is what gets predicted with and saved to disk.
//
//   Pipeline ──fit(texts, labels)──▶ FittedPipeline ──predict(texts)──▶ labels
//
// Because fit() borrows the recipe and returns a new value,
// a fitted pipeline can never be refitted or mutated.
//
// Unsupported model kinds still produce a Pipeline, with the
// Unsupported estimator variant; fit() on it fails with a
// Configuration error before touching any data. Only a
// FittedPipeline can predict, so an unsupported recipe never
// reaches prediction.

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TrainerError};
use crate::domain::sample::Label;
use crate::ml::trainer::{fit_classifier, ClassifierParams, FittedClassifier};
use crate::ml::vectorizer::{TfidfVectorizer, VectorizerParams};

/// The estimator stage of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimator {
    LogisticRegression(ClassifierParams),
    Unsupported { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub vectorizer: VectorizerParams,
    pub estimator:  Estimator,
}

impl Pipeline {
    pub fn new(vectorizer: VectorizerParams, estimator: Estimator) -> Self {
        Self { vectorizer, estimator }
    }

    /// Fail with a Configuration error if this pipeline has no real estimator.
    pub fn ensure_fittable(&self) -> Result<&ClassifierParams> {
        match &self.estimator {
            Estimator::LogisticRegression(params) => Ok(params),
            Estimator::Unsupported { reason }     => Err(TrainerError::Configuration(reason.clone())),
        }
    }

    /// Fit vectorizer then classifier on the training rows.
    pub fn fit(&self, texts: &[String], labels: &[Label]) -> Result<FittedPipeline> {
        let params = self.ensure_fittable()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.n_jobs.max(1))
            .build()
            .map_err(|e| TrainerError::Training(format!("cannot start worker pool: {e}")))?;

        pool.install(|| -> Result<FittedPipeline> {
            let vectorizer = TfidfVectorizer::fit(&self.vectorizer, texts)?;
            let features   = vectorizer.transform(texts);
            tracing::info!(
                "Fitting classifier on {} x {} features with {} worker(s)",
                features.rows,
                features.cols,
                params.n_jobs,
            );
            let classifier = fit_classifier(params, &features, labels)?;
            tracing::info!("Classifier fitted in {} iterations", classifier.n_iter);

            Ok(FittedPipeline {
                vectorizer,
                classifier_params: params.clone(),
                classifier,
            })
        })
    }
}

/// A trained vectorizer + classifier pair. This is the model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub vectorizer:        TfidfVectorizer,
    pub classifier_params: ClassifierParams,
    pub classifier:        FittedClassifier,
}

impl FittedPipeline {
    pub fn predict(&self, texts: &[String]) -> Result<Vec<Label>> {
        let features = self.vectorizer.transform(texts);
        self.classifier.predict(&features)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<Label>) {
        let rows = [
            ("oh great another monday meeting", Label::Sarcastic),
            ("city council approves new park budget", Label::Normal),
            ("wow great job breaking the build again", Label::Sarcastic),
            ("council publishes annual budget report", Label::Normal),
            ("great just great another flat tire", Label::Sarcastic),
            ("new park opens near city hall", Label::Normal),
        ];
        rows.iter().map(|(t, l)| (t.to_string(), *l)).unzip()
    }

    fn supported() -> Pipeline {
        Pipeline::new(
            VectorizerParams::default(),
            Estimator::LogisticRegression(ClassifierParams { verbose: 0, ..Default::default() }),
        )
    }

    #[test]
    fn test_fit_then_predict_training_rows() {
        let (texts, labels) = corpus();
        let fitted = supported().fit(&texts, &labels).unwrap();
        assert_eq!(fitted.predict(&texts).unwrap(), labels);
    }

    #[test]
    fn test_unsupported_fit_is_configuration_error() {
        let (texts, labels) = corpus();
        let pipeline = Pipeline::new(
            VectorizerParams::default(),
            Estimator::Unsupported { reason: "unknown model 'svm'".to_string() },
        );
        let err = pipeline.fit(&texts, &labels).unwrap_err();
        assert!(matches!(err, TrainerError::Configuration(_)));
    }

    #[test]
    fn test_unsupported_ensure_fittable_is_configuration_error() {
        let pipeline = Pipeline::new(
            VectorizerParams::default(),
            Estimator::Unsupported { reason: "no model".to_string() },
        );
        let err = pipeline.ensure_fittable().unwrap_err();
        assert!(matches!(err, TrainerError::Configuration(_)));
    }

    #[test]
    fn test_large_corpus_fit_and_predict() {
        // ~20 000 distinct terms; stored densely this would be gigabytes
        let (texts, labels): (Vec<String>, Vec<Label>) = (0..20_000usize)
            .map(|i| {
                let (lead, label) = if i % 2 == 0 {
                    ("oh great", Label::Sarcastic)
                } else {
                    ("council says", Label::Normal)
                };
                (format!("{lead} w{} x{}", i / 2, (i * 7) % 10007), label)
            })
            .unzip();

        let pipeline = Pipeline::new(
            VectorizerParams::default(),
            Estimator::LogisticRegression(ClassifierParams {
                verbose:  0,
                max_iter: 20,
                ..Default::default()
            }),
        );
        let fitted = pipeline.fit(&texts, &labels).unwrap();
        assert!(fitted.vectorizer.vocabulary_size() > 15_000);
        assert_eq!(fitted.predict(&texts).unwrap(), labels);
    }

    #[test]
    fn test_fitted_pipeline_serde_preserves_predictions() {
        let (texts, labels) = corpus();
        let fitted = supported().fit(&texts, &labels).unwrap();
        let json   = serde_json::to_string(&fitted).unwrap();
        let back: FittedPipeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back.predict(&texts).unwrap(), fitted.predict(&texts).unwrap());
    }
}
