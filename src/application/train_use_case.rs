// ============================================================
// Layer 2 — Experiment Runner (training use case)
// ============================================================
// Orchestrates one training run in order:
//
//   new()              register model / seed / subset_size
//                      and build the pipeline recipe
//   train():
//     Step 1: Get data            (Layer 4 - data)
//     Step 2: Fit pipeline, timed (Layer 5 - ml)
//     Step 3: Predict + accuracy  (Layer 5 / Layer 6)
//     Step 4: Metrics text file   (Layer 6 - infra)
//     Step 5: Confusion plot      (Layer 3 trait)
//     Step 6: Save artifact       (Layer 6 - infra)
//
// The runner borrows its collaborators. The tracking session is
// opened and closed by the caller; the runner only reports into it.
//
// Reference: Rust Book §10 (Traits as Parameters)
//            Rust Book §13 (Iterators and Closures)

use std::{path::PathBuf, time::Instant};

use serde::{Deserialize, Serialize};

use crate::data::{loader::load_dataset, splitter::split_train_test};
use crate::domain::{
    error::{Result, TrainerError},
    model_kind::ModelKind,
    sample::Label,
    traits::{ConfusionPlot, ConfusionPlotter, DatasetRef, DatasetStore, ExperimentTracker},
};
use crate::infra::{
    artifacts::ArtifactStore,
    metrics::{accuracy, write_metrics_file},
};
use crate::ml::{
    pipeline::{Estimator, Pipeline},
    trainer::ClassifierParams,
    vectorizer::VectorizerParams,
};

/// Figure size of the confusion matrix, in inches
const CONFUSION_FIGSIZE: (u32, u32) = (8, 8);

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs. Defaults reproduce the fixed contract
// of a bare invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub model:                 ModelKind,
    pub seed:                  u64,
    /// 0 = use every row
    pub subset_size:           usize,
    pub dataset:               DatasetRef,
    pub dataset_root:          PathBuf,
    pub tracking_dir:          PathBuf,
    pub metrics_file:          PathBuf,
    pub confusion_matrix_file: PathBuf,
    pub artifact_dir:          PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            model:                 ModelKind::LogisticRegression,
            seed:                  42,
            subset_size:           1000,
            dataset:               DatasetRef::default(),
            dataset_root:          PathBuf::from("datasets"),
            tracking_dir:          PathBuf::from("runs"),
            metrics_file:          PathBuf::from("./sklearn_metrics.txt"),
            confusion_matrix_file: PathBuf::from("./sklearn_confusion_matrix.png"),
            artifact_dir:          PathBuf::from("my_awesome_model"),
        }
    }
}

/// Train/test partition of one run, texts and labels side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSplit {
    pub train_texts:  Vec<String>,
    pub train_labels: Vec<Label>,
    pub test_texts:   Vec<String>,
    pub test_labels:  Vec<Label>,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub train_size:         usize,
    pub test_size:          usize,
    pub train_runtime_secs: f64,
    pub accuracy:           f64,
    pub artifact_path:      PathBuf,
}

// ─── ExperimentRunner ─────────────────────────────────────────────────────────
pub struct ExperimentRunner<'a> {
    config:   TrainConfig,
    tracker:  &'a mut dyn ExperimentTracker,
    datasets: &'a dyn DatasetStore,
    plotter:  &'a dyn ConfusionPlotter,
    pipeline: Pipeline,
}

impl<'a> ExperimentRunner<'a> {
    /// Record the run parameters and build the pipeline recipe.
    pub fn new(
        config:   TrainConfig,
        tracker:  &'a mut dyn ExperimentTracker,
        datasets: &'a dyn DatasetStore,
        plotter:  &'a dyn ConfusionPlotter,
    ) -> Result<Self> {
        tracker.set_parameter("model", serde_json::Value::String(config.model.to_string()))?;
        tracker.set_parameter("seed", config.seed.into())?;
        tracker.set_parameter("subset_size", config.subset_size.into())?;

        let pipeline = create_pipeline(&config.model, &mut *tracker)?;

        Ok(Self { config, tracker, datasets, plotter, pipeline })
    }

    /// Fetch the dataset, truncate it and cut it into train/test.
    pub fn get_data(&self) -> Result<DataSplit> {
        let dir  = self.datasets.get_local_copy(&self.config.dataset)?;
        let rows = load_dataset(&dir)?;
        tracing::info!("Loaded {} rows from '{}'", rows.len(), dir.display());

        let (train, test) = split_train_test(rows, self.config.subset_size);
        if train.is_empty() || test.is_empty() {
            return Err(TrainerError::DataUnavailable(format!(
                "split left {} training and {} test rows; need at least one of each",
                train.len(),
                test.len()
            )));
        }

        let (train_texts, train_labels) = train.into_iter().map(|r| (r.text, r.label)).unzip();
        let (test_texts, test_labels)   = test.into_iter().map(|r| (r.text, r.label)).unzip();

        Ok(DataSplit { train_texts, train_labels, test_texts, test_labels })
    }

    /// Run the whole workflow once.
    pub fn train(&mut self) -> Result<TrainingReport> {
        // An unsupported estimator fails here, before any file I/O
        self.pipeline.ensure_fittable()?;
        let cfg = &self.config;

        // ── Step 1: Data ──────────────────────────────────────────────────────
        let data = self.get_data()?;
        tracing::info!(
            "Split: {} train, {} test",
            data.train_texts.len(),
            data.test_texts.len()
        );

        // ── Step 2: Fit (timed) ───────────────────────────────────────────────
        let started = Instant::now();
        let fitted  = self.pipeline.fit(&data.train_texts, &data.train_labels)?;
        let runtime = started.elapsed().as_secs_f64();
        self.tracker.report_single_value("train_runtime", runtime)?;

        // ── Step 3: Evaluate ──────────────────────────────────────────────────
        let y_pred = fitted.predict(&data.test_texts)?;
        let acc    = accuracy(&data.test_labels, &y_pred);
        self.tracker.report_single_value("Accuracy", acc)?;
        self.tracker.report_scalar("Performance", "Accuracy", acc, 0)?;

        // ── Step 4: Metrics file ──────────────────────────────────────────────
        write_metrics_file(&cfg.metrics_file, acc)?;

        // ── Step 5: Confusion matrix ──────────────────────────────────────────
        self.plotter.plot_confusion_matrix(&ConfusionPlot {
            y_true:      &data.test_labels,
            y_pred:      &y_pred,
            class_names: Label::class_names(),
            figsize:     CONFUSION_FIGSIZE,
            title:       format!("{} Confusion Matrix", cfg.model),
            output_path: &cfg.confusion_matrix_file,
        })?;

        // ── Step 6: Persist ───────────────────────────────────────────────────
        let artifact_path = ArtifactStore::new(&cfg.artifact_dir).save(&fitted)?;

        self.tracker.register_artifact("metrics", &cfg.metrics_file)?;
        self.tracker.register_artifact("confusion_matrix", &cfg.confusion_matrix_file)?;
        self.tracker.register_artifact("model", &artifact_path)?;

        tracing::info!("Accuracy: {:.4} (runtime {:.2}s)", acc, runtime);

        Ok(TrainingReport {
            train_size:         data.train_texts.len(),
            test_size:          data.test_texts.len(),
            train_runtime_secs: runtime,
            accuracy:           acc,
            artifact_path,
        })
    }
}

/// Build the vectorizer + estimator recipe for `model`. For a
/// supported kind the classifier bundle is registered first.
pub fn create_pipeline(model: &ModelKind, tracker: &mut dyn ExperimentTracker) -> Result<Pipeline> {
    let estimator = match model {
        ModelKind::LogisticRegression | ModelKind::LinearRegression => {
            let params = ClassifierParams::default();
            tracker.connect("General", serde_json::to_value(&params)?)?;
            Estimator::LogisticRegression(params)
        }
        ModelKind::Unsupported(name) => {
            tracing::warn!("Model '{}' is not supported; training will fail", name);
            Estimator::Unsupported { reason: format!("unsupported model kind '{name}'") }
        }
    };
    Ok(Pipeline::new(VectorizerParams::default(), estimator))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::LocalDatasetStore;
    use crate::infra::tracking::InMemoryTracker;
    use serde_json::json;
    use std::{cell::RefCell, fs, path::Path};
    use tempfile::TempDir;

    /// Remembers each request and writes the labels it was given
    /// in place of an image.
    #[derive(Default)]
    struct RecordingPlotter {
        calls: RefCell<Vec<(String, (u32, u32), usize)>>,
    }

    impl ConfusionPlotter for RecordingPlotter {
        fn plot_confusion_matrix(&self, plot: &ConfusionPlot<'_>) -> Result<()> {
            fs::write(plot.output_path, format!("{:?} {:?}", plot.y_true, plot.y_pred)).unwrap();
            self.calls
                .borrow_mut()
                .push((plot.title.clone(), plot.figsize, plot.y_true.len()));
            Ok(())
        }
    }

    /// Ten rows, alternating labels, with the tenth row sharing its
    /// distinctive words with the sarcastic training rows.
    const TEN_ROWS: &str = "headline,is_sarcastic\n\
        oh great another monday,1\n\
        council approves park budget,0\n\
        oh great the wifi died,1\n\
        council report on park budget,0\n\
        oh great more rain,1\n\
        council votes on school budget,0\n\
        oh great a flat tire,1\n\
        council park plan released,0\n\
        oh great traffic again,1\n\
        oh great another meeting,1\n";

    fn write_dataset(root: &Path, files: &[(&str, &str)]) {
        let dir = root.join("sarcasm_detector").join("sarcasm_dataset");
        fs::create_dir_all(&dir).unwrap();
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
    }

    fn config_in(root: &Path, model: ModelKind, subset_size: usize) -> TrainConfig {
        TrainConfig {
            model,
            subset_size,
            dataset_root:          root.join("datasets"),
            tracking_dir:          root.join("runs"),
            metrics_file:          root.join("sklearn_metrics.txt"),
            confusion_matrix_file: root.join("sklearn_confusion_matrix.png"),
            artifact_dir:          root.join("my_awesome_model"),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_new_registers_parameters() {
        let tmp      = TempDir::new().unwrap();
        let config   = config_in(tmp.path(), ModelKind::LogisticRegression, 10);
        let store    = LocalDatasetStore::new(&config.dataset_root);
        let plotter  = RecordingPlotter::default();
        let mut trk  = InMemoryTracker::default();

        ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();

        assert_eq!(trk.params["model"], json!("LogisticRegression"));
        assert_eq!(trk.params["seed"], json!(42));
        assert_eq!(trk.params["subset_size"], json!(10));
        let general = &trk.params["General"];
        assert_eq!(general["C"], json!(1.0));
        assert_eq!(general["n_jobs"], json!(4));
        assert_eq!(general["random_state"], json!(17));
        assert_eq!(general["verbose"], json!(1));
    }

    #[test]
    fn test_get_data_prefix_split() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path(), ModelKind::LogisticRegression, 10);
        write_dataset(&config.dataset_root, &[("part.csv", TEN_ROWS)]);
        let store   = LocalDatasetStore::new(&config.dataset_root);
        let plotter = RecordingPlotter::default();
        let mut trk = InMemoryTracker::default();

        let runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
        let split  = runner.get_data().unwrap();

        assert_eq!(split.train_texts.len(), 9);
        assert_eq!(split.test_texts, vec!["oh great another meeting".to_string()]);
        assert_eq!(split.train_texts[0], "oh great another monday");
        assert_eq!(split.test_labels, vec![Label::Sarcastic]);
    }

    #[test]
    fn test_get_data_concatenates_files_in_name_order() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path(), ModelKind::LogisticRegression, 0);
        write_dataset(
            &config.dataset_root,
            &[
                ("b.csv", "h,l\nsecond one,0\nsecond two,1\n"),
                ("a.csv", "h,l\nfirst one,1\nfirst two,0\n"),
            ],
        );
        let store   = LocalDatasetStore::new(&config.dataset_root);
        let plotter = RecordingPlotter::default();
        let mut trk = InMemoryTracker::default();

        let runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
        let split  = runner.get_data().unwrap();

        // 4 rows → 3 train, 1 test
        assert_eq!(split.train_texts, vec!["first one", "first two", "second one"]);
        assert_eq!(split.test_texts, vec!["second two"]);
    }

    #[test]
    fn test_missing_dataset_is_unavailable() {
        let tmp     = TempDir::new().unwrap();
        let config  = config_in(tmp.path(), ModelKind::LogisticRegression, 10);
        let store   = LocalDatasetStore::new(&config.dataset_root);
        let plotter = RecordingPlotter::default();
        let mut trk = InMemoryTracker::default();

        let runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
        assert!(matches!(runner.get_data(), Err(TrainerError::DataUnavailable(_))));
    }

    #[test]
    fn test_train_ten_rows_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path(), ModelKind::LogisticRegression, 10);
        write_dataset(&config.dataset_root, &[("part.csv", TEN_ROWS)]);
        let metrics_file = config.metrics_file.clone();
        let png_file     = config.confusion_matrix_file.clone();
        let store        = LocalDatasetStore::new(&config.dataset_root);
        let plotter      = RecordingPlotter::default();
        let mut trk      = InMemoryTracker::default();

        let report = {
            let mut runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
            runner.train().unwrap()
        };

        assert_eq!(report.train_size, 9);
        assert_eq!(report.test_size, 1);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(fs::read_to_string(&metrics_file).unwrap(), "Accuracy:1.0\n");
        assert!(png_file.exists());

        assert_eq!(trk.single_values["Accuracy"], 1.0);
        assert!(trk.single_values["train_runtime"] >= 0.0);
        assert_eq!(
            trk.scalars,
            vec![("Performance".to_string(), "Accuracy".to_string(), 1.0, 0)]
        );
        let names: Vec<_> = trk.artifacts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["metrics", "confusion_matrix", "model"]);

        let calls = plotter.calls.borrow();
        assert_eq!(
            calls.as_slice(),
            &[("LogisticRegression Confusion Matrix".to_string(), (8, 8), 1)]
        );

        let loaded = ArtifactStore::load(&report.artifact_path).unwrap();
        assert_eq!(
            loaded.predict(&["oh great another meeting".to_string()]).unwrap(),
            vec![Label::Sarcastic]
        );
    }

    #[test]
    fn test_two_runs_write_distinct_artifacts_and_overwrite_outputs() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path(), ModelKind::LogisticRegression, 10);
        write_dataset(&config.dataset_root, &[("part.csv", TEN_ROWS)]);
        let dataset_root = config.dataset_root.clone();
        let artifact_dir = config.artifact_dir.clone();
        let metrics_file = config.metrics_file.clone();
        let png_file     = config.confusion_matrix_file.clone();
        let store        = LocalDatasetStore::new(&config.dataset_root);
        let plotter      = RecordingPlotter::default();
        let mut trk      = InMemoryTracker::default();

        let mut runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
        let first = runner.train().unwrap();
        assert_eq!(fs::read_to_string(&metrics_file).unwrap(), "Accuracy:1.0\n");
        assert_eq!(fs::read_to_string(&png_file).unwrap(), "[Sarcastic] [Sarcastic]");

        // Same training rows, but the held-out row is now labelled normal
        let relabelled = TEN_ROWS.replace("oh great another meeting,1", "oh great another meeting,0");
        write_dataset(&dataset_root, &[("part.csv", relabelled.as_str())]);
        let second = runner.train().unwrap();
        drop(runner);

        assert_eq!(first.accuracy, 1.0);
        assert_eq!(second.accuracy, 0.0);
        assert_eq!(fs::read_to_string(&metrics_file).unwrap(), "Accuracy:0.0\n");
        assert_eq!(fs::read_to_string(&png_file).unwrap(), "[Normal] [Sarcastic]");

        assert_ne!(first.artifact_path, second.artifact_path);
        assert_eq!(fs::read_dir(&artifact_dir).unwrap().count(), 2);
        assert_eq!(plotter.calls.borrow().len(), 2);
        assert_eq!(trk.single_values["Accuracy"], 0.0);
    }

    #[test]
    fn test_linear_regression_name_is_recorded_as_given() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path(), ModelKind::LinearRegression, 10);
        write_dataset(&config.dataset_root, &[("part.csv", TEN_ROWS)]);
        let store   = LocalDatasetStore::new(&config.dataset_root);
        let plotter = RecordingPlotter::default();
        let mut trk = InMemoryTracker::default();

        let report = {
            let mut runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
            runner.train().unwrap()
        };

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(trk.params["model"], json!("LinearRegression"));
        assert_eq!(trk.params["General"]["C"], json!(1.0));
        assert_eq!(
            plotter.calls.borrow()[0].0,
            "LinearRegression Confusion Matrix".to_string()
        );
    }

    #[test]
    fn test_unsupported_model_fails_before_io() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path(), ModelKind::Unsupported("svm".to_string()), 10);
        write_dataset(&config.dataset_root, &[("part.csv", TEN_ROWS)]);
        let metrics_file = config.metrics_file.clone();
        let png_file     = config.confusion_matrix_file.clone();
        let artifact_dir = config.artifact_dir.clone();
        let store        = LocalDatasetStore::new(&config.dataset_root);
        let plotter      = RecordingPlotter::default();
        let mut trk      = InMemoryTracker::default();

        let mut runner = ExperimentRunner::new(config, &mut trk, &store, &plotter).unwrap();
        let err = runner.train().unwrap_err();
        drop(runner);

        assert!(matches!(err, TrainerError::Configuration(_)));
        assert!(!metrics_file.exists());
        assert!(!png_file.exists());
        assert!(!artifact_dir.exists());
        assert!(plotter.calls.borrow().is_empty());
        assert_eq!(trk.params["model"], json!("svm"));
        assert!(!trk.params.contains_key("General"));
    }
}
