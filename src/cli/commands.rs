// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their configurable flags. Running the binary with no
// subcommand is the same as `train` with every default.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, PathBuf, ModelKind, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::{model_kind::ModelKind, traits::DatasetRef};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sarcasm classifier and record the run
    Train(TrainArgs),

    /// Label texts with a saved model artifact
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Classifier family; anything but LogisticRegression fails at train time
    #[arg(long, default_value = "LogisticRegression")]
    pub model: ModelKind,

    /// Recorded with the run for reproducibility
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Use only the first N rows of the dataset (0 = all rows)
    #[arg(long, default_value_t = 1000)]
    pub subset_size: usize,

    /// Root directory of the local dataset store
    #[arg(long, default_value = "datasets")]
    pub dataset_root: PathBuf,

    #[arg(long, default_value = "sarcasm_detector")]
    pub dataset_project: String,

    #[arg(long, default_value = "sarcasm_dataset")]
    pub dataset_name: String,

    #[arg(long, default_value = "sarcasm_dataset")]
    pub dataset_alias: String,

    /// Where tracking run records are written
    #[arg(long, default_value = "runs")]
    pub tracking_dir: PathBuf,

    #[arg(long, default_value = "./sklearn_metrics.txt")]
    pub metrics_file: PathBuf,

    #[arg(long, default_value = "./sklearn_confusion_matrix.png")]
    pub confusion_matrix_file: PathBuf,

    /// Directory that receives sklearn_classifier_<uuid>.json.gz
    #[arg(long, default_value = "my_awesome_model")]
    pub artifact_dir: PathBuf,

    /// Keep registered artifacts only as paths, without copying them into the run
    #[arg(long)]
    pub no_upload: bool,
}

impl Default for TrainArgs {
    fn default() -> Self {
        let cfg = TrainConfig::default();
        Self {
            model:                 cfg.model,
            seed:                  cfg.seed,
            subset_size:           cfg.subset_size,
            dataset_root:          cfg.dataset_root,
            dataset_project:       cfg.dataset.project,
            dataset_name:          cfg.dataset.name,
            dataset_alias:         cfg.dataset.alias,
            tracking_dir:          cfg.tracking_dir,
            metrics_file:          cfg.metrics_file,
            confusion_matrix_file: cfg.confusion_matrix_file,
            artifact_dir:          cfg.artifact_dir,
            no_upload:             false,
        }
    }
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            model:       a.model,
            seed:        a.seed,
            subset_size: a.subset_size,
            dataset: DatasetRef {
                project: a.dataset_project,
                name:    a.dataset_name,
                alias:   a.dataset_alias,
            },
            dataset_root:          a.dataset_root,
            tracking_dir:          a.tracking_dir,
            metrics_file:          a.metrics_file,
            confusion_matrix_file: a.confusion_matrix_file,
            artifact_dir:          a.artifact_dir,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path to a sklearn_classifier_<uuid>.json.gz artifact
    #[arg(long)]
    pub artifact: PathBuf,

    /// Text to classify; repeat for several
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,
}
