// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — trains the classifier (also the default)
//   2. `predict` — labels texts with a saved model
//
// The CLI owns the concrete collaborators: it opens the
// tracking session, builds the runner around it, and closes
// the session with the run's outcome.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::application::{
    predict_use_case::PredictUseCase,
    train_use_case::{ExperimentRunner, TrainConfig},
};
use crate::data::loader::LocalDatasetStore;
use crate::infra::{
    plot::PlottersConfusionPlotter,
    tracking::{RunStatus, TaskSpec, TrackingSession},
};

#[derive(Parser, Debug)]
#[command(
    name = "sarcasm-trainer",
    version = "0.1.0",
    about = "Train a TF-IDF + logistic regression sarcasm classifier and track the run."
)]
pub struct Cli {
    /// The subcommand to run; defaults to `train`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Train(args))   => run_train(args),
            Some(Commands::Predict(args)) => run_predict(args),
            None                          => run_train(TrainArgs::default()),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    let spec = TaskSpec {
        output_uri: !args.no_upload,
        ..TaskSpec::default()
    };
    let config: TrainConfig = args.into();

    tracing::info!(
        "Training {} on '{}/{}' (subset_size={})",
        config.model,
        config.dataset.project,
        config.dataset.name,
        config.subset_size
    );

    let mut session = TrackingSession::init(&config.tracking_dir, &spec)
        .context("Failed to open tracking session")?;
    let datasets = LocalDatasetStore::new(&config.dataset_root);
    let plotter  = PlottersConfusionPlotter::new();

    let outcome = ExperimentRunner::new(config, &mut session, &datasets, &plotter)
        .and_then(|mut runner| runner.train());

    match outcome {
        Ok(report) => {
            let run_id = session.run_id().to_string();
            let record = session.close(RunStatus::Completed)?;
            tracing::info!("Run {} completed", run_id);
            println!("Accuracy: {:.4}", report.accuracy);
            println!("Train runtime: {:.2}s", report.train_runtime_secs);
            println!("Model saved to {}", report.artifact_path.display());
            println!("Run recorded in {}", record.display());
            Ok(())
        }
        Err(err) => {
            if let Err(close_err) = session.close(RunStatus::Failed) {
                tracing::warn!("Could not record failed run: {}", close_err);
            }
            Err(err).context("Training run failed")
        }
    }
}

/// Handles the `predict` subcommand.
fn run_predict(args: PredictArgs) -> Result<()> {
    let use_case = PredictUseCase::new(&args.artifact)
        .with_context(|| format!("Failed to load model '{}'", args.artifact.display()))?;
    let labels = use_case.predict(&args.texts)?;

    for (text, label) in args.texts.iter().zip(labels) {
        println!("{label}\t{text}");
    }
    Ok(())
}
