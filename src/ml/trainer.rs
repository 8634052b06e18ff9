// ============================================================
// Layer 5 — Classifier Fit Loop
// ============================================================
// Full-batch optimisation of the logistic regression model.
//
// Objective (C = inverse regularisation strength):
//   loss = mean CE(logits, y) + ||W||² / (2 · n · C)
// which is the usual C-weighted L2 objective divided by n·C.
//
// Every iteration sees the whole training matrix, so there is
// no batching, no shuffling and no data loader: the run is a
// pure function of (features, labels, params).
//
// Training uses Autodiff<NdArray> for gradients over the sparse
// feature cells. Prediction scores sparse rows directly against
// the extracted weights, without burn.
//
// Reference: Burn Book §5 (Training)
//            Kingma & Ba (2015) Adam

use burn::{
    backend::{Autodiff, NdArray},
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::{backend::AutodiffBackend, TensorData},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TrainerError};
use crate::domain::sample::Label;
use crate::ml::model::{LogisticRegressionConfig, LogisticRegressionModel, SparseBatch};
use crate::ml::vectorizer::FeatureMatrix;

type TrainBackend = Autodiff<NdArray>;

/// Optimiser used for the full-batch fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    Adam,
    Sgd,
}

/// Estimator hyperparameters. Registered with the tracker as one
/// bundle before the estimator is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Inverse regularisation strength
    #[serde(rename = "C")]
    pub c:             f64,
    /// Worker threads for vectorization and fitting
    pub n_jobs:        usize,
    pub solver:        Solver,
    /// Seed for the tensor backend, fixed per estimator family
    pub random_state:  u64,
    /// 0 = silent, 1 = progress every 10 iterations, 2+ = every iteration
    pub verbose:       u8,
    pub max_iter:      usize,
    pub learning_rate: f64,
    /// Stop once the loss changes by less than this between iterations
    pub tol:           f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            c:             1.0,
            n_jobs:        4,
            solver:        Solver::Adam,
            random_state:  17,
            verbose:       1,
            max_iter:      100,
            learning_rate: 0.1,
            tol:           1e-4,
        }
    }
}

/// Learned weights of a fitted classifier, detached from burn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedClassifier {
    pub n_features: usize,
    pub n_classes:  usize,
    /// Row-major [n_features, n_classes]
    pub weights:    Vec<f32>,
    /// [n_classes]
    pub bias:       Vec<f32>,
    /// Iterations actually run
    pub n_iter:     usize,
}

/// Fit a logistic regression on a sparse feature matrix.
pub fn fit_classifier(
    params:   &ClassifierParams,
    features: &FeatureMatrix,
    labels:   &[Label],
) -> Result<FittedClassifier> {
    if features.rows != labels.len() {
        return Err(TrainerError::Training(format!(
            "{} feature rows but {} labels",
            features.rows,
            labels.len()
        )));
    }
    if params.c <= 0.0 {
        return Err(TrainerError::Training(format!("C must be positive, got {}", params.c)));
    }
    let distinct = Label::ALL.iter().filter(|l| labels.contains(l)).count();
    if distinct < 2 {
        return Err(TrainerError::Training(
            "training labels contain a single class; need both NORMAL and SARCASTIC".to_string(),
        ));
    }

    TrainBackend::seed(params.random_state);
    let device = Default::default();

    let batch = SparseBatch::<TrainBackend>::from_matrix(features, &device).ok_or_else(|| {
        TrainerError::Training("every training row is empty after vectorization".to_string())
    })?;

    let config = LogisticRegressionConfig::new(features.cols, Label::ALL.len());
    let model: LogisticRegressionModel<TrainBackend> = config.init(&device);

    let (model, n_iter) = match params.solver {
        Solver::Adam => run_optimizer(model, AdamConfig::new().init(), params, &batch, labels, &device),
        Solver::Sgd  => run_optimizer(model, SgdConfig::new().init(), params, &batch, labels, &device),
    };

    let weights = model.weights().map_err(TrainerError::Training)?;
    let bias    = model.bias().map_err(TrainerError::Training)?;

    Ok(FittedClassifier {
        n_features: features.cols,
        n_classes:  Label::ALL.len(),
        weights,
        bias,
        n_iter,
    })
}

fn run_optimizer<B, O>(
    mut model: LogisticRegressionModel<B>,
    mut optim: O,
    params:    &ClassifierParams,
    batch:     &SparseBatch<B>,
    labels:    &[Label],
    device:    &B::Device,
) -> (LogisticRegressionModel<B>, usize)
where
    B: AutodiffBackend,
    O: Optimizer<LogisticRegressionModel<B>, B>,
    LogisticRegressionModel<B>: AutodiffModule<B>,
{
    let n = batch.rows;
    let targets: Vec<i64> = labels.iter().map(|l| l.index() as i64).collect();
    let y = Tensor::<B, 1, Int>::from_data(TensorData::new(targets, [n]), device);

    let ce    = CrossEntropyLossConfig::new().init(device);
    let alpha = 1.0 / (2.0 * n as f64 * params.c);

    let mut previous = f64::INFINITY;
    let mut n_iter   = 0;

    for iteration in 1..=params.max_iter {
        n_iter = iteration;

        let logits = model.forward_sparse(batch);
        let loss   = ce.forward(logits, y.clone()) + model.l2_penalty().mul_scalar(alpha);
        let loss_value: f64 = loss.clone().into_scalar().elem::<f64>();

        // Backward pass + optimiser update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(params.learning_rate, model, grads);

        let report = match params.verbose {
            0 => false,
            1 => iteration == 1 || iteration % 10 == 0,
            _ => true,
        };
        if report {
            tracing::info!("iter {:>4}/{} | loss={:.6}", iteration, params.max_iter, loss_value);
        }

        if (previous - loss_value).abs() < params.tol {
            tracing::info!("Converged after {} iterations (loss={:.6})", iteration, loss_value);
            break;
        }
        previous = loss_value;
    }

    if n_iter == params.max_iter {
        tracing::debug!("Reached max_iter={} without meeting tol={}", params.max_iter, params.tol);
    }

    (model, n_iter)
}

impl FittedClassifier {
    /// Predict one label per feature row.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>> {
        if features.cols != self.n_features {
            return Err(TrainerError::Training(format!(
                "classifier expects {} features, got {}",
                self.n_features, features.cols
            )));
        }
        (0..features.rows)
            .into_par_iter()
            .map(|row| {
                let (cols, values) = features.row(row);
                let mut logits = self.bias.clone();
                for (&col, &value) in cols.iter().zip(values) {
                    let weights = &self.weights[col * self.n_classes..(col + 1) * self.n_classes];
                    for (logit, w) in logits.iter_mut().zip(weights) {
                        *logit += value * w;
                    }
                }
                // First maximum wins ties
                let class = logits
                    .iter()
                    .enumerate()
                    .fold(0, |best, (i, &v)| if v > logits[best] { i } else { best });
                Label::from_index(class).ok_or_else(|| {
                    TrainerError::Training(format!("classifier produced unknown class {class}"))
                })
            })
            .collect()
    }
}
