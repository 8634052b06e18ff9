use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::TensorData,
};

use crate::ml::vectorizer::FeatureMatrix;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LogisticRegressionConfig {
    pub n_features: usize,
    pub n_classes:  usize,
}

impl LogisticRegressionConfig {
    /// Weights and bias start at zero.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticRegressionModel<B> {
        let linear = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LogisticRegressionModel { linear }
    }
}

// ─── Sparse Input ─────────────────────────────────────────────────────────────
// The non-zero cells of a feature matrix in coordinate form:
//
//   row_ids[k], col_ids[k], values[k]   for k in 0..nnz
//
// TF-IDF rows are almost entirely zeros, so the model never sees a
// dense [rows, n_features] tensor; it gathers weight rows instead.
pub struct SparseBatch<B: Backend> {
    pub rows:    usize,
    pub row_ids: Tensor<B, 1, Int>,
    pub col_ids: Tensor<B, 1, Int>,
    /// [nnz, 1]
    pub values:  Tensor<B, 2>,
}

impl<B: Backend> SparseBatch<B> {
    /// Returns None when the matrix has no non-zero cell.
    pub fn from_matrix(features: &FeatureMatrix, device: &B::Device) -> Option<Self> {
        let nnz = features.nnz();
        if nnz == 0 {
            return None;
        }

        let mut row_ids = Vec::with_capacity(nnz);
        for row in 0..features.rows {
            let (indices, _) = features.row(row);
            row_ids.extend(std::iter::repeat(row as i64).take(indices.len()));
        }
        let col_ids: Vec<i64> = features.indices.iter().map(|&c| c as i64).collect();

        Some(Self {
            rows:    features.rows,
            row_ids: Tensor::from_data(TensorData::new(row_ids, [nnz]), device),
            col_ids: Tensor::from_data(TensorData::new(col_ids, [nnz]), device),
            values:  Tensor::from_data(TensorData::new(features.values.clone(), [nnz, 1]), device),
        })
    }
}

/// Softmax (multinomial) logistic regression: one linear layer whose
/// logits go through cross-entropy during training and argmax at
/// prediction time.
#[derive(Module, Debug)]
pub struct LogisticRegressionModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticRegressionModel<B> {
    /// Sparse rows → logits [rows, n_classes]
    ///
    /// logits[r] = bias + Σ_k values[k] · W[col_ids[k]]   over k with row_ids[k] = r
    pub fn forward_sparse(&self, batch: &SparseBatch<B>) -> Tensor<B, 2> {
        let weight    = self.linear.weight.val();
        let n_classes = weight.dims()[1];
        let device    = weight.device();

        let contributions = weight.select(0, batch.col_ids.clone()) * batch.values.clone();
        let logits = Tensor::<B, 2>::zeros([batch.rows, n_classes], &device)
            .select_assign(0, batch.row_ids.clone(), contributions);

        match &self.linear.bias {
            Some(bias) => logits + bias.val().unsqueeze::<2>(),
            None       => logits,
        }
    }

    /// Squared L2 norm of the weight matrix (bias is not penalised).
    pub fn l2_penalty(&self) -> Tensor<B, 1> {
        let w = self.linear.weight.val();
        (w.clone() * w).sum()
    }

    /// Weight matrix flattened row-major, shape [n_features, n_classes]
    pub fn weights(&self) -> Result<Vec<f32>, String> {
        self.linear
            .weight
            .val()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| format!("cannot read weights: {e:?}"))
    }

    /// Bias vector, shape [n_classes]; zeros when the layer has no bias
    pub fn bias(&self) -> Result<Vec<f32>, String> {
        match &self.linear.bias {
            Some(bias) => bias
                .val()
                .into_data()
                .convert::<f32>()
                .to_vec::<f32>()
                .map_err(|e| format!("cannot read bias: {e:?}")),
            None => Ok(vec![0.0; self.linear.weight.val().dims()[1]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_zero_init_gives_zero_logits() {
        let device = Default::default();
        let model: LogisticRegressionModel<NdArray> =
            LogisticRegressionConfig::new(3, 2).init(&device);

        let x = FeatureMatrix::from_rows(3, vec![vec![(0, 1.0), (2, 3.0)]]);
        let batch = SparseBatch::from_matrix(&x, &device).unwrap();
        let logits = model
            .forward_sparse(&batch)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .unwrap();
        assert_eq!(logits, vec![0.0, 0.0]);
        assert_eq!(model.weights().unwrap().len(), 6);
        assert_eq!(model.bias().unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_sparse_forward_matches_dense_product() {
        let device = Default::default();
        let model: LogisticRegressionModel<NdArray> =
            LogisticRegressionConfig::new(3, 2).init(&device);
        // W = [[1, 2], [3, 4], [5, 6]]
        let weight = Tensor::<NdArray, 2>::from_data(
            TensorData::new(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], [3, 2]),
            &device,
        );
        let model = LogisticRegressionModel {
            linear: Linear {
                weight: burn::module::Param::from_tensor(weight),
                bias:   model.linear.bias,
            },
        };

        // Row 1 is empty: its logits are just the (zero) bias
        let x = FeatureMatrix::from_rows(
            3,
            vec![vec![(0, 1.0), (2, 0.5)], vec![], vec![(1, 2.0)]],
        );
        let batch  = SparseBatch::from_matrix(&x, &device).unwrap();
        let logits = model
            .forward_sparse(&batch)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .unwrap();
        assert_eq!(logits, vec![3.5, 5.0, 0.0, 0.0, 6.0, 8.0]);
    }

    #[test]
    fn test_empty_matrix_has_no_batch() {
        let x = FeatureMatrix::from_rows(4, vec![vec![], vec![]]);
        assert!(SparseBatch::<NdArray>::from_matrix(&x, &Default::default()).is_none());
    }
}
