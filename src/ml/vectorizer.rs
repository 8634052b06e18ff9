// ============================================================
// Layer 5 — TF-IDF Vectorizer
// ============================================================
// Turns raw text into fixed-width numeric rows.
//
// Fitting (on the training texts only):
//   1. lowercase and split into word tokens (2+ word chars)
//   2. emit n-grams for every n in [min_n, max_n]
//   3. count document frequency (df) and total frequency (tf)
//   4. drop terms with df < min_df
//   5. keep the max_features terms with the highest tf
//   6. assign column indices in alphabetical order
//   7. idf = ln((1 + n_docs) / (1 + df)) + 1
//
// Transforming:
//   raw counts × idf, then each row scaled to unit L2 norm.
//   Terms never seen during fitting are ignored.
//
// Output is a CSR sparse matrix: a headline has a handful of
// terms against a vocabulary of tens of thousands, so only the
// non-zero cells are stored.
//
//   indptr  = [0, 3, 5, ...]     row r spans indptr[r]..indptr[r+1]
//   indices = [4, 17, 902, ...]  column of each stored cell
//   values  = [0.5, 0.7, ...]    weight of each stored cell
//
// Rows are computed in parallel with rayon; the caller decides
// how many threads by running inside a bounded pool.
//
// Reference: Salton & Buckley (1988) term weighting
//            rayon crate documentation

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, TrainerError};

/// Word tokens: runs of two or more word characters
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("Invalid token regex"));

/// Vectorizer hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerParams {
    /// Inclusive n-gram range (min_n, max_n)
    pub ngram_range:  (usize, usize),
    /// Upper bound on vocabulary size
    pub max_features: usize,
    /// Minimum number of documents a term must appear in
    pub min_df:       usize,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_range:  (1, 2),
            max_features: 50_000,
            min_df:       2,
        }
    }
}

/// Compressed sparse row matrix, shape [rows, cols].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub rows:    usize,
    pub cols:    usize,
    /// rows + 1 offsets into `indices` / `values`
    pub indptr:  Vec<usize>,
    pub indices: Vec<usize>,
    pub values:  Vec<f32>,
}

impl FeatureMatrix {
    /// Build from per-row (column, value) lists, columns ascending.
    pub fn from_rows(cols: usize, rows: Vec<Vec<(usize, f32)>>) -> Self {
        let nnz = rows.iter().map(Vec::len).sum();
        let mut indptr  = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut values  = Vec::with_capacity(nnz);

        indptr.push(0);
        for row in &rows {
            for &(col, value) in row {
                indices.push(col);
                values.push(value);
            }
            indptr.push(indices.len());
        }

        Self { rows: rows.len(), cols, indptr, indices, values }
    }

    /// Column indices and values of row `i`
    pub fn row(&self, i: usize) -> (&[usize], &[f32]) {
        let span = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[span.clone()], &self.values[span])
    }

    /// Number of stored (non-zero) cells
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// A fitted TF-IDF vectorizer. Serialised as part of the model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params:     VectorizerParams,
    vocabulary: BTreeMap<String, usize>,
    idf:        Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from `documents`.
    pub fn fit(params: &VectorizerParams, documents: &[String]) -> Result<Self> {
        if documents.is_empty() {
            return Err(TrainerError::Training(
                "cannot fit vectorizer on an empty corpus".to_string(),
            ));
        }

        let analysed: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| analyse(doc, params.ngram_range))
            .collect();

        let mut doc_freq:  HashMap<&str, usize> = HashMap::new();
        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analysed {
            let mut seen = HashSet::new();
            for term in terms {
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Keep frequent-enough terms, highest total frequency first
        let mut kept: Vec<(&str, usize)> = term_freq
            .into_iter()
            .filter(|(term, _)| doc_freq[term] >= params.min_df)
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        kept.truncate(params.max_features);

        if kept.is_empty() {
            return Err(TrainerError::Training(format!(
                "no term appears in at least {} documents; vocabulary is empty",
                params.min_df
            )));
        }

        let mut terms: Vec<&str> = kept.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf        = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = doc_freq[term] as f64;
            idf.push((((1.0 + n_docs) / (1.0 + df)).ln() + 1.0) as f32);
            vocabulary.insert(term.to_string(), index);
        }

        tracing::info!(
            "Vectorizer fitted: {} documents, {} terms (min_df={}, max_features={})",
            documents.len(),
            vocabulary.len(),
            params.min_df,
            params.max_features,
        );

        Ok(Self { params: params.clone(), vocabulary, idf })
    }

    /// Project `documents` onto the fitted vocabulary.
    pub fn transform(&self, documents: &[String]) -> FeatureMatrix {
        let rows: Vec<Vec<(usize, f32)>> = documents
            .par_iter()
            .map(|doc| self.transform_one(doc))
            .collect();

        FeatureMatrix::from_rows(self.vocabulary.len(), rows)
    }

    fn transform_one(&self, document: &str) -> Vec<(usize, f32)> {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for term in analyse(document, self.params.ngram_range) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm = row.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, value) in &mut row {
                *value /= norm;
            }
        }
        row
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }
}

/// Lowercase, tokenize and expand into n-grams.
fn analyse(text: &str, (min_n, max_n): (usize, usize)) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        terms.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    terms
}
