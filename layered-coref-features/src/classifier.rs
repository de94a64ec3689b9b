//! Binary linear classifier over sparse feature vectors.
//!
//! [`LinearTrainer`] is the boundary to whatever fits the weights; the bundled
//! [`LogisticRegressionTrainer`] is deterministic batch gradient descent on
//! L2-regularised log loss.

use std::collections::{BTreeMap, BTreeSet};

use layered_coref_document::{CorefError, CorefResult};
use serde::{Deserialize, Serialize};

use crate::{Feature, FeatureVector};

/// One labelled training pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub features: FeatureVector,
    pub label: bool,
}

impl Example {
    pub fn new(features: FeatureVector, label: bool) -> Self {
        Self { features, label }
    }

    /// Split a labelled vector (see `FeatureExtractor::extract_labelled`) into
    /// inputs and label. A vector without `Coreferent(_)` is a negative.
    pub fn from_labelled(mut features: FeatureVector) -> Self {
        let label = features.remove(&Feature::Coreferent(true)).is_some();
        features.remove(&Feature::Coreferent(false));
        Self { features, label }
    }
}

/// Fits a [`LinearModel`] to labelled examples.
pub trait LinearTrainer {
    fn train(&self, examples: &[Example]) -> CorefResult<LinearModel>;
}

/// Per-feature weights plus a bias. Positive score means coreferent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: BTreeMap<Feature, f64>,
    bias: f64,
}

impl LinearModel {
    pub fn new(weights: BTreeMap<Feature, f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn score(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .filter_map(|(f, count)| self.weights.get(f).map(|w| w * count))
            .sum::<f64>()
            + self.bias
    }

    pub fn classify(&self, features: &FeatureVector) -> bool {
        self.score(features) > 0.0
    }

    /// Weight of a feature, 0.0 when unseen.
    pub fn weight(&self, feature: &Feature) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The `n` heaviest features by absolute weight, ties in feature order.
    pub fn top_features(&self, n: usize) -> Vec<(&Feature, f64)> {
        let mut ranked: Vec<(&Feature, f64)> = self.weights.iter().map(|(f, &w)| (f, w)).collect();
        ranked.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.truncate(n);
        ranked
    }
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

/// Batch gradient descent on L2-regularised logistic loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionTrainer {
    pub iterations: usize,
    pub learning_rate: f64,
    pub l2: f64,
}

impl Default for LogisticRegressionTrainer {
    fn default() -> Self {
        Self {
            iterations: 300,
            learning_rate: 0.5,
            l2: 1.0,
        }
    }
}

impl LogisticRegressionTrainer {
    pub fn validate(&self) -> CorefResult<()> {
        if self.iterations == 0 {
            return Err(CorefError::config("trainer iterations must be positive"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(CorefError::config(format!(
                "trainer learning_rate must be positive (got {})",
                self.learning_rate
            )));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(CorefError::config(format!(
                "trainer l2 must be non-negative (got {})",
                self.l2
            )));
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LinearTrainer for LogisticRegressionTrainer {
    fn train(&self, examples: &[Example]) -> CorefResult<LinearModel> {
        self.validate()?;
        if examples.is_empty() {
            log::debug!("no training examples; returning an empty model");
            return Ok(LinearModel::default());
        }

        let vocabulary: Vec<&Feature> = examples
            .iter()
            .flat_map(|e| e.features.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: BTreeMap<&Feature, usize> =
            vocabulary.iter().enumerate().map(|(i, &f)| (f, i)).collect();
        let rows: Vec<Vec<(usize, f64)>> = examples
            .iter()
            .map(|e| e.features.iter().map(|(f, &x)| (index[f], x)).collect())
            .collect();

        let n = examples.len() as f64;
        let mut weights = vec![0.0; vocabulary.len()];
        let mut bias = 0.0;

        for _ in 0..self.iterations {
            let mut gradient = vec![0.0; weights.len()];
            let mut bias_gradient = 0.0;

            for (row, example) in rows.iter().zip(examples) {
                let z = bias + row.iter().map(|&(i, x)| weights[i] * x).sum::<f64>();
                let error = sigmoid(z) - if example.label { 1.0 } else { 0.0 };
                for &(i, x) in row {
                    gradient[i] += error * x;
                }
                bias_gradient += error;
            }

            for (w, g) in weights.iter_mut().zip(&gradient) {
                *w -= self.learning_rate * (g + self.l2 * *w) / n;
            }
            bias -= self.learning_rate * bias_gradient / n;
        }

        let weights: BTreeMap<Feature, f64> = vocabulary
            .into_iter()
            .cloned()
            .zip(weights)
            .collect();
        log::info!(
            "trained linear model: {} examples, {} features",
            examples.len(),
            weights.len()
        );
        Ok(LinearModel::new(weights, bias))
    }
}
