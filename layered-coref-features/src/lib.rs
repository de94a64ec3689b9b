//! Pairwise features and the classifier linker for layered-coref.
//!
//! ## Core Types
//!
//! - [`Feature`] / [`Payload`] / [`FeatureVector`] - Sparse-vector keys
//! - [`Template`] / [`FeatureConfig`] - Closed template set and active selection
//! - [`FeatureExtractor`] - Features of a (fixed, candidate) mention pair
//! - [`LinearTrainer`] / [`LinearModel`] - Training service boundary and its result
//! - [`PairwiseLinker`] - Greedy backward-nearest-match linker
//!
//! ## Example
//!
//! ```
//! use layered_coref_features::{Feature, Template};
//!
//! let feature = Feature::bucketed(Template::SentenceDist, 3, 8, 4).unwrap();
//! assert_eq!(feature.to_string(), "SentenceDist(1/4)");
//! ```

mod classifier;
mod extractor;
mod feature;
mod linker;
mod template;

pub use classifier::{Example, LinearModel, LinearTrainer, LogisticRegressionTrainer};
pub use extractor::{FeatureExtractor, PairContext};
pub use feature::{display_vector, Feature, FeatureVector, Payload};
pub use linker::PairwiseLinker;
pub use template::{ActiveTemplate, FeatureConfig, SentenceBuckets, Template};
