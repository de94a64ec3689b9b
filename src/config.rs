//! TOML configuration of a [`CorefSystem`](crate::CorefSystem).
//!
//! ```toml
//! strategy = "classifier"
//!
//! [classifier]
//! features = ["ExactMatch", "HeadMatch", "FixedIsPronoun*CandIsPronoun"]
//!
//! [classifier.trainer]
//! iterations = 100
//! ```
//!
//! Every key is optional. Feature names are only checked when the
//! configuration is turned into a [`Strategy`].

use layered_coref_document::{CorefError, CorefResult, NerComparison};
use layered_coref_features::{FeatureConfig, LogisticRegressionTrainer, SentenceBuckets};
use layered_coref_sieve::SieveConfig;
use serde::{Deserialize, Serialize};

use crate::{ClassifierConfig, CorefSystem, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    AllSingleton,
    OneCluster,
    HeadBaseline,
    Sieve,
    Classifier,
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Sieve
    }
}

/// `[classifier]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    pub ner_comparison: NerComparison,
    /// Template names, composites written `A*B`
    pub features: Vec<String>,
    pub sentence_buckets: SentenceBuckets,
    pub trainer: LogisticRegressionTrainer,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        let features = FeatureConfig::default();
        Self {
            ner_comparison: NerComparison::default(),
            features: features.names(),
            sentence_buckets: features.sentence_buckets(),
            trainer: LogisticRegressionTrainer::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub strategy: StrategyKind,
    pub sieve: SieveConfig,
    pub classifier: ClassifierSection,
}

impl SystemConfig {
    pub fn from_toml_str(text: &str) -> CorefResult<Self> {
        toml::from_str(text).map_err(|e| CorefError::config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> CorefResult<String> {
        toml::to_string(self).map_err(|e| CorefError::Serialization(e.to_string()))
    }

    /// Validate the selected strategy's section.
    ///
    /// Only the section the strategy uses is checked.
    pub fn to_strategy(&self) -> CorefResult<Strategy> {
        Ok(match self.strategy {
            StrategyKind::AllSingleton => Strategy::AllSingleton,
            StrategyKind::OneCluster => Strategy::OneCluster,
            StrategyKind::HeadBaseline => Strategy::HeadBaseline,
            StrategyKind::Sieve => {
                self.sieve.validate()?;
                Strategy::Sieve(self.sieve.clone())
            }
            StrategyKind::Classifier => {
                let section = &self.classifier;
                section.trainer.validate()?;
                Strategy::Classifier(ClassifierConfig {
                    features: FeatureConfig::from_names(section.features.as_slice(), section.sentence_buckets)?,
                    trainer: section.trainer,
                    ner_comparison: section.ner_comparison,
                })
            }
        })
    }

    /// An untrained system for this configuration.
    pub fn build(&self) -> CorefResult<CorefSystem> {
        CorefSystem::new(self.to_strategy()?)
    }
}
