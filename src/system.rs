//! Resolution orchestrator.
//!
//! A [`CorefSystem`] pairs a [`Strategy`] with the state it learned in
//! training. Training replaces the whole model at once; resolution only ever
//! reads an `Arc` snapshot of it, so documents can be resolved concurrently.

use std::sync::Arc;

use layered_coref_document::{
    Agreement, Clustering, CorefError, CorefResult, Document, GoldEntities, NerComparison,
};
use layered_coref_features::{
    FeatureConfig, FeatureExtractor, LinearModel, LinearTrainer, LogisticRegressionTrainer,
    PairwiseLinker,
};
use layered_coref_sieve::{HeadLexicon, SieveConfig, SieveEngine};
use serde::{Deserialize, Serialize};

use crate::baseline;

/// Settings of the pairwise classifier strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierConfig {
    pub features: FeatureConfig,
    pub trainer: LogisticRegressionTrainer,
    /// Agreement used by the `HobbsAntecedent` feature
    pub ner_comparison: NerComparison,
}

/// How mentions are clustered.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Every mention its own entity
    AllSingleton,
    /// Every mention in one entity
    OneCluster,
    /// Gloss and trained-head matching, pronouns by name gender
    HeadBaseline,
    Sieve(SieveConfig),
    Classifier(ClassifierConfig),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AllSingleton => "all_singleton",
            Strategy::OneCluster => "one_cluster",
            Strategy::HeadBaseline => "head_baseline",
            Strategy::Sieve(_) => "sieve",
            Strategy::Classifier(_) => "classifier",
        }
    }

    /// Returns true if `resolve` needs a trained model.
    pub fn needs_training(&self) -> bool {
        !matches!(self, Strategy::AllSingleton | Strategy::OneCluster)
    }
}

/// Learned state, one variant per trainable strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainedModel {
    HeadBaseline(HeadLexicon),
    Sieve(HeadLexicon),
    Classifier(LinearModel),
}

impl TrainedModel {
    /// Name of the strategy this model belongs to.
    pub fn kind(&self) -> &'static str {
        match self {
            TrainedModel::HeadBaseline(_) => "head_baseline",
            TrainedModel::Sieve(_) => "sieve",
            TrainedModel::Classifier(_) => "classifier",
        }
    }

    pub fn to_ron(&self) -> CorefResult<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(8)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config).map_err(|e| CorefError::Serialization(e.to_string()))
    }

    pub fn from_ron(text: &str) -> CorefResult<Self> {
        ron::from_str(text).map_err(|e| CorefError::Serialization(e.to_string()))
    }
}

// ============================================================================
// SYSTEM
// ============================================================================

#[derive(Debug, Clone)]
enum Resolver {
    Fixed,
    HeadBaseline,
    Sieve(SieveEngine),
    Classifier {
        linker: PairwiseLinker,
        trainer: LogisticRegressionTrainer,
    },
}

/// Trains and applies one coreference strategy.
#[derive(Debug, Clone)]
pub struct CorefSystem {
    strategy: Strategy,
    resolver: Resolver,
    model: Option<Arc<TrainedModel>>,
}

impl CorefSystem {
    /// Validates the strategy's configuration.
    pub fn new(strategy: Strategy) -> CorefResult<Self> {
        let resolver = match &strategy {
            Strategy::AllSingleton | Strategy::OneCluster => Resolver::Fixed,
            Strategy::HeadBaseline => Resolver::HeadBaseline,
            Strategy::Sieve(config) => Resolver::Sieve(SieveEngine::new(config.clone())?),
            Strategy::Classifier(config) => {
                config.features.validate()?;
                config.trainer.validate()?;
                let extractor = FeatureExtractor::with_agreement(
                    config.features.clone(),
                    Agreement::new(config.ner_comparison),
                );
                Resolver::Classifier {
                    linker: PairwiseLinker::new(extractor),
                    trainer: config.trainer,
                }
            }
        };
        Ok(Self {
            strategy,
            resolver,
            model: None,
        })
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Snapshot of the current model, if trained.
    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.clone()
    }

    /// Learn from `(document, gold entities)` pairs.
    ///
    /// Each document's gold entities must hold every one of its mentions
    /// exactly once, otherwise the corpus is rejected before anything is
    /// learned.
    pub fn train(&mut self, corpus: &[(Document, GoldEntities)]) -> CorefResult<()> {
        match &self.resolver {
            Resolver::Classifier { trainer, .. } => {
                let trainer = *trainer;
                self.train_with(&trainer, corpus)
            }
            _ => {
                check_corpus(corpus)?;
                log::info!(
                    "training {} on {} documents",
                    self.strategy.name(),
                    corpus.len()
                );
                self.model = match self.resolver {
                    Resolver::Fixed => None,
                    Resolver::HeadBaseline => Some(Arc::new(TrainedModel::HeadBaseline(
                        HeadLexicon::train_keeping_pronouns(corpus),
                    ))),
                    Resolver::Sieve(_) => Some(Arc::new(TrainedModel::Sieve(HeadLexicon::train(corpus)))),
                    Resolver::Classifier { .. } => None,
                };
                Ok(())
            }
        }
    }

    /// Train the classifier strategy with another training service.
    pub fn train_with(
        &mut self,
        trainer: &dyn LinearTrainer,
        corpus: &[(Document, GoldEntities)],
    ) -> CorefResult<()> {
        let linker = match &self.resolver {
            Resolver::Classifier { linker, .. } => linker,
            _ => {
                return Err(CorefError::config(format!(
                    "strategy `{}` does not use a linear trainer",
                    self.strategy.name()
                )))
            }
        };
        check_corpus(corpus)?;
        log::info!("training classifier on {} documents", corpus.len());
        let model = linker.train(trainer, corpus)?;
        self.model = Some(Arc::new(TrainedModel::Classifier(model)));
        Ok(())
    }

    /// Cluster every mention of `doc`, in document order.
    pub fn resolve(&self, doc: &Document) -> CorefResult<Clustering> {
        let clustering = match (&self.resolver, self.model.as_deref()) {
            (Resolver::Fixed, _) => match self.strategy {
                Strategy::OneCluster => baseline::one_cluster(doc),
                _ => baseline::all_singleton(doc),
            },
            (_, None) => return Err(CorefError::NotTrained(self.strategy.name().to_string())),
            (Resolver::HeadBaseline, Some(TrainedModel::HeadBaseline(lexicon))) => {
                baseline::head_baseline(doc, lexicon)
            }
            (Resolver::Sieve(engine), Some(TrainedModel::Sieve(lexicon))) => engine.resolve(doc, lexicon),
            (Resolver::Classifier { linker, .. }, Some(TrainedModel::Classifier(model))) => {
                linker.resolve(model, doc)?
            }
            (_, Some(model)) => return Err(mismatch(&self.strategy, model)),
        };

        log::debug!(
            "{}: {} mentions in {} entities",
            doc.id(),
            clustering.len(),
            clustering.entity_count()
        );
        Ok(clustering)
    }

    /// Resolve independent documents; in parallel with the `parallel` feature.
    pub fn resolve_batch(&self, docs: &[Document]) -> CorefResult<Vec<Clustering>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            docs.par_iter().map(|doc| self.resolve(doc)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            docs.iter().map(|doc| self.resolve(doc)).collect()
        }
    }

    /// Encode the trained model as RON.
    pub fn export_model(&self) -> CorefResult<String> {
        match &self.model {
            Some(model) => model.to_ron(),
            None => Err(CorefError::NotTrained(self.strategy.name().to_string())),
        }
    }

    /// Install a previously trained model. It must belong to this strategy.
    pub fn with_model(mut self, model: TrainedModel) -> CorefResult<Self> {
        let fits = matches!(
            (&self.strategy, &model),
            (Strategy::HeadBaseline, TrainedModel::HeadBaseline(_))
                | (Strategy::Sieve(_), TrainedModel::Sieve(_))
                | (Strategy::Classifier(_), TrainedModel::Classifier(_))
        );
        if !fits {
            return Err(mismatch(&self.strategy, &model));
        }
        self.model = Some(Arc::new(model));
        Ok(self)
    }
}

fn mismatch(strategy: &Strategy, model: &TrainedModel) -> CorefError {
    CorefError::config(format!(
        "a `{}` model cannot be used by the `{}` strategy",
        model.kind(),
        strategy.name()
    ))
}

fn check_corpus(corpus: &[(Document, GoldEntities)]) -> CorefResult<()> {
    corpus.iter().try_for_each(|(doc, gold)| gold.check_complete(doc))
}
