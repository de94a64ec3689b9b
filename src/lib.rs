//! Coreference resolution over parsed documents.
//!
//! Mentions are grouped into entities by one of several strategies:
//!
//! - a six-pass rule sieve ([`layered_coref_sieve`]), with an optional Hobbs
//!   pass for pronouns left alone,
//! - a pairwise linear classifier over a configurable feature vocabulary
//!   ([`layered_coref_features`]),
//! - three baselines: all singletons, one cluster, and gloss/head matching.
//!
//! ## Example
//!
//! ```
//! use layered_coref::{CorefSystem, DocumentBuilder, Sentence, SieveConfig, Strategy};
//!
//! let mut builder = DocumentBuilder::new("example");
//! let s = builder.add_sentence(
//!     Sentence::parse("(ROOT (S (NP (NNP Alice)) (VP (VBD said) (SBAR (S (NP (PRP she)) (VP (VBD won)))))))")
//!         .unwrap(),
//! );
//! let alice = builder.add_mention(s, 0, 1).unwrap();
//! let she = builder.add_mention(s, 2, 3).unwrap();
//! let doc = builder.build();
//!
//! let mut system = CorefSystem::new(Strategy::Sieve(SieveConfig::default())).unwrap();
//! system.train(&[]).unwrap();
//! let clustering = system.resolve(&doc).unwrap();
//! assert!(clustering.same_entity(alice, she));
//! ```

mod baseline;
mod config;
mod display;
mod loader;
mod system;

pub use baseline::{all_singleton, head_baseline, one_cluster};
pub use config::{ClassifierSection, StrategyKind, SystemConfig};
pub use display::ClusterDisplay;
pub use loader::{load_config, load_model, load_system, save_model};
pub use system::{ClassifierConfig, CorefSystem, Strategy, TrainedModel};

// Re-export member crate types for convenience
pub use layered_coref_document::{
    Agreement, Clustering, ClusteredMention, CorefError, CorefResult, Document, DocumentBuilder,
    Entity, EntityId, GoldEntities, Mention, MentionId, NerComparison, Sentence, Token,
};
pub use layered_coref_features::{
    FeatureConfig, LinearModel, LinearTrainer, LogisticRegressionTrainer, PairwiseLinker,
};
pub use layered_coref_sieve::{HeadLexicon, Pass, SieveConfig, SieveEngine};

#[cfg(test)]
mod tests {
    mod properties;
    mod round_trip;
    mod scenarios;
}
