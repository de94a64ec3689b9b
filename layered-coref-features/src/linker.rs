//! Greedy pairwise linker.
//!
//! Training walks each mention backwards through its predecessors, emitting
//! one example per pair until the first true antecedent. Inference walks the
//! same way and links to the first predecessor the model accepts.
//!
//! ```text
//! m0   m1   m2   m3 ← resolving
//!      ✓    ✗    ✗    scanned right to left; stop at m1
//! ```

use layered_coref_document::{Clustering, CorefResult, Document, GoldEntities, MentionId};

use crate::{Example, FeatureExtractor, LinearModel, LinearTrainer};

#[derive(Debug, Clone, Default)]
pub struct PairwiseLinker {
    extractor: FeatureExtractor,
}

impl PairwiseLinker {
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Labelled pairs of one document, nearest candidate first per mention.
    ///
    /// Fails with `CorpusInconsistency` if a mention has no gold entity.
    pub fn training_examples(&self, doc: &Document, gold: &GoldEntities) -> CorefResult<Vec<Example>> {
        let ctx = self.extractor.context(doc);
        let mut examples = Vec::new();

        for fixed in doc.mention_ids() {
            let fixed_entity = gold.entity_of(fixed)?;
            for j in (0..fixed.index()).rev() {
                let candidate = MentionId(j);
                let coreferent = gold.entity_of(candidate)? == fixed_entity;
                let vector = self
                    .extractor
                    .extract_labelled(&ctx, fixed, candidate, coreferent)?;
                examples.push(Example::from_labelled(vector));
                if coreferent {
                    break;
                }
            }
        }

        Ok(examples)
    }

    /// Collect examples from every document and hand them to `trainer`.
    pub fn train<T>(&self, trainer: &T, corpus: &[(Document, GoldEntities)]) -> CorefResult<LinearModel>
    where
        T: LinearTrainer + ?Sized,
    {
        let mut examples = Vec::new();
        for (doc, gold) in corpus {
            examples.extend(self.training_examples(doc, gold)?);
        }
        log::info!(
            "pairwise linker: {} examples from {} documents",
            examples.len(),
            corpus.len()
        );

        let model = trainer.train(&examples)?;
        for (feature, weight) in model.top_features(100) {
            log::debug!("{:>10.4}  {}", weight, feature);
        }
        Ok(model)
    }

    /// Link each mention to the nearest earlier mention `model` accepts.
    pub fn resolve(&self, model: &LinearModel, doc: &Document) -> CorefResult<Clustering> {
        let ctx = self.extractor.context(doc);
        let mut labels: Vec<usize> = Vec::with_capacity(doc.mention_count());

        for fixed in doc.mention_ids() {
            let mut label = fixed.index();
            for j in (0..fixed.index()).rev() {
                let features = self.extractor.extract(&ctx, fixed, MentionId(j))?;
                if model.classify(&features) {
                    label = labels[j];
                    break;
                }
            }
            labels.push(label);
        }

        Ok(Clustering::from_labels(&labels))
    }
}
