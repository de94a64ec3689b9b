//! Head-word coreference table learned from gold entities.
//!
//! For every ordered mention pair (earlier, later) of a gold entity, the head
//! of the earlier mention is recorded as coreferent with the head of the later
//! one. The table is built once by training and only read afterwards.

use std::collections::{BTreeMap, BTreeSet};

use layered_coref_document::{Document, GoldEntities, Pronoun};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadLexicon {
    coreferent: BTreeMap<String, BTreeSet<String>>,
}

impl HeadLexicon {
    /// Train from a corpus, skipping pairs where either head is a pronoun.
    pub fn train(corpus: &[(Document, GoldEntities)]) -> Self {
        Self::build(corpus, false)
    }

    /// Train from a corpus, keeping pronoun heads.
    pub fn train_keeping_pronouns(corpus: &[(Document, GoldEntities)]) -> Self {
        Self::build(corpus, true)
    }

    fn build(corpus: &[(Document, GoldEntities)], keep_pronouns: bool) -> Self {
        let mut lexicon = HeadLexicon::default();
        for (doc, gold) in corpus {
            for entity in gold.entities() {
                let mut mentions = entity.clone();
                mentions.sort();
                for (i, &earlier) in mentions.iter().enumerate() {
                    for &later in &mentions[i + 1..] {
                        let (a, b) = (doc.mention(earlier).head_word(), doc.mention(later).head_word());
                        if !keep_pronouns && (Pronoun::is_pronoun(a) || Pronoun::is_pronoun(b)) {
                            continue;
                        }
                        lexicon.insert(a, b);
                    }
                }
            }
        }
        log::info!(
            "head lexicon: {} heads from {} documents",
            lexicon.len(),
            corpus.len()
        );
        lexicon
    }

    pub fn insert(&mut self, earlier: &str, later: &str) {
        self.coreferent
            .entry(earlier.to_string())
            .or_default()
            .insert(later.to_string());
    }

    /// Returns true if `earlier` was seen coreferent with a later `later`.
    pub fn contains(&self, earlier: &str, later: &str) -> bool {
        self.coreferent
            .get(earlier)
            .map_or(false, |set| set.contains(later))
    }

    /// Words recorded after `earlier`, in sorted order.
    pub fn coreferents(&self, earlier: &str) -> Option<&BTreeSet<String>> {
        self.coreferent.get(earlier)
    }

    /// Number of distinct earlier heads.
    pub fn len(&self) -> usize {
        self.coreferent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coreferent.is_empty()
    }
}
