//! Reference strategies the sieve and the classifier are measured against.

use std::collections::HashMap;

use layered_coref_document::{lexicon::name_gender, Clustering, Document, Pronoun};
use layered_coref_sieve::HeadLexicon;

/// Every mention its own entity.
pub fn all_singleton(doc: &Document) -> Clustering {
    Clustering::singletons(doc.mention_count())
}

/// Every mention in a single entity.
pub fn one_cluster(doc: &Document) -> Clustering {
    Clustering::one_cluster(doc.mention_count())
}

/// Left-to-right clustering keyed by the gloss that opened each cluster.
///
/// A mention joins the cluster keyed by its own gloss, else the cluster of the
/// first string `lexicon` lists after its gloss, else (pronouns only) the
/// oldest cluster whose key has the pronoun's name gender. Otherwise it opens
/// a new cluster.
pub fn head_baseline(doc: &Document, lexicon: &HeadLexicon) -> Clustering {
    let mut keys: Vec<&str> = Vec::new();
    let mut cluster_of: HashMap<&str, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(doc.mention_count());

    for mention in doc.mentions() {
        let gloss = mention.gloss();

        let joined = cluster_of
            .get(gloss)
            .copied()
            .or_else(|| {
                lexicon.coreferents(gloss).and_then(|later| {
                    later.iter().find_map(|word| cluster_of.get(word.as_str()).copied())
                })
            })
            .or_else(|| {
                let pronoun = Pronoun::lookup(gloss)?;
                keys.iter()
                    .find(|key| name_gender(key) == pronoun.gender)
                    .and_then(|key| cluster_of.get(key).copied())
            });

        let label = match joined {
            Some(label) => label,
            None => {
                let label = keys.len();
                keys.push(gloss);
                cluster_of.insert(gloss, label);
                label
            }
        };
        labels.push(label);
    }

    Clustering::from_labels(&labels)
}
