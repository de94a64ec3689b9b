//! Sieve cascade driver.
//!
//! Every mention starts alone. Passes one to five each run to a fixpoint:
//! scan ordered cluster pairs, merge the first matching pair, restart, and
//! stop when a full scan finds nothing. The pronoun pass then runs once, and
//! an optional Hobbs pass attaches pronouns that are still alone.

use layered_coref_document::{
    find_antecedent, Agreement, Clustering, CorefError, CorefResult, Document, NerComparison,
};
use serde::{Deserialize, Serialize};

use crate::{ClusterId, ClusterSet, HeadLexicon, Pass, RuleContext};

/// Which passes run and how agreement compares NER tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    /// Strictly increasing priority order
    pub passes: Vec<Pass>,
    pub ner_comparison: NerComparison,
    pub hobbs_pass: bool,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            passes: Pass::ALL.to_vec(),
            ner_comparison: NerComparison::default(),
            hobbs_pass: false,
        }
    }
}

impl SieveConfig {
    pub fn validate(&self) -> CorefResult<()> {
        for pair in self.passes.windows(2) {
            if pair[0].priority() >= pair[1].priority() {
                return Err(CorefError::config(format!(
                    "sieve passes must be in increasing priority order: `{}` cannot follow `{}`",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SieveEngine {
    config: SieveConfig,
}

impl Default for SieveEngine {
    fn default() -> Self {
        Self {
            config: SieveConfig::default(),
        }
    }
}

impl SieveEngine {
    pub fn new(config: SieveConfig) -> CorefResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    fn context<'a>(&self, doc: &'a Document, lexicon: &'a HeadLexicon) -> RuleContext<'a> {
        RuleContext {
            doc,
            lexicon,
            agreement: Agreement::new(self.config.ner_comparison),
        }
    }

    /// Run the configured cascade over `doc`.
    pub fn resolve(&self, doc: &Document, lexicon: &HeadLexicon) -> Clustering {
        let ctx = self.context(doc, lexicon);
        let mut clusters = ClusterSet::singletons(doc.mention_count());

        for &pass in &self.config.passes {
            let merges = run_pass(&ctx, pass, &mut clusters);
            log::debug!(
                "{}: pass {} made {} merges, {} clusters remain",
                doc.id(),
                pass,
                merges,
                clusters.len()
            );
        }
        if self.config.hobbs_pass {
            hobbs_pass(&ctx, &mut clusters);
        }

        clusters.to_clustering()
    }
}

/// Run one pass over `clusters`, returning the number of merges.
pub fn run_pass(ctx: &RuleContext<'_>, pass: Pass, clusters: &mut ClusterSet) -> usize {
    match pass {
        Pass::PronounMatch => pronoun_pass(ctx, clusters),
        _ => fixpoint_pass(ctx, pass, clusters),
    }
}

fn first_match(ctx: &RuleContext<'_>, pass: Pass, clusters: &ClusterSet) -> Option<(ClusterId, ClusterId)> {
    let roots = clusters.roots();
    for &a in &roots {
        for &b in &roots {
            if a == b {
                continue;
            }
            let hit = clusters.members(a).iter().any(|&ma| {
                clusters
                    .members(b)
                    .iter()
                    .any(|&mb| ctx.matches(pass, ma, mb))
            });
            if hit {
                return Some((a, b));
            }
        }
    }
    None
}

fn fixpoint_pass(ctx: &RuleContext<'_>, pass: Pass, clusters: &mut ClusterSet) -> usize {
    let mut merges = 0;
    while let Some((into, from)) = first_match(ctx, pass, clusters) {
        log::trace!("{}: {:?} absorbs {:?}", pass, into, from);
        clusters.merge(into, from);
        merges += 1;
    }
    merges
}

/// Single pass: each cluster holding a pronoun joins the cluster of the
/// nearest compatible mention (in mention-index distance).
///
/// Clusters are visited in their order at the start of the pass. Only the
/// visited cluster is ever absorbed, so each one is visited once, with the
/// members it has by then. Ties go to the first candidate in scan order.
fn pronoun_pass(ctx: &RuleContext<'_>, clusters: &mut ClusterSet) -> usize {
    let mut merges = 0;

    for source in clusters.roots() {
        let mut best: Option<(usize, ClusterId)> = None;
        for &pronoun in clusters.members(source) {
            if !ctx.doc.mention(pronoun).is_pronoun() {
                continue;
            }
            for target in clusters.roots() {
                if target == source {
                    continue;
                }
                for &candidate in clusters.members(target) {
                    if !ctx.pronoun_candidate(pronoun, candidate) {
                        continue;
                    }
                    let distance = pronoun.index().abs_diff(candidate.index());
                    if best.map_or(true, |(closest, _)| distance < closest) {
                        best = Some((distance, target));
                    }
                }
            }
        }

        if let Some((distance, target)) = best {
            log::trace!(
                "pronoun_match: {:?} joins {:?} at distance {}",
                source,
                target,
                distance
            );
            clusters.merge(target, source);
            merges += 1;
        }
    }

    merges
}

/// Pronouns still alone join the cluster of their Hobbs antecedent.
fn hobbs_pass(ctx: &RuleContext<'_>, clusters: &mut ClusterSet) -> usize {
    let mut merges = 0;
    for pronoun in ctx.doc.mention_ids() {
        if !ctx.doc.mention(pronoun).is_pronoun() || clusters.members(clusters.find(pronoun)).len() != 1 {
            continue;
        }
        let antecedent = find_antecedent(ctx.doc, pronoun, &ctx.agreement);
        if antecedent != pronoun {
            log::trace!("hobbs: {:?} joins {:?}", pronoun, antecedent);
            let (into, from) = (clusters.find(antecedent), clusters.find(pronoun));
            if clusters.merge(into, from) {
                merges += 1;
            }
        }
    }
    merges
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_coref_document::{DocumentBuilder, MentionId, Sentence};

    fn glosses(doc: &Document, clustering: &Clustering) -> Vec<Vec<String>> {
        clustering
            .groups()
            .into_iter()
            .map(|g| g.into_iter().map(|m| doc.mention(m).gloss().to_string()).collect())
            .collect()
    }

    /// "Barack Obama spoke . Barack Obama left ."
    fn obama_twice() -> Document {
        let mut b = DocumentBuilder::new("obama");
        for verb in ["spoke", "left"] {
            let s = b.add_sentence(
                Sentence::parse(&format!(
                    "(ROOT (S (NP (NNP Barack) (NNP Obama)) (VP (VBD {})) (. .)))",
                    verb
                ))
                .unwrap(),
            );
            b.add_mention(s, 0, 2).unwrap();
        }
        b.build()
    }

    #[test]
    fn test_exact_match_merges_identical_names() {
        let doc = obama_twice();
        let engine = SieveEngine::new(SieveConfig {
            passes: vec![Pass::ExactMatch],
            ..SieveConfig::default()
        })
        .unwrap();
        let clustering = engine.resolve(&doc, &HeadLexicon::default());
        assert_eq!(clustering.entity_count(), 1);
    }

    #[test]
    fn test_exact_match_is_idempotent() {
        let doc = obama_twice();
        let lexicon = HeadLexicon::default();
        let ctx = SieveEngine::default().context(&doc, &lexicon);
        let mut clusters = ClusterSet::singletons(doc.mention_count());
        assert_eq!(run_pass(&ctx, Pass::ExactMatch, &mut clusters), 1);
        assert_eq!(run_pass(&ctx, Pass::ExactMatch, &mut clusters), 0);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn test_pass_order_is_validated() {
        let config = SieveConfig {
            passes: vec![Pass::Appositive, Pass::ExactMatch],
            ..SieveConfig::default()
        };
        let err = SieveEngine::new(config).unwrap_err();
        assert!(matches!(err, CorefError::Config(_)));
        insta::assert_snapshot!(err, @"invalid configuration: sieve passes must be in increasing priority order: `exact_match` cannot follow `appositive`");
        let duplicate = SieveConfig {
            passes: vec![Pass::ExactMatch, Pass::ExactMatch],
            ..SieveConfig::default()
        };
        assert!(SieveEngine::new(duplicate).is_err());
    }

    /// "Mary met John . He smiled ."
    fn mary_john_he() -> Document {
        let mut b = DocumentBuilder::new("pronouns");
        b.add_sentence(
            Sentence::parse("(ROOT (S (NP (NNP Mary)) (VP (VBD met) (NP (NNP John))) (. .)))").unwrap(),
        );
        b.add_sentence(Sentence::parse("(ROOT (S (NP (PRP He)) (VP (VBD smiled)) (. .)))").unwrap());
        b.add_mention(0, 0, 1).unwrap();
        b.add_mention(0, 2, 3).unwrap();
        b.add_mention(1, 0, 1).unwrap();
        b.build()
    }

    #[test]
    fn test_he_never_joins_a_female_mention() {
        let doc = mary_john_he();
        let clustering = SieveEngine::default().resolve(&doc, &HeadLexicon::default());
        assert!(!clustering.same_entity(MentionId(2), MentionId(0)));
        assert_eq!(
            glosses(&doc, &clustering),
            vec![vec!["Mary".to_string()], vec!["John".to_string(), "He".to_string()]]
        );
    }

    #[test]
    fn test_pronoun_pass_prefers_nearest() {
        // "John met Bob . He left ." Both male; Bob is nearer.
        let mut b = DocumentBuilder::new("nearest");
        b.add_sentence(
            Sentence::parse("(ROOT (S (NP (NNP John)) (VP (VBD met) (NP (NNP Bob)))))").unwrap(),
        );
        b.add_sentence(Sentence::parse("(ROOT (S (NP (PRP He)) (VP (VBD left))))").unwrap());
        let john = b.add_mention(0, 0, 1).unwrap();
        let bob = b.add_mention(0, 2, 3).unwrap();
        let he = b.add_mention(1, 0, 1).unwrap();
        let doc = b.build();

        let clustering = SieveEngine::default().resolve(&doc, &HeadLexicon::default());
        assert!(clustering.same_entity(he, bob));
        assert!(!clustering.same_entity(he, john));
    }

    fn pronouns_only() -> SieveEngine {
        SieveEngine::new(SieveConfig {
            passes: vec![Pass::PronounMatch],
            ..SieveConfig::default()
        })
        .unwrap()
    }

    fn one_sentence(tree: &str, spans: &[(usize, usize)]) -> Document {
        let mut b = DocumentBuilder::new("pronoun-pass");
        b.add_sentence(Sentence::parse(tree).unwrap());
        for &(begin, end) in spans {
            b.add_mention(0, begin, end).unwrap();
        }
        b.build()
    }

    #[test]
    fn test_pronoun_pass_requires_same_speaker() {
        // "I told you I won": "you" fits I's gender but not its speaker.
        let doc = one_sentence(
            "(ROOT (S (NP (PRP I)) (VP (VBD told) (NP (PRP you)) (SBAR (S (NP (PRP I)) (VP (VBD won)))))))",
            &[(0, 1), (2, 3), (3, 4)],
        );
        let clustering = pronouns_only().resolve(&doc, &HeadLexicon::default());
        assert_eq!(
            clustering.groups(),
            vec![vec![MentionId(0), MentionId(2)], vec![MentionId(1)]]
        );
    }

    #[test]
    fn test_pronoun_pass_tie_goes_to_first_cluster() {
        // "John said he saw Bob": both names one mention away from "he".
        let doc = one_sentence(
            "(ROOT (S (NP (NNP John)) (VP (VBD said) (SBAR (S (NP (PRP he)) (VP (VBD saw) (NP (NNP Bob))))))))",
            &[(0, 1), (2, 3), (4, 5)],
        );
        let clustering = pronouns_only().resolve(&doc, &HeadLexicon::default());
        assert_eq!(
            glosses(&doc, &clustering),
            vec![vec!["John".to_string(), "he".to_string()], vec!["Bob".to_string()]]
        );
    }

    #[test]
    fn test_pronoun_pass_visits_grown_cluster_with_current_members() {
        // "He met John Bob": "he" first joins John; when John's cluster is
        // visited it holds "he" and so joins Bob.
        let doc = one_sentence(
            "(ROOT (S (NP (PRP He)) (VP (VBD met) (NP (NNP John)) (NP (NNP Bob)))))",
            &[(0, 1), (2, 3), (3, 4)],
        );
        let lexicon = HeadLexicon::default();
        let ctx = pronouns_only().context(&doc, &lexicon);
        let mut clusters = ClusterSet::singletons(doc.mention_count());
        assert_eq!(run_pass(&ctx, Pass::PronounMatch, &mut clusters), 2);
        assert_eq!(clusters.len(), 1);
        // Bob's cluster has no other cluster left to join.
        assert_eq!(run_pass(&ctx, Pass::PronounMatch, &mut clusters), 0);
    }

    #[test]
    fn test_hobbs_pass_attaches_unresolved_pronoun() {
        // "it" is neutral; with the pronoun pass disabled only Hobbs links it.
        let mut b = DocumentBuilder::new("hobbs");
        b.add_sentence(
            Sentence::parse("(ROOT (S (NP (DT The) (NN report)) (VP (VBD arrived))))").unwrap(),
        );
        b.add_sentence(Sentence::parse("(ROOT (S (NP (PRP It)) (VP (VBD was) (ADJP (JJ late)))))").unwrap());
        let report = b.add_mention(0, 0, 2).unwrap();
        let it = b.add_mention(1, 0, 1).unwrap();
        let doc = b.build();

        let without = SieveEngine::new(SieveConfig {
            passes: vec![Pass::ExactMatch],
            ..SieveConfig::default()
        })
        .unwrap();
        assert!(!without.resolve(&doc, &HeadLexicon::default()).same_entity(report, it));

        let with = SieveEngine::new(SieveConfig {
            passes: vec![Pass::ExactMatch],
            hobbs_pass: true,
            ..SieveConfig::default()
        })
        .unwrap();
        assert!(with.resolve(&doc, &HeadLexicon::default()).same_entity(report, it));
    }

    #[test]
    fn test_head_lexicon_pass_uses_training() {
        let mut b = DocumentBuilder::new("lexicon");
        b.add_sentence(
            Sentence::parse("(ROOT (S (NP (NNP Obama)) (VP (VBD thanked) (NP (DT the) (NN president)))))")
                .unwrap(),
        );
        let obama = b.add_mention(0, 0, 1).unwrap();
        let president = b.add_mention(0, 2, 4).unwrap();
        let doc = b.build();

        let engine = SieveEngine::default();
        assert!(!engine.resolve(&doc, &HeadLexicon::default()).same_entity(obama, president));

        let mut lexicon = HeadLexicon::default();
        lexicon.insert("Obama", "president");
        assert!(engine.resolve(&doc, &lexicon).same_entity(obama, president));
    }
}
