//! The six sieve passes and their mention-pair predicates.
//!
//! Passes run from most precise to most permissive. Passes one to five are
//! tested on ordered mention pairs (`a` from the outer cluster, `b` from the
//! inner one); the pronoun pass has its own candidate predicate.

use std::fmt;

use layered_coref_document::{inferred_gender, Agreement, Document, MentionId};
use serde::{Deserialize, Serialize};

use crate::HeadLexicon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Identical non-pronoun glosses
    ExactMatch,
    /// Heads seen coreferent in training
    HeadLexicon,
    /// Adjacent same-head noun phrases
    Appositive,
    /// Multi-word gloss containing the other, same head
    HeadInclusion,
    /// Same head, modifiers of one among the other's
    CompatibleModifiers,
    /// Nearest gender- and speaker-compatible mention
    PronounMatch,
}

impl Pass {
    pub const ALL: [Pass; 6] = [
        Pass::ExactMatch,
        Pass::HeadLexicon,
        Pass::Appositive,
        Pass::HeadInclusion,
        Pass::CompatibleModifiers,
        Pass::PronounMatch,
    ];

    /// 1 (most precise) to 6.
    pub fn priority(self) -> u8 {
        match self {
            Pass::ExactMatch => 1,
            Pass::HeadLexicon => 2,
            Pass::Appositive => 3,
            Pass::HeadInclusion => 4,
            Pass::CompatibleModifiers => 5,
            Pass::PronounMatch => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pass::ExactMatch => "exact_match",
            Pass::HeadLexicon => "head_lexicon",
            Pass::Appositive => "appositive",
            Pass::HeadInclusion => "head_inclusion",
            Pass::CompatibleModifiers => "compatible_modifiers",
            Pass::PronounMatch => "pronoun_match",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a predicate may consult.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub doc: &'a Document,
    pub lexicon: &'a HeadLexicon,
    pub agreement: Agreement,
}

impl<'a> RuleContext<'a> {
    /// Does the ordered pair (`a`, `b`) satisfy a cluster-pair pass?
    ///
    /// Always false for [`Pass::PronounMatch`], see [`Self::pronoun_candidate`].
    pub fn matches(&self, pass: Pass, a: MentionId, b: MentionId) -> bool {
        match pass {
            Pass::ExactMatch => self.exact_match(a, b),
            Pass::HeadLexicon => self.head_lexicon(a, b),
            Pass::Appositive => self.appositive(a, b),
            Pass::HeadInclusion => self.head_inclusion(a, b),
            Pass::CompatibleModifiers => self.compatible_modifiers(a, b),
            Pass::PronounMatch => false,
        }
    }

    fn same_head(&self, a: MentionId, b: MentionId) -> bool {
        self.doc.mention(a).head_word() == self.doc.mention(b).head_word()
    }

    fn exact_match(&self, a: MentionId, b: MentionId) -> bool {
        let (ma, mb) = (self.doc.mention(a), self.doc.mention(b));
        ma.gloss() == mb.gloss() && !ma.is_pronoun()
    }

    fn head_lexicon(&self, a: MentionId, b: MentionId) -> bool {
        self.lexicon.contains(
            self.doc.mention(a).head_word(),
            self.doc.mention(b).head_word(),
        )
    }

    // Head equality is required before the construction check, which misses
    // appositives like "Obama , the president".
    fn appositive(&self, a: MentionId, b: MentionId) -> bool {
        self.same_head(a, b) && is_appositive(self.doc, a, b) && self.agreement.passes(self.doc, a, b)
    }

    fn head_inclusion(&self, a: MentionId, b: MentionId) -> bool {
        let (ma, mb) = (self.doc.mention(a), self.doc.mention(b));
        let eligible = |m: &layered_coref_document::Mention| !m.is_pronoun() && m.len() >= 2;
        eligible(ma)
            && eligible(mb)
            && self.same_head(a, b)
            && ma.gloss().contains(mb.gloss())
            && self.agreement.passes(self.doc, a, b)
    }

    fn compatible_modifiers(&self, a: MentionId, b: MentionId) -> bool {
        let (ma, mb) = (self.doc.mention(a), self.doc.mention(b));
        !ma.is_pronoun()
            && !mb.is_pronoun()
            && self.same_head(a, b)
            && ma.modifiers().iter().all(|m| mb.modifiers().contains(m))
            && self.agreement.passes(self.doc, a, b)
    }

    /// May `candidate` be the antecedent of the pronoun `pronoun`?
    ///
    /// The candidate's inferred gender must equal the pronoun's and, when the
    /// candidate is itself a pronoun, so must the speaker.
    pub fn pronoun_candidate(&self, pronoun: MentionId, candidate: MentionId) -> bool {
        let p = match self.doc.mention(pronoun).pronoun() {
            Some(p) => p,
            None => return false,
        };
        let cand = self.doc.mention(candidate);
        inferred_gender(cand) == p.gender
            && cand.pronoun().map_or(true, |q| q.speaker == p.speaker)
    }
}

/// `a` immediately followed by `b` in one sentence, both anchored at `NP`
/// nodes. A single past-tense verb may sit between them.
pub fn is_appositive(doc: &Document, a: MentionId, b: MentionId) -> bool {
    let (ma, mb) = (doc.mention(a), doc.mention(b));
    if ma.sentence() != mb.sentence() {
        return false;
    }
    let tree = doc.tree_of(a);
    if !(tree.has_label(ma.node(), "NP") && tree.has_label(mb.node(), "NP")) {
        return false;
    }
    if ma.end() == mb.begin() {
        return true;
    }
    let tokens = doc.sentences()[ma.sentence()].tokens();
    ma.end() + 1 == mb.begin() && tokens.get(ma.end()).map_or(false, |t| t.pos == "VBD")
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_coref_document::{DocumentBuilder, Sentence};

    fn ctx<'a>(doc: &'a Document, lexicon: &'a HeadLexicon) -> RuleContext<'a> {
        RuleContext {
            doc,
            lexicon,
            agreement: Agreement::default(),
        }
    }

    fn build(sentence: &str, spans: &[(usize, usize)]) -> (Document, Vec<MentionId>) {
        let mut b = DocumentBuilder::new("rules");
        b.add_sentence(Sentence::parse(sentence).unwrap());
        let ids = spans.iter().map(|&(s, e)| b.add_mention(0, s, e).unwrap()).collect();
        (b.build(), ids)
    }

    #[test]
    fn test_exact_match_skips_pronouns() {
        let (doc, ids) = build(
            "(ROOT (S (NP (PRP He)) (VP (VBD said) (NP (PRP he)) (NP (PRP He)))))",
            &[(0, 1), (2, 3), (3, 4)],
        );
        let lexicon = HeadLexicon::default();
        let ctx = ctx(&doc, &lexicon);
        assert!(!ctx.matches(Pass::ExactMatch, ids[0], ids[2]));
    }

    #[test]
    fn test_appositive_with_past_tense_verb() {
        // "the winner was the winner": NP VBD NP, same head.
        let (doc, ids) = build(
            "(ROOT (S (NP (DT the) (NN winner)) (VP (VBD was) (NP (DT the) (NN winner)))))",
            &[(0, 2), (3, 5)],
        );
        assert!(is_appositive(&doc, ids[0], ids[1]));
        assert!(!is_appositive(&doc, ids[1], ids[0]));
        let lexicon = HeadLexicon::default();
        assert!(ctx(&doc, &lexicon).matches(Pass::Appositive, ids[0], ids[1]));
    }

    #[test]
    fn test_appositive_adjacent_noun_phrases() {
        let (doc, ids) = build(
            "(ROOT (S (NP (NP (NNP Smith)) (NP (DT the) (NNP Smith))) (VP (VBD won))))",
            &[(0, 1), (1, 3), (0, 3)],
        );
        assert!(is_appositive(&doc, ids[0], ids[1]));
        // Not adjacent: the outer NP ends after the second begins.
        assert!(!is_appositive(&doc, ids[2], ids[1]));
    }

    #[test]
    fn test_head_inclusion() {
        let (doc, ids) = build(
            "(ROOT (S (NP (DT the) (JJ old) (NN house)) (VP (VBD faced) (NP (JJ old) (NN house)) (NP (NN house)))))",
            &[(0, 3), (4, 6), (6, 7)],
        );
        let lexicon = HeadLexicon::default();
        let ctx = ctx(&doc, &lexicon);
        assert!(ctx.matches(Pass::HeadInclusion, ids[0], ids[1]));
        assert!(!ctx.matches(Pass::HeadInclusion, ids[1], ids[0]));
        // Single-token spans never qualify.
        assert!(!ctx.matches(Pass::HeadInclusion, ids[0], ids[2]));
    }

    #[test]
    fn test_compatible_modifiers() {
        let (doc, ids) = build(
            "(ROOT (S (NP (DT the) (JJ red) (NN car)) (VP (VBD hit) (NP (DT the) (JJ big) (JJ red) (NN car)) (NP (DT the) (JJ blue) (NN car)))))",
            &[(0, 3), (4, 8), (8, 11)],
        );
        let lexicon = HeadLexicon::default();
        let ctx = ctx(&doc, &lexicon);
        assert!(ctx.matches(Pass::CompatibleModifiers, ids[0], ids[1]));
        assert!(!ctx.matches(Pass::CompatibleModifiers, ids[1], ids[0]));
        assert!(!ctx.matches(Pass::CompatibleModifiers, ids[0], ids[2]));
    }

    #[test]
    fn test_head_lexicon_direction() {
        let (doc, ids) = build(
            "(ROOT (S (NP (NNP Obama)) (VP (VBD thanked) (NP (DT the) (NN president)))))",
            &[(0, 1), (2, 4)],
        );
        let mut lexicon = HeadLexicon::default();
        lexicon.insert("Obama", "president");
        let ctx = ctx(&doc, &lexicon);
        assert!(ctx.matches(Pass::HeadLexicon, ids[0], ids[1]));
        assert!(!ctx.matches(Pass::HeadLexicon, ids[1], ids[0]));
    }

    #[test]
    fn test_pronoun_candidate() {
        let (doc, ids) = build(
            "(ROOT (S (NP (NNP Mary)) (VP (VBD told) (NP (NNP John)) (SBAR (S (NP (PRP he)) (VP (VBD won)))))))",
            &[(0, 1), (2, 3), (3, 4)],
        );
        let lexicon = HeadLexicon::default();
        let ctx = ctx(&doc, &lexicon);
        assert!(!ctx.pronoun_candidate(ids[2], ids[0]));
        assert!(ctx.pronoun_candidate(ids[2], ids[1]));
        // Not a pronoun: never a source.
        assert!(!ctx.pronoun_candidate(ids[1], ids[2]));
    }

    #[test]
    fn test_pronoun_candidate_speaker() {
        let (doc, ids) = build(
            "(ROOT (S (NP (PRP I)) (VP (VBD told) (NP (PRP you)) (SBAR (S (NP (PRP I)) (VP (VBD won)))))))",
            &[(0, 1), (2, 3), (3, 4)],
        );
        let lexicon = HeadLexicon::default();
        let ctx = ctx(&doc, &lexicon);
        assert!(!ctx.pronoun_candidate(ids[0], ids[1]));
        assert!(!ctx.pronoun_candidate(ids[1], ids[2]));
        assert!(ctx.pronoun_candidate(ids[0], ids[2]));
    }
}
