//! Agreement constraints between two mentions.
//!
//! Two mentions disagree when both have a known value for an attribute and the
//! values conflict. Unknown attributes never block a match.

use serde::{Deserialize, Serialize};

use crate::lexicon::{lookup_name, name_gender};
use crate::{Document, Gender, Mention, MentionId, Number};

/// How named-entity tags are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NerComparison {
    /// Reject when both tags are set (not `"O"`) and differ.
    Symmetric,
    /// Reject when the first tag is not `"O"`, the second is not `"0"`, and
    /// they differ. An untagged second mention is therefore rejected against
    /// any tagged first mention.
    Literal,
}

impl Default for NerComparison {
    fn default() -> Self {
        NerComparison::Symmetric
    }
}

/// Gender, number and NER agreement check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Agreement {
    pub ner: NerComparison,
}

impl Agreement {
    pub fn new(ner: NerComparison) -> Self {
        Self { ner }
    }

    /// Returns true unless a known attribute of `a` conflicts with `b`'s.
    pub fn passes(&self, doc: &Document, a: MentionId, b: MentionId) -> bool {
        let (ner_a, ner_b) = (&doc.head_token(a).ner, &doc.head_token(b).ner);
        let ner_conflict = match self.ner {
            NerComparison::Symmetric => ner_a != "O" && ner_b != "O" && ner_a != ner_b,
            NerComparison::Literal => ner_a != "O" && ner_b != "0" && ner_a != ner_b,
        };
        if ner_conflict {
            return false;
        }

        if let (Some(ga), Some(gb)) = (known_gender(doc.mention(a)), known_gender(doc.mention(b))) {
            if !ga.is_compatible(gb) {
                return false;
            }
        }

        match (known_number(doc, a), known_number(doc, b)) {
            (Some(na), Some(nb)) => na == nb,
            _ => true,
        }
    }
}

/// Gender of a pronoun or of a gazetteer name; `None` otherwise.
pub fn known_gender(mention: &Mention) -> Option<Gender> {
    match mention.pronoun() {
        Some(p) => Some(p.gender),
        None => lookup_name(mention.gloss()),
    }
}

/// Gender used by the pronoun pass: never unknown, `Neutral` for non-names.
pub fn inferred_gender(mention: &Mention) -> Gender {
    match mention.pronoun() {
        Some(p) => p.gender,
        None => name_gender(mention.gloss()),
    }
}

/// Number of a pronoun, else read from the head tag.
pub fn known_number(doc: &Document, id: MentionId) -> Option<Number> {
    if let Some(p) = doc.mention(id).pronoun() {
        return p.number;
    }
    match doc.head_token(id).pos.as_str() {
        "NNS" | "NNPS" => Some(Number::Plural),
        "NN" | "NNP" => Some(Number::Singular),
        _ => None,
    }
}
