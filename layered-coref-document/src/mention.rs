//! Mentions: noun-phrase spans detected upstream, with derived attributes.

use serde::{Deserialize, Serialize};

use crate::{NodeId, Pronoun, Token};

/// Position of a mention in its document's mention sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MentionId(pub usize);

impl MentionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A contiguous token span `[begin, end)` within one sentence.
///
/// Created by [`DocumentBuilder`](crate::DocumentBuilder), which validates the
/// span and computes the derived attributes once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub(crate) id: MentionId,
    pub(crate) sentence: usize,
    pub(crate) begin: usize,
    pub(crate) end: usize,
    /// Parse node covering the span
    pub(crate) node: NodeId,
    /// Sentence-level index of the head token
    pub(crate) head: usize,
    pub(crate) words: Vec<String>,
    pub(crate) gloss: String,
    pub(crate) modifiers: Vec<String>,
}

impl Mention {
    pub(crate) fn new(
        id: MentionId,
        sentence: usize,
        tokens: &[Token],
        (begin, end): (usize, usize),
        node: NodeId,
        head: usize,
    ) -> Self {
        let words: Vec<String> = tokens[begin..end].iter().map(|t| t.word.clone()).collect();
        let gloss = words.join(" ");
        let modifiers = (begin..end)
            .filter(|&i| i != head && is_modifier_tag(&tokens[i].pos))
            .map(|i| tokens[i].word.clone())
            .collect();

        Self {
            id,
            sentence,
            begin,
            end,
            node,
            head,
            words,
            gloss,
            modifiers,
        }
    }

    pub fn id(&self) -> MentionId {
        self.id
    }

    pub fn sentence(&self) -> usize {
        self.sentence
    }

    /// First token index (inclusive, sentence-relative).
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Last token index (exclusive, sentence-relative).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn head_word(&self) -> &str {
        &self.words[self.head - self.begin]
    }

    /// Surface text, words joined by single spaces.
    pub fn gloss(&self) -> &str {
        &self.gloss
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pronoun(&self) -> Option<Pronoun> {
        Pronoun::lookup(&self.gloss)
    }

    pub fn is_pronoun(&self) -> bool {
        self.pronoun().is_some()
    }
}

fn is_nominal_tag(pos: &str) -> bool {
    pos.starts_with("NN") || pos == "PRP" || pos == "PRP$" || pos == "CD"
}

fn is_post_modifier_marker(pos: &str) -> bool {
    matches!(pos, "IN" | "TO" | "WDT" | "WP" | ",")
}

fn is_modifier_tag(pos: &str) -> bool {
    pos.starts_with("JJ")
        || pos.starts_with("NN")
        || pos == "CD"
        || pos == "VBG"
        || pos == "VBN"
}

/// Syntactic head of `tokens[begin..end]`.
///
/// The last nominal token before the first post-modifier marker that follows
/// a nominal ("the president *of* France" → president). Falls back to the
/// last token when the span has no nominal.
pub fn find_head(tokens: &[Token], begin: usize, end: usize) -> usize {
    let mut head = None;
    for (i, token) in tokens.iter().enumerate().take(end).skip(begin) {
        if head.is_some() && is_post_modifier_marker(&token.pos) {
            break;
        }
        if is_nominal_tag(&token.pos) {
            head = Some(i);
        }
    }
    head.unwrap_or(end - 1)
}
