//! Documents: parsed sentences plus the mentions detected over them.
//!
//! A [`Document`] is immutable once built. Mentions are stored in insertion
//! order, which is the document order every resolver relies on, and each
//! mention is indexed by the parse node it is anchored at so the Hobbs search
//! can go from a proposed node back to a mention without scanning.

use std::collections::HashMap;

use crate::mention::find_head;
use crate::{CorefError, CorefResult, Mention, MentionId, NodeId, ParseTree};

/// One word with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    /// Part-of-speech tag (Penn Treebank)
    pub pos: String,
    /// Named-entity tag, `"O"` outside any entity
    pub ner: String,
}

impl Token {
    pub fn new(word: impl Into<String>, pos: impl Into<String>, ner: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
            ner: ner.into(),
        }
    }
}

/// Position of a token within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPosition {
    pub sentence: usize,
    pub token: usize,
}

impl DocPosition {
    pub fn new(sentence: usize, token: usize) -> Self {
        Self { sentence, token }
    }
}

/// A tokenized, tagged and parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<Token>,
    tree: ParseTree,
}

impl Sentence {
    /// Tokens are read off the tree's preterminals; every NER tag is `"O"`.
    pub fn from_tree(tree: ParseTree) -> Self {
        let tokens = tree
            .tagged_words()
            .into_iter()
            .map(|(tag, word)| Token::new(word, tag, "O"))
            .collect();
        Self { tokens, tree }
    }

    /// Parse a bracketed tree (see [`ParseTree::parse`]).
    pub fn parse(bracketed: &str) -> CorefResult<Self> {
        ParseTree::parse(bracketed).map(Self::from_tree)
    }

    /// Attach named-entity tags, one per token.
    pub fn with_ner(mut self, tags: &[&str]) -> CorefResult<Self> {
        if tags.len() != self.tokens.len() {
            return Err(CorefError::invalid_tree(format!(
                "{} NER tags for a sentence of {} tokens",
                tags.len(),
                self.tokens.len()
            )));
        }
        for (token, &tag) in self.tokens.iter_mut().zip(tags) {
            token.ner = tag.to_string();
        }
        Ok(self)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Incrementally assembles a [`Document`], validating every mention span.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    id: String,
    sentences: Vec<Sentence>,
    mentions: Vec<Mention>,
}

impl DocumentBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sentences: Vec::new(),
            mentions: Vec::new(),
        }
    }

    /// Append a sentence and return its index.
    pub fn add_sentence(&mut self, sentence: Sentence) -> usize {
        self.sentences.push(sentence);
        self.sentences.len() - 1
    }

    /// Add a mention over `[begin, end)` of `sentence`; the head is found from
    /// the part-of-speech tags.
    pub fn add_mention(&mut self, sentence: usize, begin: usize, end: usize) -> CorefResult<MentionId> {
        self.push_mention(sentence, begin, end, None)
    }

    /// Add a mention with an explicit sentence-relative head index.
    pub fn add_mention_with_head(
        &mut self,
        sentence: usize,
        begin: usize,
        end: usize,
        head: usize,
    ) -> CorefResult<MentionId> {
        self.push_mention(sentence, begin, end, Some(head))
    }

    fn push_mention(
        &mut self,
        sentence: usize,
        begin: usize,
        end: usize,
        head: Option<usize>,
    ) -> CorefResult<MentionId> {
        let invalid = |reason: &str| CorefError::InvalidMention {
            sentence,
            begin,
            end,
            reason: reason.to_string(),
        };

        let sent = self
            .sentences
            .get(sentence)
            .ok_or_else(|| invalid("no such sentence"))?;
        if begin >= end {
            return Err(invalid("span is empty"));
        }
        if end > sent.len() {
            return Err(invalid("span runs past the end of the sentence"));
        }
        let head = match head {
            Some(h) if !(begin..end).contains(&h) => return Err(invalid("head outside the span")),
            Some(h) => h,
            None => find_head(sent.tokens(), begin, end),
        };
        let node = sent
            .tree()
            .covering_node(begin, end)
            .ok_or_else(|| invalid("no parse node covers the span"))?;

        let id = MentionId(self.mentions.len());
        self.mentions
            .push(Mention::new(id, sentence, sent.tokens(), (begin, end), node, head));
        Ok(id)
    }

    pub fn build(self) -> Document {
        let mut sentence_offsets = Vec::with_capacity(self.sentences.len());
        let mut offset = 0;
        for sentence in &self.sentences {
            sentence_offsets.push(offset);
            offset += sentence.len();
        }

        let mut node_index = HashMap::new();
        for mention in &self.mentions {
            node_index
                .entry((mention.sentence, mention.node))
                .or_insert(mention.id);
        }

        log::trace!(
            "built document `{}`: {} sentences, {} mentions",
            self.id,
            self.sentences.len(),
            self.mentions.len()
        );

        Document {
            id: self.id,
            sentences: self.sentences,
            mentions: self.mentions,
            sentence_offsets,
            node_index,
        }
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// Parsed sentences and their mentions, in document order.
#[derive(Clone)]
pub struct Document {
    id: String,
    sentences: Vec<Sentence>,
    mentions: Vec<Mention>,
    /// Token offset of each sentence's first token
    sentence_offsets: Vec<usize>,
    /// First mention anchored at each (sentence, node)
    node_index: HashMap<(usize, NodeId), MentionId>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("sentence_count", &self.sentences.len())
            .field("mention_count", &self.mentions.len())
            .finish()
    }
}

impl Document {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// All mentions in document order.
    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn mention(&self, id: MentionId) -> &Mention {
        &self.mentions[id.0]
    }

    pub fn mention_ids(&self) -> impl Iterator<Item = MentionId> + '_ {
        (0..self.mentions.len()).map(MentionId)
    }

    pub fn mention_count(&self) -> usize {
        self.mentions.len()
    }

    /// Returns true if the document has no mentions.
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn head_token(&self, id: MentionId) -> &Token {
        let m = self.mention(id);
        &self.sentences[m.sentence].tokens[m.head]
    }

    /// Parse tree of the sentence containing a mention.
    pub fn tree_of(&self, id: MentionId) -> &ParseTree {
        &self.sentences[self.mention(id).sentence].tree
    }

    /// The first mention anchored at `node` of `sentence`, if any.
    pub fn mention_at(&self, sentence: usize, node: NodeId) -> Option<MentionId> {
        self.node_index.get(&(sentence, node)).copied()
    }

    /// Document-level offset of a token position.
    pub fn absolute(&self, position: DocPosition) -> usize {
        self.sentence_offsets[position.sentence] + position.token
    }

    /// Document-level offset of a mention's first token.
    pub fn absolute_begin(&self, id: MentionId) -> usize {
        let m = self.mention(id);
        self.absolute(DocPosition::new(m.sentence, m.begin))
    }

    /// Document-level offset one past a mention's last token.
    pub fn absolute_end(&self, id: MentionId) -> usize {
        let m = self.mention(id);
        self.absolute(DocPosition::new(m.sentence, m.end))
    }

    /// Number of sentence boundaries between two mentions.
    pub fn sentence_distance(&self, a: MentionId, b: MentionId) -> usize {
        let (sa, sb) = (self.mention(a).sentence, self.mention(b).sentence);
        sa.abs_diff(sb)
    }
}
