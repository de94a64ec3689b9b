//! Document model for layered-coref.
//!
//! Everything upstream of resolution is read-only here: sentences with their
//! tokens and parse trees, and the mentions detected over them. Resolvers
//! produce a [`Clustering`] per document.
//!
//! ## Core Types
//!
//! - [`Document`] / [`DocumentBuilder`] - Sentences plus mentions in document order
//! - [`ParseTree`] - Arena parse tree with parent pointers and bounded BFS
//! - [`Mention`] - Token span with head word, gloss and modifiers
//! - [`Clustering`] / [`GoldEntities`] - Resolver output and training partitions
//! - [`Agreement`] - Gender/number/NER agreement constraints
//! - [`find_antecedent`] - Hobbs pronoun antecedent search
//!
//! ## Example
//!
//! ```
//! use layered_coref_document::{DocumentBuilder, Sentence};
//!
//! let mut builder = DocumentBuilder::new("example");
//! let s = builder.add_sentence(
//!     Sentence::parse("(ROOT (S (NP (NNP Alice)) (VP (VBD slept))))").unwrap(),
//! );
//! let alice = builder.add_mention(s, 0, 1).unwrap();
//! let doc = builder.build();
//! assert_eq!(doc.mention(alice).gloss(), "Alice");
//! ```

mod agreement;
mod document;
mod entity;
mod error;
mod hobbs;
pub mod lexicon;
mod mention;
mod parse_tree;

// Errors
pub use error::{CorefError, CorefResult};

// Document types
pub use document::{DocPosition, Document, DocumentBuilder, Sentence, Token};
pub use mention::{find_head, Mention, MentionId};
pub use parse_tree::{Ancestors, NodeId, ParseTree, TreeNode};

// Resolution output
pub use entity::{ClusteredMention, Clustering, Entity, EntityId, GoldEntities};

// Linguistic knowledge
pub use agreement::{inferred_gender, known_gender, known_number, Agreement, NerComparison};
pub use lexicon::{Gender, Number, Pronoun, Speaker};

// Antecedent search
pub use hobbs::find_antecedent;
