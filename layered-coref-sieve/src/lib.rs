//! Multi-pass sieve coreference for layered-coref.
//!
//! ```text
//! exact_match → head_lexicon → appositive → head_inclusion → compatible_modifiers → pronoun_match
//!  (precise)                                                                       (permissive)
//! ```
//!
//! Each pass merges whole clusters, so a decision made by a precise pass is
//! visible to every later one. The only learned state is the [`HeadLexicon`],
//! trained once and passed by reference into [`SieveEngine::resolve`].

mod cluster_set;
mod engine;
mod head_lexicon;
mod rules;

pub use cluster_set::{ClusterId, ClusterSet};
pub use engine::{run_pass, SieveConfig, SieveEngine};
pub use head_lexicon::HeadLexicon;
pub use rules::{is_appositive, Pass, RuleContext};
