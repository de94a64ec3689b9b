//! Error types shared by every layered-coref crate.
//!
//! Every fatal condition surfaces as a [`CorefError`]; an empty document is
//! not an error.

use thiserror::Error;

/// Errors that can occur while building documents, training, or resolving.
#[derive(Debug, Error)]
pub enum CorefError {
    /// A gold partition does not cover its document's mentions exactly once.
    #[error("corpus inconsistency: mention {mention} in document `{document}` is not in exactly one gold entity")]
    CorpusInconsistency { document: String, mention: usize },

    /// A feature template name is not part of the vocabulary.
    #[error("unknown feature template `{0}`")]
    UnknownTemplate(String),

    /// A bucketed indicator produced an index outside `[0, buckets)`.
    #[error("bucket out of range: value {value} max={max} buckets={buckets} (bucket {bucket})")]
    BucketOutOfRange {
        value: i64,
        max: i64,
        buckets: u32,
        bucket: i64,
    },

    /// Invalid configuration (pass ordering, bucket layout, model kind, TOML).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// `resolve` was called on a strategy with learned state before `train`.
    #[error("strategy `{0}` must be trained before resolving")]
    NotTrained(String),

    /// A mention span violates `begin < end` or leaves its sentence.
    #[error("invalid mention [{begin}, {end}) in sentence {sentence}: {reason}")]
    InvalidMention {
        sentence: usize,
        begin: usize,
        end: usize,
        reason: String,
    },

    /// A bracketed parse tree could not be read, or tags do not line up with it.
    #[error("invalid parse tree: {0}")]
    InvalidTree(String),

    /// Encoding or decoding a trained model failed.
    #[error("model serialization failed: {0}")]
    Serialization(String),

    /// Reading or writing a configuration or model file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CorefError {
    pub fn config(message: impl Into<String>) -> Self {
        CorefError::Config(message.into())
    }

    pub fn invalid_tree(message: impl Into<String>) -> Self {
        CorefError::InvalidTree(message.into())
    }
}

/// Result type for coreference operations.
pub type CorefResult<T> = Result<T, CorefError>;
