//! Feature values: immutable sparse-vector keys.
//!
//! A feature is its template plus a payload. Equality, ordering and hashing
//! are all derived from both, so two features extracted from different pairs
//! share a weight exactly when they print the same.
//!
//! ```text
//! ExactMatch(true)   WordDist(3)   SentenceDist(1/4)   (FixedIsDef(true),CandIsDef(false))
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use layered_coref_document::{CorefError, CorefResult};
use serde::{Deserialize, Serialize};

use crate::Template;

/// The value carried by an atomic feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Payload {
    Bool(bool),
    Int(i64),
    /// Bucket index out of a fixed number of buckets
    Bucket { bucket: u32, buckets: u32 },
    Str(String),
    Set(BTreeSet<String>),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Bool(b) => write!(f, "{}", b),
            Payload::Int(i) => write!(f, "{}", i),
            Payload::Bucket { bucket, buckets } => write!(f, "{}/{}", bucket, buckets),
            Payload::Str(s) => f.write_str(s),
            Payload::Set(items) => {
                f.write_str(" ")?;
                for item in items {
                    write!(f, "{} ", item)?;
                }
                Ok(())
            }
        }
    }
}

/// A feature of a (fixed, candidate) mention pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Atomic { template: Template, payload: Payload },
    /// Conjunction of two atomic features
    Pair(Box<Feature>, Box<Feature>),
    /// Output label used for supervised training
    Coreferent(bool),
}

impl Feature {
    pub fn atomic(template: Template, payload: Payload) -> Self {
        Feature::Atomic { template, payload }
    }

    pub fn flag(template: Template, value: bool) -> Self {
        Self::atomic(template, Payload::Bool(value))
    }

    pub fn pair(first: Feature, second: Feature) -> Self {
        Feature::Pair(Box::new(first), Box::new(second))
    }

    /// A bucketed indicator: `value * buckets / max`.
    ///
    /// Callers saturate `value` first; any index outside `[0, buckets)` is a
    /// `BucketOutOfRange` error rather than a clamp.
    pub fn bucketed(template: Template, value: i64, max: i64, buckets: u32) -> CorefResult<Self> {
        let bucket = value
            .checked_mul(i64::from(buckets))
            .and_then(|v| v.checked_div(max))
            .unwrap_or(-1);
        if value < 0 || bucket < 0 || bucket >= i64::from(buckets) {
            return Err(CorefError::BucketOutOfRange {
                value,
                max,
                buckets,
                bucket,
            });
        }
        Ok(Self::atomic(
            template,
            Payload::Bucket {
                bucket: bucket as u32,
                buckets,
            },
        ))
    }

    /// Template of an atomic feature.
    pub fn template(&self) -> Option<Template> {
        match self {
            Feature::Atomic { template, .. } => Some(*template),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Atomic { template, payload } => write!(f, "{}({})", template, payload),
            Feature::Pair(a, b) => write!(f, "({},{})", a, b),
            Feature::Coreferent(label) => write!(f, "Coreferent({})", label),
        }
    }
}

/// Sparse feature vector: feature → count.
pub type FeatureVector = BTreeMap<Feature, f64>;

/// Render a vector one feature per line, `feature = count`.
pub fn display_vector(vector: &FeatureVector) -> String {
    vector
        .iter()
        .map(|(feature, count)| format!("{} = {}", feature, count))
        .collect::<Vec<_>>()
        .join("\n")
}
