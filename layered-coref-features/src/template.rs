//! Feature templates and the active-template configuration of a model.

use std::fmt;
use std::str::FromStr;

use layered_coref_document::{CorefError, CorefResult};
use serde::{Deserialize, Serialize};

/// A named rule computing one typed feature from a (fixed, candidate) pair.
///
/// The set is closed: extraction is one exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Template {
    ExactMatch,
    FixedIsPronoun,
    CandIsPronoun,
    WordDist,
    FixedIsName,
    CandIsName,
    FixedIsDef,
    CandIsDef,
    GenderMismatch,
    FixedGender,
    CandGender,
    PersonAgreement,
    PersonFixed,
    PersonCand,
    HeadMatch,
    SentenceDist,
    CandHeadWord,
    SharedModifiers,
    HobbsAntecedent,
}

impl Template {
    pub const ALL: [Template; 19] = [
        Template::ExactMatch,
        Template::FixedIsPronoun,
        Template::CandIsPronoun,
        Template::WordDist,
        Template::FixedIsName,
        Template::CandIsName,
        Template::FixedIsDef,
        Template::CandIsDef,
        Template::GenderMismatch,
        Template::FixedGender,
        Template::CandGender,
        Template::PersonAgreement,
        Template::PersonFixed,
        Template::PersonCand,
        Template::HeadMatch,
        Template::SentenceDist,
        Template::CandHeadWord,
        Template::SharedModifiers,
        Template::HobbsAntecedent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Template::ExactMatch => "ExactMatch",
            Template::FixedIsPronoun => "FixedIsPronoun",
            Template::CandIsPronoun => "CandIsPronoun",
            Template::WordDist => "WordDist",
            Template::FixedIsName => "FixedIsName",
            Template::CandIsName => "CandIsName",
            Template::FixedIsDef => "FixedIsDef",
            Template::CandIsDef => "CandIsDef",
            Template::GenderMismatch => "GenderMismatch",
            Template::FixedGender => "FixedGender",
            Template::CandGender => "CandGender",
            Template::PersonAgreement => "PersonAgreement",
            Template::PersonFixed => "PersonFixed",
            Template::PersonCand => "PersonCand",
            Template::HeadMatch => "HeadMatch",
            Template::SentenceDist => "SentenceDist",
            Template::CandHeadWord => "CandHeadWord",
            Template::SharedModifiers => "SharedModifiers",
            Template::HobbsAntecedent => "HobbsAntecedent",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Template {
    type Err = CorefError;

    fn from_str(name: &str) -> CorefResult<Self> {
        Template::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name.trim())
            .ok_or_else(|| CorefError::UnknownTemplate(name.to_string()))
    }
}

/// A template enabled for a model: atomic, or a composite of two atomics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActiveTemplate {
    Single(Template),
    Pair(Template, Template),
}

impl fmt::Display for ActiveTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveTemplate::Single(t) => write!(f, "{}", t),
            ActiveTemplate::Pair(a, b) => write!(f, "{}*{}", a, b),
        }
    }
}

impl FromStr for ActiveTemplate {
    type Err = CorefError;

    /// `"HeadMatch"` or `"FixedIsPronoun*CandIsPronoun"`.
    fn from_str(name: &str) -> CorefResult<Self> {
        match name.split_once('*') {
            None => Ok(ActiveTemplate::Single(name.parse()?)),
            Some((a, b)) => {
                if b.contains('*') {
                    return Err(CorefError::UnknownTemplate(name.to_string()));
                }
                Ok(ActiveTemplate::Pair(a.parse()?, b.parse()?))
            }
        }
    }
}

impl TryFrom<String> for ActiveTemplate {
    type Error = CorefError;

    fn try_from(name: String) -> CorefResult<Self> {
        name.parse()
    }
}

impl From<ActiveTemplate> for String {
    fn from(template: ActiveTemplate) -> String {
        template.to_string()
    }
}

/// Bucketing of the sentence distance indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceBuckets {
    /// Distances saturate at `max - 1`
    pub max: i64,
    pub buckets: u32,
}

impl Default for SentenceBuckets {
    fn default() -> Self {
        Self { max: 8, buckets: 4 }
    }
}

/// Which templates a model extracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    active: Vec<ActiveTemplate>,
    #[serde(default)]
    sentence_buckets: SentenceBuckets,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        use Template::*;
        Self {
            active: vec![
                ActiveTemplate::Single(ExactMatch),
                ActiveTemplate::Single(WordDist),
                ActiveTemplate::Single(GenderMismatch),
                ActiveTemplate::Single(HeadMatch),
                ActiveTemplate::Pair(PersonCand, PersonFixed),
                ActiveTemplate::Pair(FixedIsPronoun, CandIsPronoun),
                ActiveTemplate::Pair(FixedIsDef, CandIsDef),
            ],
            sentence_buckets: SentenceBuckets::default(),
        }
    }
}

impl FeatureConfig {
    pub fn new(active: Vec<ActiveTemplate>, sentence_buckets: SentenceBuckets) -> CorefResult<Self> {
        let config = Self {
            active,
            sentence_buckets,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse template names; composites are written `A*B`.
    pub fn from_names<S: AsRef<str>>(names: &[S], sentence_buckets: SentenceBuckets) -> CorefResult<Self> {
        let active = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<CorefResult<Vec<_>>>()?;
        Self::new(active, sentence_buckets)
    }

    /// Rejects an empty sentence-bucket layout.
    pub fn validate(&self) -> CorefResult<()> {
        let SentenceBuckets { max, buckets } = self.sentence_buckets;
        if max <= 0 || buckets == 0 {
            return Err(CorefError::config(format!(
                "sentence buckets need max > 0 and buckets > 0 (got max={} buckets={})",
                max, buckets
            )));
        }
        Ok(())
    }

    pub fn active(&self) -> &[ActiveTemplate] {
        &self.active
    }

    pub fn sentence_buckets(&self) -> SentenceBuckets {
        self.sentence_buckets
    }

    pub fn names(&self) -> Vec<String> {
        self.active.iter().map(|t| t.to_string()).collect()
    }

    /// Returns true if `template` is extracted, alone or inside a composite.
    pub fn uses(&self, template: Template) -> bool {
        self.active.iter().any(|a| match *a {
            ActiveTemplate::Single(t) => t == template,
            ActiveTemplate::Pair(x, y) => x == template || y == template,
        })
    }
}
