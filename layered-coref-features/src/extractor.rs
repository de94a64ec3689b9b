//! Pairwise feature extraction.
//!
//! The *fixed* mention is the one being resolved; the *candidate* is an
//! earlier mention it might link to.

use std::collections::BTreeSet;

use layered_coref_document::lexicon::is_name;
use layered_coref_document::{
    find_antecedent, known_gender, Agreement, CorefResult, Document, Mention, MentionId, Pronoun,
};
use once_cell::unsync::OnceCell;

use crate::{ActiveTemplate, Feature, FeatureConfig, FeatureVector, Payload, Template};

/// Per-document state shared by every pair extracted from one document.
///
/// Hobbs antecedents are computed lazily, at most once per mention.
pub struct PairContext<'d> {
    doc: &'d Document,
    agreement: Agreement,
    hobbs: Vec<OnceCell<MentionId>>,
}

impl<'d> PairContext<'d> {
    pub fn new(doc: &'d Document, agreement: Agreement) -> Self {
        Self {
            doc,
            agreement,
            hobbs: (0..doc.mention_count()).map(|_| OnceCell::new()).collect(),
        }
    }

    pub fn hobbs_antecedent(&self, pronoun: MentionId) -> MentionId {
        *self.hobbs[pronoun.index()]
            .get_or_init(|| find_antecedent(self.doc, pronoun, &self.agreement))
    }
}

/// Computes the active features of mention pairs.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
    agreement: Agreement,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self::with_agreement(config, Agreement::default())
    }

    /// Agreement settings are used by the Hobbs search behind `HobbsAntecedent`.
    pub fn with_agreement(config: FeatureConfig, agreement: Agreement) -> Self {
        Self { config, agreement }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn context<'d>(&self, doc: &'d Document) -> PairContext<'d> {
        PairContext::new(doc, self.agreement)
    }

    /// Sparse features of (`fixed`, `candidate`), 1.0 per fired indicator.
    pub fn extract(
        &self,
        ctx: &PairContext<'_>,
        fixed: MentionId,
        candidate: MentionId,
    ) -> CorefResult<FeatureVector> {
        let mut vector = FeatureVector::new();
        for active in self.config.active() {
            let (feature, count) = match *active {
                ActiveTemplate::Single(template) => {
                    self.atomic(ctx, template, fixed, candidate)?
                }
                ActiveTemplate::Pair(a, b) => {
                    let (fa, ca) = self.atomic(ctx, a, fixed, candidate)?;
                    let (fb, cb) = self.atomic(ctx, b, fixed, candidate)?;
                    (Feature::pair(fa, fb), ca * cb)
                }
            };
            if count > 0.0 {
                *vector.entry(feature).or_insert(0.0) += count;
            }
        }
        Ok(vector)
    }

    /// Like [`extract`](Self::extract), with the output label added as
    /// `Coreferent(label)`.
    pub fn extract_labelled(
        &self,
        ctx: &PairContext<'_>,
        fixed: MentionId,
        candidate: MentionId,
        coreferent: bool,
    ) -> CorefResult<FeatureVector> {
        let mut vector = self.extract(ctx, fixed, candidate)?;
        vector.insert(Feature::Coreferent(coreferent), 1.0);
        Ok(vector)
    }

    fn atomic(
        &self,
        ctx: &PairContext<'_>,
        template: Template,
        fixed: MentionId,
        candidate: MentionId,
    ) -> CorefResult<(Feature, f64)> {
        let doc = ctx.doc;
        let (f, c) = (doc.mention(fixed), doc.mention(candidate));
        let flag = |value: bool| -> CorefResult<(Feature, f64)> {
            Ok((Feature::flag(template, value), 1.0))
        };
        let gender_name =
            |m: &Mention| known_gender(m).map_or("unknown", |g| g.as_str()).to_string();

        match template {
            Template::ExactMatch => flag(f.gloss() == c.gloss()),
            Template::FixedIsPronoun => flag(f.is_pronoun()),
            Template::CandIsPronoun => flag(c.is_pronoun()),
            Template::WordDist => {
                let distance = doc.absolute_begin(fixed).abs_diff(doc.absolute_end(candidate));
                let bucket = match distance {
                    d if d > 20 => 4,
                    d if d > 10 => 3,
                    d if d > 5 => 2,
                    d if d > 2 => 1,
                    _ => 0,
                };
                Ok((Feature::atomic(template, Payload::Int(bucket)), 1.0))
            }
            Template::FixedIsName => flag(is_name(f.gloss())),
            Template::CandIsName => flag(is_name(c.gloss())),
            Template::FixedIsDef => flag(is_definite(f.gloss())),
            Template::CandIsDef => flag(is_definite(c.gloss())),
            Template::GenderMismatch => match (known_gender(f), known_gender(c)) {
                (Some(gf), Some(gc)) => flag(gf != gc),
                _ => flag(true),
            },
            Template::FixedGender => Ok((
                Feature::atomic(template, Payload::Str(gender_name(f))),
                1.0,
            )),
            Template::CandGender => Ok((
                Feature::atomic(template, Payload::Str(gender_name(c))),
                1.0,
            )),
            Template::PersonAgreement => match (f.pronoun(), c.pronoun()) {
                (Some(pf), Some(pc)) => flag(pf.speaker == pc.speaker),
                _ => flag(false),
            },
            Template::PersonFixed => Ok((
                Feature::atomic(template, Payload::Int(Pronoun::person_of(f.gloss()))),
                1.0,
            )),
            Template::PersonCand => Ok((
                Feature::atomic(template, Payload::Int(Pronoun::person_of(c.gloss()))),
                1.0,
            )),
            Template::HeadMatch => flag(f.head_word().eq_ignore_ascii_case(c.head_word())),
            Template::SentenceDist => {
                let buckets = self.config.sentence_buckets();
                let distance = (doc.sentence_distance(fixed, candidate) as i64).min(buckets.max - 1);
                Ok((
                    Feature::bucketed(template, distance, buckets.max, buckets.buckets)?,
                    1.0,
                ))
            }
            Template::CandHeadWord => Ok((
                Feature::atomic(template, Payload::Str(c.head_word().to_lowercase())),
                1.0,
            )),
            Template::SharedModifiers => {
                let fixed_mods: BTreeSet<&String> = f.modifiers().iter().collect();
                let shared: BTreeSet<String> = c
                    .modifiers()
                    .iter()
                    .filter(|m| fixed_mods.contains(m))
                    .cloned()
                    .collect();
                let count = if shared.is_empty() { 0.0 } else { 1.0 };
                Ok((Feature::atomic(template, Payload::Set(shared)), count))
            }
            Template::HobbsAntecedent => {
                if !f.is_pronoun() {
                    return Ok((Feature::flag(template, false), 0.0));
                }
                flag(ctx.hobbs_antecedent(fixed) == candidate)
            }
        }
    }
}

fn is_definite(gloss: &str) -> bool {
    gloss.to_lowercase().starts_with("the ")
}
