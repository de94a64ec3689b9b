//! Closed-class word lists: English pronouns and a first-name gazetteer.
//!
//! Lookups are case-insensitive. A gloss counts as a pronoun only when the
//! whole gloss is a listed form ("he" yes, "he himself" no).

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Grammatical gender used for agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    /// Compatible with male and female referents (e.g. "they", "Alex").
    Either,
    /// Inanimate or non-person referents ("it", "the report").
    Neutral,
}

impl Gender {
    /// Two known genders conflict unless they are equal or one is `Either`.
    pub fn is_compatible(self, other: Gender) -> bool {
        self == other || self == Gender::Either || other == Gender::Either
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Either => "either",
            Gender::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    Singular,
    Plural,
}

/// Who a pronoun refers to relative to the speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    First,
    Second,
    Third,
}

impl Speaker {
    /// Grammatical person as a number (1, 2 or 3).
    pub fn person(self) -> i64 {
        match self {
            Speaker::First => 1,
            Speaker::Second => 2,
            Speaker::Third => 3,
        }
    }
}

/// A personal pronoun and its agreement attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pronoun {
    pub form: &'static str,
    pub speaker: Speaker,
    pub gender: Gender,
    /// `None` where English does not mark number ("you").
    pub number: Option<Number>,
}

impl Pronoun {
    /// Look up a gloss in the pronoun table.
    pub fn lookup(gloss: &str) -> Option<Pronoun> {
        PRONOUNS.get(gloss.to_lowercase().as_str()).copied()
    }

    /// Returns true if the whole gloss is a known pronoun.
    pub fn is_pronoun(gloss: &str) -> bool {
        Self::lookup(gloss).is_some()
    }

    /// Grammatical person of a gloss: 1, 2 or 3 for pronouns, 0 otherwise.
    pub fn person_of(gloss: &str) -> i64 {
        Self::lookup(gloss).map_or(0, |p| p.speaker.person())
    }
}

type Row = (&'static [&'static str], Speaker, Gender, Option<Number>);

const PRONOUN_ROWS: &[Row] = &[
    (&["i", "me", "my", "mine", "myself"], Speaker::First, Gender::Either, Some(Number::Singular)),
    (&["we", "us", "our", "ours", "ourselves"], Speaker::First, Gender::Either, Some(Number::Plural)),
    (&["you", "your", "yours"], Speaker::Second, Gender::Either, None),
    (&["yourself"], Speaker::Second, Gender::Either, Some(Number::Singular)),
    (&["yourselves"], Speaker::Second, Gender::Either, Some(Number::Plural)),
    (&["he", "him", "his", "himself"], Speaker::Third, Gender::Male, Some(Number::Singular)),
    (&["she", "her", "hers", "herself"], Speaker::Third, Gender::Female, Some(Number::Singular)),
    (&["it", "its", "itself"], Speaker::Third, Gender::Neutral, Some(Number::Singular)),
    (
        &["they", "them", "their", "theirs", "themselves"],
        Speaker::Third,
        Gender::Either,
        Some(Number::Plural),
    ),
];

static PRONOUNS: Lazy<HashMap<&'static str, Pronoun>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for &(forms, speaker, gender, number) in PRONOUN_ROWS {
        for &form in forms {
            table.insert(
                form,
                Pronoun {
                    form,
                    speaker,
                    gender,
                    number,
                },
            );
        }
    }
    table
});

// ============================================================================
// NAME GAZETTEER
// ============================================================================

const MALE_NAMES: &[&str] = &[
    "barack", "bill", "bob", "charles", "david", "george", "jack", "james", "john", "joseph",
    "mark", "michael", "paul", "peter", "richard", "robert", "steven", "thomas", "tom", "william",
];

const FEMALE_NAMES: &[&str] = &[
    "alice", "anna", "barbara", "carol", "elizabeth", "emma", "hillary", "jennifer", "jessica",
    "julia", "karen", "kate", "laura", "linda", "lisa", "mary", "michelle", "nancy", "sarah",
    "susan",
];

const EITHER_NAMES: &[&str] = &["alex", "chris", "jordan", "pat", "sam", "taylor"];

static NAMES: Lazy<HashMap<&'static str, Gender>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.extend(MALE_NAMES.iter().map(|&n| (n, Gender::Male)));
    table.extend(FEMALE_NAMES.iter().map(|&n| (n, Gender::Female)));
    table.extend(EITHER_NAMES.iter().map(|&n| (n, Gender::Either)));
    table
});

/// Gender of a gloss whose first word is a capitalized, listed first name.
pub fn lookup_name(gloss: &str) -> Option<Gender> {
    let first = gloss.split_whitespace().next()?;
    if !first.chars().next().map_or(false, char::is_uppercase) {
        return None;
    }
    NAMES.get(first.to_lowercase().as_str()).copied()
}

/// Returns true if the gloss starts with a known first name.
pub fn is_name(gloss: &str) -> bool {
    lookup_name(gloss).is_some()
}

/// Name gender of a gloss, `Neutral` when it is not a name.
pub fn name_gender(gloss: &str) -> Gender {
    lookup_name(gloss).unwrap_or(Gender::Neutral)
}
