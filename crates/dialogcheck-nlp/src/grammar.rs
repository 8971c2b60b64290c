//! Cue-phrase grammars for manager names and company names.
//!
//! A grammar matches a cue phrase ("меня зовут", "из компании", ...) that is
//! immediately followed by a token of an accepted grammatical class. Cue
//! comparison goes through [`Morphology`], so "компании" matches the cue
//! "компания". Only the first match in a line is reported.

use std::ops::Range;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::morphology::{GrammaticalClass, Morphology};

/// Self-introduction cues.
pub const NAME_CUES: &[&str] = &[
    "меня зовут",
    "это",
    "менеджер",
    "вам звонит",
    "вас беспокоит",
    "я",
    "говорит",
];

/// Organization cues.
pub const COMPANY_CUES: &[&str] = &[
    "компания",
    "из компании",
    "фирма",
    "из фирмы",
    "офис",
    "из офиса",
    "подразделение",
    "из подразделения",
    "компании",
    "из",
];

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+(?:-\w+)*").unwrap());

/// A cue phrase followed by an entity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    cue: String,
    text: String,
    span: Range<usize>,
}

impl PhraseMatch {
    /// The cue phrase as configured (not as written in the line).
    pub fn cue(&self) -> &str {
        &self.cue
    }

    /// Extracted entity text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range of the entity within the line.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[derive(Debug, Clone)]
struct Cue {
    phrase: String,
    /// Normal forms of the cue tokens.
    forms: Vec<String>,
}

/// Generic "cue + entity" grammar.
#[derive(Clone)]
pub struct PhraseGrammar {
    cues: Vec<Cue>,
    accepts: Vec<GrammaticalClass>,
    morphology: Arc<dyn Morphology>,
}

impl std::fmt::Debug for PhraseGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseGrammar")
            .field("cues", &self.cues.iter().map(|c| &c.phrase).collect::<Vec<_>>())
            .field("accepts", &self.accepts)
            .finish()
    }
}

impl PhraseGrammar {
    pub fn new<S: AsRef<str>>(
        cues: &[S],
        accepts: &[GrammaticalClass],
        morphology: Arc<dyn Morphology>,
    ) -> Self {
        let mut cues: Vec<Cue> = cues
            .iter()
            .map(|phrase| {
                let phrase = phrase.as_ref().trim().to_lowercase();
                let forms = tokenize(&phrase)
                    .map(|(_, word)| morphology.normal_form(word))
                    .collect();
                Cue { phrase, forms }
            })
            .filter(|cue: &Cue| !cue.forms.is_empty())
            .collect();
        // Longer cues first, so "из компании" is tried before "из".
        cues.sort_by(|a, b| b.forms.len().cmp(&a.forms.len()));

        Self {
            cues,
            accepts: accepts.to_vec(),
            morphology,
        }
    }

    /// First cue + accepted-entity sequence in `line`, scanning left to right.
    pub fn find(&self, line: &str) -> Option<PhraseMatch> {
        let tokens: Vec<(Range<usize>, &str)> = tokenize(line).collect();
        let words: Vec<&str> = tokens.iter().map(|(_, w)| *w).collect();

        for start in 0..tokens.len() {
            for cue in &self.cues {
                let next = start + cue.forms.len();
                if next >= tokens.len() {
                    continue;
                }
                if !self
                    .morphology
                    .matches_cue_phrase(&words[start..next], &cue.forms)
                {
                    continue;
                }

                let (span, entity) = &tokens[next];
                if self.accepts.contains(&self.morphology.classify(entity)) {
                    return Some(PhraseMatch {
                        cue: cue.phrase.clone(),
                        text: entity.to_string(),
                        span: span.clone(),
                    });
                }
            }
        }

        None
    }
}

/// Self-introduction grammar: name cue followed by a Name token.
#[derive(Debug, Clone)]
pub struct NameGrammar(PhraseGrammar);

impl NameGrammar {
    pub fn new(morphology: Arc<dyn Morphology>) -> Self {
        Self(PhraseGrammar::new(
            NAME_CUES,
            &[GrammaticalClass::Name],
            morphology,
        ))
    }

    pub fn find(&self, line: &str) -> Option<PhraseMatch> {
        self.0.find(line)
    }
}

/// Company grammar: organization cue followed by a Name, Noun or Organization token.
#[derive(Debug, Clone)]
pub struct CompanyGrammar(PhraseGrammar);

impl CompanyGrammar {
    pub fn new(morphology: Arc<dyn Morphology>) -> Self {
        Self(PhraseGrammar::new(
            COMPANY_CUES,
            &[
                GrammaticalClass::Name,
                GrammaticalClass::Noun,
                GrammaticalClass::Organization,
            ],
            morphology,
        ))
    }

    pub fn find(&self, line: &str) -> Option<PhraseMatch> {
        self.0.find(line)
    }
}

/// Word tokens with their byte ranges.
fn tokenize(line: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
    WORD_RE.find_iter(line).map(|m| (m.range(), m.as_str()))
}
