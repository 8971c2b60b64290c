//! Morphological capability used by the phrase grammars.
//!
//! The grammars only need two things from morphology: the grammatical class
//! of a token and an inflection-insensitive key for comparing cue phrases.
//! [`Morphology`] is the seam; [`LexiconMorphology`] is a lookup-table
//! implementation for Russian that strips common inflectional endings instead
//! of consulting a full dictionary. First names are the exception: they match
//! only their own case forms, generated from the nominative ending, so short
//! names never swallow unrelated words ("дарья" does not match "дарю").
//! Forms with a fleeting vowel ("павел" / "павла") are not generated, so
//! recall on those is lower than with a real analyser.

use std::collections::HashSet;

/// Grammatical class of a token, as far as the grammars care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalClass {
    /// Personal first name.
    Name,
    /// Common noun.
    Noun,
    /// Organization name.
    Organization,
    Other,
}

/// Token classification and inflection-insensitive comparison.
pub trait Morphology: Send + Sync {
    /// Grammatical class of a single lower-case token.
    fn classify(&self, token: &str) -> GrammaticalClass;

    /// Inflection-independent key for a token. Two forms of the same word
    /// should map to the same key.
    fn normal_form(&self, token: &str) -> String;

    /// Whether `tokens` spell the cue phrase `cue`, given as normal forms.
    fn matches_cue_phrase(&self, tokens: &[&str], cue: &[String]) -> bool {
        tokens.len() == cue.len()
            && tokens
                .iter()
                .zip(cue)
                .all(|(token, expected)| self.normal_form(token) == *expected)
    }
}

/// Inflectional endings stripped by [`LexiconMorphology::normal_form`].
const ENDINGS: &[&str] = &[
    "иями", "ями", "ами", "ией", "ием", "иях", "иям", "ях", "ах", "ям", "ам", "ов", "ев", "ей",
    "ой", "ом", "ем", "ию", "ия", "ие", "ии", "ий", "ый", "ью", "ья", "ье", "а", "я", "о", "е",
    "ы", "и", "у", "ю", "ь",
];

/// A stem must keep at least this many characters after stripping.
const MIN_STEM: usize = 3;

/// Endings that mark verbs and adjectives rather than nouns.
const NON_NOUN_ENDINGS: &[&str] = &[
    "ться", "тся", "ть", "ешь", "ишь", "ете", "ите", "ый", "ий", "ая", "яя", "ые", "ого", "его",
    "ому", "ему", "ыми", "ими", "ых", "их",
];

/// Pronouns, prepositions, conjunctions, particles and call-centre filler.
const FUNCTION_WORDS: &[&str] = &[
    "я", "мы", "вы", "ты", "он", "она", "оно", "они", "меня", "мне", "вас", "вам", "нас", "нам",
    "его", "ее", "её", "их", "это", "этот", "эта", "эти", "тот", "та", "то", "те", "мой", "моя",
    "ваш", "ваша", "наш", "наша", "и", "а", "но", "или", "да", "нет", "не", "ни", "в", "во", "на",
    "с", "со", "к", "ко", "по", "из", "от", "до", "за", "для", "о", "об", "у", "при", "про",
    "без", "над", "под", "что", "как", "так", "уже", "ещё", "еще", "вот", "ну", "же", "ли", "бы",
    "тоже", "также", "здравствуйте", "привет", "приветствую", "пока", "свидания", "спасибо",
    "пожалуйста", "алло", "можно", "хорошо", "конечно", "сейчас", "сегодня", "звоню", "звонит",
    "говорит", "зовут", "беспокоит", "день", "вечер", "утро", "утром",
];

/// Common Russian first names, nominative.
const FIRST_NAMES: &[&str] = &[
    "александр", "алексей", "анатолий", "андрей", "антон", "артём", "артем", "борис", "вадим",
    "валерий", "василий", "виктор", "виталий", "владимир", "владислав", "вячеслав", "геннадий",
    "георгий", "григорий", "даниил", "денис", "дмитрий", "евгений", "егор", "иван", "игорь",
    "илья", "кирилл", "константин", "леонид", "максим", "михаил", "никита", "николай", "олег",
    "павел", "пётр", "петр", "роман", "руслан", "сергей", "станислав", "степан", "тимур",
    "фёдор", "федор", "юрий", "ярослав", "александра", "алина", "алла", "анастасия", "анна",
    "валентина", "валерия", "вера", "виктория", "галина", "дарья", "диана", "евгения",
    "екатерина", "елена", "елизавета", "жанна", "зоя", "инна", "ирина", "кристина", "ксения",
    "лариса", "лидия", "любовь", "людмила", "маргарита", "марина", "мария", "надежда",
    "наталья", "наталия", "нина", "оксана", "ольга", "полина", "светлана", "софия", "софья",
    "таисия", "тамара", "татьяна", "ульяна", "юлия", "яна",
];

/// Organization names recognised without a cue-independent lookup.
const ORGANIZATIONS: &[&str] = &[
    "сбербанк", "газпром", "мтс", "билайн", "мегафон", "ростелеком", "аэрофлот", "яндекс",
];

/// Fixed-form lookup table with suffix-stripping normalisation.
#[derive(Debug, Clone)]
pub struct LexiconMorphology {
    names: HashSet<String>,
    /// Every case form of every known name.
    name_forms: HashSet<String>,
    organizations: HashSet<String>,
    function_words: HashSet<&'static str>,
}

impl Default for LexiconMorphology {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconMorphology {
    /// Lexicon with the built-in name and organization tables.
    pub fn new() -> Self {
        let mut morph = Self {
            names: HashSet::new(),
            name_forms: HashSet::new(),
            organizations: HashSet::new(),
            function_words: FUNCTION_WORDS.iter().copied().collect(),
        };
        morph.extend_names(FIRST_NAMES.iter().copied());
        morph.extend_organizations(ORGANIZATIONS.iter().copied());
        morph
    }

    /// Add first names (nominative, any letter case) to the Name lexicon.
    pub fn extend_names<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            self.name_forms.extend(name_case_forms(&name));
            self.names.insert(name);
        }
    }

    /// Add organization names to the Organization lexicon.
    pub fn extend_organizations<'a>(&mut self, orgs: impl IntoIterator<Item = &'a str>) {
        for org in orgs {
            let key = stem(&org.trim().to_lowercase());
            if !key.is_empty() {
                self.organizations.insert(key);
            }
        }
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

impl Morphology for LexiconMorphology {
    fn classify(&self, token: &str) -> GrammaticalClass {
        let lower = token.to_lowercase();
        if lower.is_empty() || !lower.chars().all(|c| c.is_alphabetic() || c == '-') {
            return GrammaticalClass::Other;
        }

        if self.name_forms.contains(&lower) {
            return GrammaticalClass::Name;
        }
        if self.organizations.contains(&stem(&lower)) {
            return GrammaticalClass::Organization;
        }
        if self.function_words.contains(lower.as_str()) {
            return GrammaticalClass::Other;
        }
        if lower.chars().count() < 2 || NON_NOUN_ENDINGS.iter().any(|e| lower.ends_with(e)) {
            return GrammaticalClass::Other;
        }
        GrammaticalClass::Noun
    }

    fn normal_form(&self, token: &str) -> String {
        stem(&token.to_lowercase())
    }
}

/// Case forms of a nominative first name, built from its ending.
fn name_case_forms(name: &str) -> Vec<String> {
    let (base, endings): (&str, &[&str]) = if let Some(base) = name.strip_suffix('а') {
        (base, &["а", "ы", "и", "е", "у", "ой", "ою"])
    } else if let Some(base) = name.strip_suffix('я') {
        (base, &["я", "и", "е", "ю", "ей", "ею"])
    } else if let Some(base) = name.strip_suffix('й') {
        (base, &["й", "я", "ю", "ем", "е"])
    } else if let Some(base) = name.strip_suffix('ь') {
        (base, &["ь", "я", "ю", "ем", "е", "и", "ью"])
    } else {
        (name, &["", "а", "у", "ом", "е"])
    };
    endings.iter().map(|e| format!("{base}{e}")).collect()
}

/// Strip the longest known ending while keeping a stem of [`MIN_STEM`] chars.
fn stem(word: &str) -> String {
    let len = word.chars().count();
    if len <= MIN_STEM {
        return word.to_string();
    }

    let best = ENDINGS
        .iter()
        .filter(|ending| word.ends_with(*ending))
        .filter(|ending| len - ending.chars().count() >= MIN_STEM)
        .max_by_key(|ending| ending.len());

    match best {
        Some(ending) => word[..word.len() - ending.len()].to_string(),
        None => word.to_string(),
    }
}
