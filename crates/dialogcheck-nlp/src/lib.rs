//! Dialogue etiquette detection: greeting, self-introduction, company and farewell.

mod config;
mod error;
pub mod grammar;
pub mod morphology;
pub mod patterns;
pub mod report;
mod tagger;

pub use config::TaggerConfig;
pub use error::ConfigError;
pub use grammar::{CompanyGrammar, NameGrammar, PhraseGrammar, PhraseMatch};
pub use morphology::{GrammaticalClass, LexiconMorphology, Morphology};
pub use patterns::PatternMatcher;
pub use report::aggregate;
pub use tagger::DialogueTagger;
