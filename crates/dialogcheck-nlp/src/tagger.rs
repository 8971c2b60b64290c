//! Per-line signal extraction over a conversation's agent lines.
//!
//! Four independent scans run over the same ordered lines:
//!
//! 1. **Greeting**: forward from the first line; only the first match is tagged.
//! 2. **Farewell**: backward from the last line; only the last match is tagged.
//! 3. **Name**: every line, via [`NameGrammar`].
//! 4. **Company**: every line; the known-company lookup first, then
//!    [`CompanyGrammar`] only when the lookup misses.
//!
//! A line without a match simply gets no tag for that signal.

use std::sync::Arc;

use dialogcheck_core::{
    AgentUtterance, Conversation, TagVector, TaggedLine, TranscriptLine, group_conversations,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::TaggerConfig;
use crate::error::ConfigError;
use crate::grammar::{CompanyGrammar, NameGrammar};
use crate::morphology::{LexiconMorphology, Morphology};
use crate::patterns::PatternMatcher;

/// Compiled patterns and grammars, shared read-only across conversations.
#[derive(Debug, Clone)]
pub struct DialogueTagger {
    patterns: PatternMatcher,
    names: NameGrammar,
    companies: CompanyGrammar,
}

impl DialogueTagger {
    /// Build a tagger backed by [`LexiconMorphology`] extended with the
    /// config's extra names and organizations.
    pub fn new(config: &TaggerConfig) -> Result<Self, ConfigError> {
        let mut morphology = LexiconMorphology::new();
        morphology.extend_names(config.names.iter().map(String::as_str));
        morphology.extend_organizations(config.organizations.iter().map(String::as_str));
        debug!(names = morphology.name_count(), "loaded name lexicon");
        Self::with_morphology(config, Arc::new(morphology))
    }

    /// Build a tagger with a caller-supplied morphology backend.
    pub fn with_morphology(
        config: &TaggerConfig,
        morphology: Arc<dyn Morphology>,
    ) -> Result<Self, ConfigError> {
        let patterns = PatternMatcher::new(
            &config.greeting_pattern,
            &config.farewell_pattern,
            &config.known_companies,
        )?;
        if !patterns.has_known_companies() {
            debug!("no known companies configured, using the company grammar only");
        }
        Ok(Self {
            patterns,
            names: NameGrammar::new(Arc::clone(&morphology)),
            companies: CompanyGrammar::new(morphology),
        })
    }

    /// One tag vector per agent line, index-aligned with `conversation.lines`.
    pub fn tag_conversation(&self, conversation: &Conversation) -> Vec<TagVector> {
        let lines = &conversation.lines;
        let mut tags = vec![TagVector::default(); lines.len()];

        if let Some(i) = self.first_greeting(lines) {
            tags[i].greeting = true;
        }
        if let Some(i) = self.last_farewell(lines) {
            tags[i].farewell = true;
        }
        for (tag, line) in tags.iter_mut().zip(lines) {
            tag.name = self.extract_name(&line.text);
            tag.company = self.extract_company(&line.text);
        }

        debug!(
            conversation = %conversation.id,
            lines = lines.len(),
            greeting = tags.iter().any(|t| t.greeting),
            farewell = tags.iter().any(|t| t.farewell),
            "tagged conversation"
        );
        tags
    }

    /// Index of the first line containing a greeting.
    fn first_greeting(&self, lines: &[AgentUtterance]) -> Option<usize> {
        for (i, line) in lines.iter().enumerate() {
            if self.patterns.matches_greeting(&line.text) {
                return Some(i);
            }
        }
        None
    }

    /// Index of the last line containing a farewell.
    fn last_farewell(&self, lines: &[AgentUtterance]) -> Option<usize> {
        for (i, line) in lines.iter().enumerate().rev() {
            if self.patterns.matches_farewell(&line.text) {
                return Some(i);
            }
        }
        None
    }

    /// Manager name introduced on this line, if any.
    pub fn extract_name(&self, line: &str) -> Option<String> {
        self.names.find(line).map(|m| m.into_text())
    }

    /// Company mentioned on this line. A known company always wins over the
    /// grammar, even when the grammar would also match.
    pub fn extract_company(&self, line: &str) -> Option<String> {
        if let Some(known) = self.patterns.lookup_known_company(line) {
            return Some(known.to_string());
        }
        self.companies.find(line).map(|m| m.into_text())
    }

    /// Tag a whole transcript: one tag vector per row, aligned with `lines`.
    ///
    /// Customer rows get the default (empty) tags. Conversations are tagged in
    /// parallel; the result does not depend on scheduling.
    pub fn extract(&self, lines: &[TranscriptLine]) -> Vec<TagVector> {
        let conversations = group_conversations(lines);
        let tagged: Vec<Vec<TagVector>> = conversations
            .par_iter()
            .map(|conversation| self.tag_conversation(conversation))
            .collect();

        let mut out = vec![TagVector::default(); lines.len()];
        for (conversation, tags) in conversations.iter().zip(tagged) {
            for (utterance, tag) in conversation.lines.iter().zip(tags) {
                out[utterance.slot] = tag;
            }
        }

        info!(
            rows = lines.len(),
            conversations = conversations.len(),
            "extracted dialogue tags"
        );
        out
    }

    /// Like [`extract`](Self::extract), paired with each row's conversation id.
    pub fn tag_lines(&self, lines: &[TranscriptLine]) -> Vec<TaggedLine> {
        lines
            .iter()
            .zip(self.extract(lines))
            .map(|(line, tags)| TaggedLine {
                conversation_id: line.conversation_id.clone(),
                tags,
            })
            .collect()
    }
}
