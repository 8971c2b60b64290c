//! Transcript rows, per-line tags and per-conversation reports.
//!
//! Everything here is a read-only projection of the loaded transcript:
//! rows are grouped into [`Conversation`]s, the tagger produces one
//! [`TagVector`] per row, and the aggregator folds tags into
//! [`ConversationReport`]s.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speaker of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Service representative ("manager" in the source data).
    Agent,
    /// The caller on the other side ("client").
    Customer,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role {0:?} (expected manager, agent, client or customer)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" | "agent" => Ok(Self::Agent),
            "client" | "customer" => Ok(Self::Customer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// One row of the input transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub conversation_id: String,
    pub role: Role,
    pub text: String,
    /// Row index in the source table.
    pub position: usize,
}

/// An agent line prepared for tagging: lower-cased, still pointing at its source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentUtterance {
    /// Index of the row in the slice passed to [`group_conversations`].
    pub slot: usize,
    pub position: usize,
    pub text: String,
}

/// Agent lines of one conversation in transcript order.
///
/// Order matters: the first line is where a greeting is searched from and the
/// last line is where a farewell is searched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: String,
    pub lines: Vec<AgentUtterance>,
}

/// Group transcript rows by conversation, keeping only agent lines.
///
/// Conversations come back in order of first appearance. A conversation whose
/// rows all belong to the customer is still returned, with no lines, so that
/// it gets a (failing) report row.
pub fn group_conversations(lines: &[TranscriptLine]) -> Vec<Conversation> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut conversations: Vec<Conversation> = Vec::new();

    for (row, line) in lines.iter().enumerate() {
        let slot = *index
            .entry(line.conversation_id.as_str())
            .or_insert_with(|| {
                conversations.push(Conversation {
                    id: line.conversation_id.clone(),
                    lines: Vec::new(),
                });
                conversations.len() - 1
            });

        if line.role == Role::Agent {
            conversations[slot].lines.push(AgentUtterance {
                slot: row,
                position: line.position,
                text: line.text.to_lowercase(),
            });
        }
    }

    conversations
}

/// Signals detected on a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagVector {
    pub greeting: bool,
    /// Extracted manager name, if the agent introduced themselves here.
    pub name: Option<String>,
    /// Extracted company name.
    pub company: Option<String>,
    pub farewell: bool,
}

impl TagVector {
    /// The agent introduced themselves on this line.
    pub fn self_represented(&self) -> bool {
        self.name.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.greeting && !self.farewell && self.name.is_none() && self.company.is_none()
    }
}

/// A tagged row as seen by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedLine {
    pub conversation_id: String,
    pub tags: TagVector,
}

/// Per-conversation compliance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationReport {
    pub conversation_id: String,
    pub greeting_count: u64,
    pub name_count: u64,
    pub self_represented_count: u64,
    pub company_count: u64,
    pub farewell_count: u64,
    /// First extracted name in line order.
    pub extracted_manager_name: Option<String>,
    /// First extracted company in line order.
    pub extracted_company_name: Option<String>,
    pub compliance_passed: bool,
}

impl ConversationReport {
    /// An all-zero report for a conversation with nothing detected.
    pub fn empty(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            greeting_count: 0,
            name_count: 0,
            self_represented_count: 0,
            company_count: 0,
            farewell_count: 0,
            extracted_manager_name: None,
            extracted_company_name: None,
            compliance_passed: false,
        }
    }
}
