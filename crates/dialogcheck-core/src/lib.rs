pub mod schema;
pub mod transcript;

pub use schema::{columns, dialog};
pub use transcript::{
    AgentUtterance, Conversation, ConversationReport, Role, TagVector, TaggedLine,
    TranscriptLine, UnknownRole, group_conversations,
};
