//! Conversation state shared between the controller and the UI
//!
//! The transcript is append-only. Everything the presentation layer renders
//! (entries, busy flag, the text in the query box) lives here, and the
//! controller is the only writer of `entries` and `busy`.

use serde::{Deserialize, Serialize};

/// First entry of every conversation
pub const GREETING: &str = "Hello! I am your Log Analysis Bot. Ask me about errors in your logs.";

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            source: None,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            source: None,
        }
    }

    /// Content split into display lines. Blank lines are kept.
    pub fn display_lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<ConversationEntry>,
    pending_input: String,
    busy: bool,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: vec![ConversationEntry::bot(GREETING)],
            pending_input: String::new(),
            busy: false,
            revision: 0,
        }
    }

    pub fn append(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
        self.revision += 1;
    }

    pub fn set_busy(&mut self, flag: bool) {
        if self.busy != flag {
            self.busy = flag;
            self.revision += 1;
        }
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Bumped on every mutation, so a renderer can tell whether anything changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn pending_input_mut(&mut self) -> &mut String {
        &mut self.pending_input
    }

    pub fn take_pending_input(&mut self) -> String {
        std::mem::take(&mut self.pending_input)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
