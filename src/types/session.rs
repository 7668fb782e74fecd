use serde::{Deserialize, Serialize};

use crate::types::Message;

/// How many characters of the first message make up a session title.
const TITLE_CHARS: usize = 10;

/// Title shown for a session that has no messages yet.
pub const EMPTY_SESSION_TITLE: &str = "Empty session";

/// One saved conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// The conversation so far, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Creates a session holding the given messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Returns true if nothing has been said in this session.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns a short label for listing sessions.
    ///
    /// The label is the first ten characters of the first message followed by
    /// an ellipsis.
    pub fn title(&self) -> String {
        match self.messages.first() {
            Some(first) => {
                let head: String = first.text.chars().take(TITLE_CHARS).collect();
                format!("{head}...")
            }
            None => EMPTY_SESSION_TITLE.to_string(),
        }
    }
}
