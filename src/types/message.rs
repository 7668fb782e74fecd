use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Typed by the person at the keyboard.
    User,

    /// Returned by the chat endpoint (or synthesized on failure).
    Bot,
}

/// A single chat message.
///
/// A bot message starts life as a pending placeholder and is replaced in place
/// exactly once, when its turn completes or fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The message body.
    pub text: String,

    /// The author of the message. Files written by the web client call this `type`.
    #[serde(alias = "type")]
    pub role: MessageRole,

    /// True while the message is a placeholder for an in-flight response.
    #[serde(default, alias = "loading", skip_serializing_if = "is_false")]
    pub pending: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Message {
    /// Creates a finalized user message.
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            role: MessageRole::User,
            pending: false,
        }
    }

    /// Creates a finalized bot message.
    pub fn bot<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            role: MessageRole::Bot,
            pending: false,
        }
    }

    /// Creates the empty bot placeholder shown while a turn is in flight.
    pub fn placeholder() -> Self {
        Self {
            text: String::new(),
            role: MessageRole::Bot,
            pending: true,
        }
    }

    /// Returns true if this message was authored by the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
