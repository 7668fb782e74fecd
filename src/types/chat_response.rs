use serde::{Deserialize, Serialize};

/// Decoded body of a successful chat endpoint response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The reply text; the endpoint may omit it or send an empty string.
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatResponse {
    /// Creates a response carrying the given reply.
    pub fn new<S: Into<String>>(response: S) -> Self {
        Self {
            response: Some(response.into()),
        }
    }

    /// Returns the reply text when present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }
}
