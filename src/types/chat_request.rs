use serde::{Deserialize, Serialize};

/// Default value of the `source` tag sent with every request.
pub const DEFAULT_SOURCE: &str = "wechatwork";

/// Body of a POST to the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The text the user just submitted.
    pub text: String,

    /// Every prior message text of the conversation, including `text` itself.
    pub history: Vec<String>,

    /// Identifies the calling application to the endpoint.
    pub source: String,
}

impl ChatRequest {
    /// Creates a request with the default source tag.
    pub fn new<S: Into<String>>(text: S, history: Vec<String>) -> Self {
        Self {
            text: text.into(),
            history,
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    /// Replaces the source tag.
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let request = ChatRequest::new("hi", vec!["hi".to_string()]);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"text":"hi","history":["hi"],"source":"wechatwork"}"#
        );
    }

    #[test]
    fn custom_source() {
        let request = ChatRequest::new("hi", Vec::new()).with_source("terminal");
        assert_eq!(request.source, "terminal");
    }
}
