//! Logging trait for chat endpoint traffic.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! every request and response passing through the [`ChatClient`](crate::ChatClient).

use crate::types::{ChatRequest, ChatResponse};

/// A trait for logging chat client operations.
///
/// # Example
///
/// ```rust,ignore
/// use palaver::{ChatRequest, ChatResponse, ClientLogger};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, request: &ChatRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Request: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, response: &ChatResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    ///
    /// Called once per `send`, including sends that are later cancelled.
    fn log_request(&self, request: &ChatRequest);

    /// Log a successfully decoded response.
    fn log_response(&self, response: &ChatResponse);
}

/// Logs traffic through `tracing` at debug level.
///
/// Message bodies are only included at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingClientLogger;

impl ClientLogger for TracingClientLogger {
    fn log_request(&self, request: &ChatRequest) {
        tracing::debug!(
            source = %request.source,
            history = request.history.len(),
            chars = request.text.chars().count(),
            "chat request"
        );
        tracing::trace!(text = %request.text, "chat request body");
    }

    fn log_response(&self, response: &ChatResponse) {
        let text = response.text().unwrap_or_default();
        tracing::debug!(
            empty = text.is_empty(),
            chars = text.chars().count(),
            "chat response"
        );
        tracing::trace!(text = %text, "chat response body");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingLogger {
        seen: Mutex<Vec<String>>,
    }

    impl ClientLogger for RecordingLogger {
        fn log_request(&self, request: &ChatRequest) {
            self.seen.lock().unwrap().push(format!("> {}", request.text));
        }

        fn log_response(&self, response: &ChatResponse) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("< {}", response.text().unwrap_or("")));
        }
    }

    #[test]
    fn logger_is_object_safe() {
        let logger: Box<dyn ClientLogger> = Box::new(RecordingLogger::default());
        logger.log_request(&ChatRequest::new("hi", vec!["hi".to_string()]));
        logger.log_response(&ChatResponse::new("hello"));
    }

    #[test]
    fn recording_logger_sees_both_directions() {
        let logger = RecordingLogger::default();
        logger.log_request(&ChatRequest::new("hi", vec![]));
        logger.log_response(&ChatResponse::default());
        assert_eq!(*logger.seen.lock().unwrap(), vec!["> hi", "< "]);
    }

    #[test]
    fn tracing_logger_accepts_empty_response() {
        TracingClientLogger.log_response(&ChatResponse::default());
        TracingClientLogger.log_request(&ChatRequest::new("", vec![]));
    }
}
