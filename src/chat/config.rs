//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::{ChatClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::error::Result;
use crate::store::JsonFileSessionStore;
use crate::types::{DEFAULT_SOURCE, Theme};

/// Command-line arguments for the palaver-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat service.
    #[arrrg(optional, "Chat service base URL (default: http://askapi.huaxincem.com/)", "URL")]
    pub endpoint: Option<String>,

    /// Credential sent in the Authorization header.
    #[arrrg(optional, "API key (default: $PALAVER_API_KEY)", "KEY")]
    pub api_key: Option<String>,

    /// Source tag sent with every request.
    #[arrrg(optional, "Source tag sent with requests (default: wechatwork)", "NAME")]
    pub source: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 1000)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Where sessions are saved.
    #[arrrg(optional, "Sessions file (default: <data dir>/palaver/chat_sessions.json)", "PATH")]
    pub sessions: Option<String>,

    /// Initial color theme.
    #[arrrg(optional, "Color theme: dark or light (default: dark)", "THEME")]
    pub theme: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Error returned when command-line arguments cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatArgsError {
    message: String,
}

impl ChatArgsError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ChatArgsError {}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the chat service.
    pub endpoint: String,

    /// API key; `None` defers to the environment.
    pub api_key: Option<String>,

    /// Source tag sent with every request.
    pub source: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Path of the sessions file.
    pub sessions_path: PathBuf,

    /// Initial color theme.
    pub theme: Theme,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Endpoint: http://askapi.huaxincem.com/
    /// - Source: wechatwork
    /// - Timeout: 1000 seconds
    /// - Theme: dark
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            source: DEFAULT_SOURCE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            sessions_path: JsonFileSessionStore::default_path(),
            theme: Theme::default(),
            use_color: true,
        }
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the source tag.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the sessions file.
    pub fn with_sessions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sessions_path = path.into();
        self
    }

    /// Sets the initial theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Builds the HTTP client described by this configuration.
    pub fn client(&self) -> Result<ChatClient> {
        Ok(ChatClient::with_options(
            self.api_key.clone(),
            Some(self.endpoint.clone()),
            Some(self.timeout),
        )?
        .with_source(self.source.clone()))
    }

    /// Opens the session store described by this configuration.
    pub fn store(&self) -> JsonFileSessionStore {
        JsonFileSessionStore::new(&self.sessions_path)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = ChatArgsError;

    fn try_from(args: ChatArgs) -> std::result::Result<Self, Self::Error> {
        let defaults = ChatConfig::new();
        let theme = match args.theme {
            Some(theme) => theme.parse().map_err(ChatArgsError::new)?,
            None => defaults.theme,
        };
        if args.timeout_secs == Some(0) {
            return Err(ChatArgsError::new("--timeout-secs must be positive"));
        }
        Ok(ChatConfig {
            endpoint: args.endpoint.unwrap_or(defaults.endpoint),
            api_key: args.api_key,
            source: args.source.unwrap_or(defaults.source),
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            sessions_path: args
                .sessions
                .map(PathBuf::from)
                .unwrap_or(defaults.sessions_path),
            theme,
            use_color: !args.no_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.api_key.is_none());
        assert_eq!(config.source, "wechatwork");
        assert_eq!(config.timeout, Duration::from_secs(1000));
        assert!(config.sessions_path.ends_with("chat_sessions.json"));
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::try_from(ChatArgs::default()).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            endpoint: Some("http://localhost:8080/".to_string()),
            api_key: Some("key".to_string()),
            source: Some("terminal".to_string()),
            timeout_secs: Some(5),
            sessions: Some("/tmp/sessions.json".to_string()),
            theme: Some("light".to_string()),
            no_color: true,
        };
        let config = ChatConfig::try_from(args).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.source, "terminal");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.sessions_path, PathBuf::from("/tmp/sessions.json"));
        assert_eq!(config.theme, Theme::Light);
        assert!(!config.use_color);
    }

    #[test]
    fn config_rejects_unknown_theme() {
        let args = ChatArgs {
            theme: Some("neon".to_string()),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).is_err());
    }

    #[test]
    fn config_rejects_zero_timeout() {
        let args = ChatArgs {
            timeout_secs: Some(0),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::try_from(args).is_err());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_endpoint("http://example.com/")
            .with_api_key("k")
            .with_source("cli")
            .with_timeout(Duration::from_secs(9))
            .with_sessions_path("s.json")
            .with_theme(Theme::Light)
            .without_color();
        assert_eq!(config.endpoint, "http://example.com/");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.source, "cli");
        assert_eq!(config.timeout, Duration::from_secs(9));
        assert_eq!(config.sessions_path, PathBuf::from("s.json"));
        assert_eq!(config.theme, Theme::Light);
        assert!(!config.use_color);
        assert_eq!(config.client().unwrap().url().as_str(), "http://example.com/chat");
        assert_eq!(config.store().path(), PathBuf::from("s.json").as_path());
    }
}
