// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod controller;
pub mod error;
pub mod formatter;
pub mod observability;
pub mod render;
pub mod store;
pub mod types;

// Re-exports
pub use client::{API_KEY_ENV, ChatApiClient, ChatClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use client_logger::{ClientLogger, TracingClientLogger};
pub use controller::{
    ConversationController, ConversationState, ERROR_REPLY, NO_RESPONSE_REPLY, PendingTurn,
    RequestHandle, TurnOutcome, TurnStatus,
};
pub use error::{Error, Result};
pub use formatter::{ReplyFormatter, Segment, extract_list, format_reply, split_fences, strip_emphasis};
pub use observability::register_biometrics;
pub use render::{Palette, PlainTextRenderer, Renderer, render_message, render_nodes};
pub use store::{JsonFileSessionStore, MemorySessionStore, SESSIONS_FILE, SessionStore};
pub use types::*;
