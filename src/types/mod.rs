// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod display_node;
pub mod message;
pub mod session;
pub mod theme;

// Re-exports
pub use chat_request::{ChatRequest, DEFAULT_SOURCE};
pub use chat_response::ChatResponse;
pub use display_node::DisplayNode;
pub use message::{Message, MessageRole};
pub use session::{EMPTY_SESSION_TITLE, Session};
pub use theme::Theme;
