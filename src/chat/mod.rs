//! Chat application module for the interactive terminal client.
//!
//! This module provides the pieces the `palaver-chat` binary is assembled
//! from:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing for session control
//!
//! Conversation state lives in [`crate::ConversationController`] and output
//! goes through [`crate::render`].

mod commands;
mod config;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatArgsError, ChatConfig};
