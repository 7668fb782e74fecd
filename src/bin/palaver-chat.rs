//! Interactive terminal client for the chat service.
//!
//! # Usage
//!
//! ```bash
//! # Key from the environment, default endpoint
//! PALAVER_API_KEY=... palaver-chat
//!
//! # Custom endpoint and a light terminal
//! palaver-chat --endpoint http://localhost:8080/ --theme light
//!
//! # Disable colors (useful for piping output)
//! palaver-chat --no-color
//! ```
//!
//! # Commands
//!
//! - `/new` - Start a new session
//! - `/sessions` - List saved sessions
//! - `/switch <n>` - Switch to a session
//! - `/history` - Show the current session
//! - `/theme [dark|light]` - Change the color theme
//! - `/help` - Show available commands
//! - `/quit` - Exit the application
//!
//! Ctrl+C while a reply is pending cancels the request; Ctrl+D exits.

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use palaver::chat::{
    ChatArgs, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, help_text, parse_command,
};
use palaver::{
    ChatClient, ConversationController, JsonFileSessionStore, TracingClientLogger, TurnOutcome,
};

type Controller = ConversationController<ChatClient, JsonFileSessionStore>;

/// Main entry point for the palaver-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("palaver-chat [OPTIONS]");
    let config = ChatConfig::try_from(args)?;

    let client = config.client()?.with_logger(Arc::new(TracingClientLogger));
    let store = config.store();
    tracing::info!(sessions = %store.path().display(), endpoint = %client.url(), "starting");

    let mut controller = ConversationController::new(client, store).with_theme(config.theme);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    renderer.set_theme(controller.theme());
    let mut rl = DefaultEditor::new()?;

    println!("Palaver (session {})", controller.active_session_index() + 1);
    println!("Type /help for commands, /quit to exit\n");
    for message in controller.messages() {
        renderer.print_message(message);
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                controller.set_draft(line.as_str());
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    controller.set_draft("");
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::NewSession => {
                            controller.start_new_session();
                            renderer.print_info(&format!(
                                "Started session {}.",
                                controller.active_session_index() + 1
                            ));
                        }
                        ChatCommand::ListSessions => print_sessions(&controller),
                        ChatCommand::Switch(index) => match controller.switch_session(index) {
                            Ok(()) => {
                                renderer.print_info(&format!("Switched to session {}.", index + 1));
                                for message in controller.messages() {
                                    renderer.print_message(message);
                                }
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::History => {
                            if controller.messages().is_empty() {
                                renderer.print_info("No messages yet.");
                            }
                            for message in controller.messages() {
                                renderer.print_message(message);
                            }
                        }
                        ChatCommand::Theme(theme) => {
                            let theme = match theme {
                                Some(theme) => {
                                    controller.set_theme(theme);
                                    theme
                                }
                                None => controller.toggle_theme(),
                            };
                            renderer.set_theme(theme);
                            renderer.print_info(&format!("Theme set to {theme}."));
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                run_turn(&mut controller, &mut renderer, line).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at the prompt discards the line.
                controller.set_draft("");
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    controller.cancel_pending();
    Ok(())
}

/// Sends one message and races the reply against Ctrl+C.
async fn run_turn(controller: &mut Controller, renderer: &mut PlainTextRenderer, text: &str) {
    let Some(turn) = controller.begin_turn(text) else {
        return;
    };
    if let Some(placeholder) = controller.messages().last() {
        renderer.print_message(placeholder);
    }

    let client = controller.client().clone();
    let result = tokio::select! {
        result = turn.dispatch(&client) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let outcome = match result {
        Some(result) => controller.finish_turn(turn.handle(), result),
        None => {
            controller.cancel_pending();
            TurnOutcome::Cancelled
        }
    };
    match outcome {
        TurnOutcome::Completed | TurnOutcome::Failed => {
            if let Some(reply) = controller.messages().last() {
                renderer.print_message(reply);
            }
        }
        TurnOutcome::Cancelled => renderer.print_interrupted(),
    }
}

fn print_sessions(controller: &Controller) {
    let sessions = controller.sessions();
    println!("    Sessions:");
    for (index, session) in sessions.iter().enumerate() {
        let marker = if index == controller.active_session_index() {
            "*"
        } else {
            " "
        };
        println!(
            "    {marker} {:>3}  {}  ({} messages)",
            index + 1,
            session.title(),
            session.messages.len()
        );
    }
}
