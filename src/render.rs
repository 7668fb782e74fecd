//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction. The default
//! implementation formats bot replies with [`format_reply`] and draws the
//! resulting display nodes with ANSI escape codes picked by the active
//! [`Theme`].

use std::io::{self, Stdout, Write};

use crate::formatter::format_reply;
use crate::types::{DisplayNode, Message, MessageRole, Theme};

/// ANSI escape code for dim text.
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text.
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for blue text.
const ANSI_BLUE: &str = "\x1b[34m";

/// ANSI escape code for yellow text.
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text.
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text.
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for magenta text.
const ANSI_MAGENTA: &str = "\x1b[35m";

/// Label printed before user messages.
pub const USER_LABEL: &str = "You:";

/// Label printed before bot messages.
pub const BOT_LABEL: &str = "Bot:";

/// Styles applied to each part of a rendered conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Style of the user label.
    pub user: &'static str,
    /// Style of the bot label.
    pub bot: &'static str,
    /// Style of code block bodies.
    pub code: &'static str,
    /// Style of code fences and language tags.
    pub fence: &'static str,
    /// Style of list numbers.
    pub number: &'static str,
    /// Style of error messages.
    pub error: &'static str,
}

impl Palette {
    /// The palette for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                user: ANSI_CYAN,
                bot: ANSI_GREEN,
                code: ANSI_YELLOW,
                fence: ANSI_DIM,
                number: ANSI_MAGENTA,
                error: ANSI_RED,
            },
            Theme::Light => Palette {
                user: ANSI_BLUE,
                bot: ANSI_MAGENTA,
                code: ANSI_BLUE,
                fence: ANSI_DIM,
                number: ANSI_BOLD,
                error: ANSI_RED,
            },
        }
    }
}

/// Writes `nodes` to `out`, styled with `palette` when one is given.
pub fn render_nodes<W: Write>(
    out: &mut W,
    nodes: &[DisplayNode],
    palette: Option<&Palette>,
) -> io::Result<()> {
    for node in nodes {
        match node {
            DisplayNode::Paragraph { text } => write_line(out, text)?,
            DisplayNode::CodeBlock { language, code } => {
                styled(out, palette.map(|p| p.fence), &format!("```{language}"))?;
                writeln!(out)?;
                styled(out, palette.map(|p| p.code), code)?;
                if !code.is_empty() && !code.ends_with('\n') {
                    writeln!(out)?;
                }
                styled(out, palette.map(|p| p.fence), "```")?;
                writeln!(out)?;
            }
            DisplayNode::OrderedList {
                items,
                leading,
                trailing,
            } => {
                if !leading.trim().is_empty() {
                    write_line(out, leading)?;
                }
                for (index, item) in items.iter().enumerate() {
                    write!(out, "  ")?;
                    styled(out, palette.map(|p| p.number), &format!("{}.", index + 1))?;
                    writeln!(out, " {item}")?;
                }
                if let Some(trailing) = trailing {
                    write_line(out, trailing)?;
                }
            }
        }
    }
    Ok(())
}

/// Writes one message with its author label.
///
/// User text is shown verbatim; bot text goes through [`format_reply`].
pub fn render_message<W: Write>(
    out: &mut W,
    message: &Message,
    palette: Option<&Palette>,
) -> io::Result<()> {
    match message.role {
        MessageRole::User => {
            styled(out, palette.map(|p| p.user), USER_LABEL)?;
            writeln!(out, " {}", message.text)
        }
        MessageRole::Bot => {
            styled(out, palette.map(|p| p.bot), BOT_LABEL)?;
            writeln!(out)?;
            if message.pending {
                styled(out, palette.map(|_| ANSI_DIM), "...")?;
                writeln!(out)
            } else {
                render_nodes(out, &format_reply(&message.text), palette)
            }
        }
    }
}

fn styled<W: Write>(out: &mut W, style: Option<&str>, text: &str) -> io::Result<()> {
    match style {
        Some(style) => write!(out, "{style}{text}{ANSI_RESET}"),
        None => write!(out, "{text}"),
    }
}

fn write_line<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    if text.ends_with('\n') {
        write!(out, "{text}")
    } else {
        writeln!(out, "{text}")
    }
}

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Print a finalized or pending message.
    fn print_message(&mut self, message: &Message);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called when a request is abandoned by the user.
    fn print_interrupted(&mut self);

    /// Switches the color scheme for subsequent output.
    fn set_theme(&mut self, theme: Theme);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    palette: Palette,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            palette: Palette::for_theme(Theme::default()),
        }
    }

    fn palette(&self) -> Option<&Palette> {
        self.use_color.then_some(&self.palette)
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        let palette = self.palette().copied();
        let mut out = self.stdout.lock();
        let _ = render_message(&mut out, message, palette.as_ref());
        drop(out);
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{}Error: {error}{ANSI_RESET}", self.palette.error);
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn print_interrupted(&mut self) {
        println!("[interrupted]");
        self.flush();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.palette = Palette::for_theme(theme);
    }
}
