use serde::{Deserialize, Serialize};

/// A structured unit of rendered reply content.
///
/// Display nodes are produced fresh by [`crate::format_reply`] and have no
/// identity beyond the call that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayNode {
    /// Plain text, shown verbatim.
    Paragraph {
        /// The text of the paragraph.
        text: String,
    },

    /// A fenced code block.
    CodeBlock {
        /// The language tag from the opening fence; empty when absent.
        language: String,
        /// The code, including its trailing newline.
        code: String,
    },

    /// A numbered list with the text that surrounds it.
    OrderedList {
        /// The item bodies, trimmed, in order.
        items: Vec<String>,
        /// Text before the first list marker; may be empty.
        leading: String,
        /// Text after the last item, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trailing: Option<String>,
    },
}

impl DisplayNode {
    /// Creates a paragraph node.
    pub fn paragraph<S: Into<String>>(text: S) -> Self {
        DisplayNode::Paragraph { text: text.into() }
    }

    /// Creates a code block node.
    pub fn code_block<L: Into<String>, C: Into<String>>(language: L, code: C) -> Self {
        DisplayNode::CodeBlock {
            language: language.into(),
            code: code.into(),
        }
    }
}
