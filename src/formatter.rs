//! Turning raw bot replies into display nodes.
//!
//! A reply is formatted by three passes, each consuming the output of the one
//! before it:
//!
//! 1. [`strip_emphasis`] removes `**bold**` markers and keeps their text.
//! 2. [`split_fences`] cuts the text into plain segments and fenced code blocks.
//! 3. [`extract_list`] turns each plain segment into either a paragraph or an
//!    ordered list.
//!
//! Each pass is one precompiled regular expression held by [`ReplyFormatter`].
//!
//! The list pass is narrow. An item body ends at the first ASCII
//! digit, so `1. Buy 2 apples` yields the item `Buy` followed by trailing text
//! `2 apples`. Only the text before the first marker and the text after the
//! last item survive around a list; plain text sitting between two items is
//! dropped.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::DisplayNode;

/// `**inner**` with no line or paragraph separator inside.
const EMPHASIS_PATTERN: &str = r"\*\*([^\n\r\x{2028}\x{2029}]*?)\*\*";

/// Three backticks, an ASCII word tag, a newline, then the body up to the next fence.
const FENCE_PATTERN: &str = r"(?s)```([A-Za-z0-9_]*)\n(.*?)```";

/// A `1.`, `1)` or `（1）` marker, one optional space, and a digit-free body.
const LIST_ITEM_PATTERN: &str = r"(?:[0-9]+\.|[0-9]+\)|（[0-9]+）)[\s\x{FEFF}]?([^0-9]+)";

/// A piece of a reply after fenced code has been cut out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any code fence.
    Text(&'a str),

    /// The contents of one fenced block.
    Code {
        /// Language tag from the opening fence; empty when absent.
        language: &'a str,
        /// Everything between the opening line and the closing fence.
        code: &'a str,
    },
}

/// Formats replies with one precompiled regex per pass.
#[derive(Debug, Clone)]
pub struct ReplyFormatter {
    emphasis_regex: Regex,
    fence_regex: Regex,
    list_item_regex: Regex,
}

impl Default for ReplyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyFormatter {
    /// Creates a formatter with precompiled regexes.
    pub fn new() -> Self {
        Self {
            emphasis_regex: Regex::new(EMPHASIS_PATTERN).expect("emphasis regex must compile"),
            fence_regex: Regex::new(FENCE_PATTERN).expect("fence regex must compile"),
            list_item_regex: Regex::new(LIST_ITEM_PATTERN).expect("list item regex must compile"),
        }
    }

    /// The process-wide formatter behind the free functions.
    pub fn shared() -> &'static ReplyFormatter {
        static CACHED: OnceLock<ReplyFormatter> = OnceLock::new();
        CACHED.get_or_init(ReplyFormatter::new)
    }

    /// Formats a raw reply into display nodes, in document order.
    pub fn format(&self, raw: &str) -> Vec<DisplayNode> {
        let cleaned = self.strip_emphasis(raw);
        self.split_fences(&cleaned)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => self.extract_list(text),
                Segment::Code { language, code } => DisplayNode::code_block(language, code),
            })
            .collect()
    }

    /// Replaces every `**inner**` span with `inner`.
    pub fn strip_emphasis(&self, text: &str) -> String {
        self.emphasis_regex.replace_all(text, "$1").into_owned()
    }

    /// Splits text into plain segments and fenced code blocks.
    pub fn split_fences<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut emitted = 0;
        for caps in self.fence_regex.captures_iter(text) {
            let (Some(whole), Some(language), Some(code)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if whole.start() > emitted {
                segments.push(Segment::Text(&text[emitted..whole.start()]));
            }
            segments.push(Segment::Code {
                language: language.as_str(),
                code: code.as_str(),
            });
            emitted = whole.end();
        }
        if emitted < text.len() {
            segments.push(Segment::Text(&text[emitted..]));
        }
        segments
    }

    /// Turns one plain segment into an ordered list, or a paragraph if it
    /// holds no list markers.
    pub fn extract_list(&self, text: &str) -> DisplayNode {
        let mut items = Vec::new();
        let mut first_marker = None;
        let mut cursor = 0;
        for caps in self.list_item_regex.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            first_marker.get_or_insert(whole.start());
            items.push(body.as_str().trim_matches(is_space).to_string());
            cursor = whole.end();
        }
        match first_marker {
            None => DisplayNode::paragraph(text),
            Some(start) => DisplayNode::OrderedList {
                items,
                leading: text[..start].to_string(),
                trailing: (cursor < text.len()).then(|| text[cursor..].to_string()),
            },
        }
    }
}

/// Formats a raw reply into display nodes, in document order.
///
/// Empty input yields no nodes.
///
/// # Examples
///
/// ```
/// use palaver::{DisplayNode, format_reply};
///
/// let nodes = format_reply("```js\nconsole.log(1)\n```");
/// assert_eq!(nodes, vec![DisplayNode::code_block("js", "console.log(1)\n")]);
/// ```
pub fn format_reply(raw: &str) -> Vec<DisplayNode> {
    ReplyFormatter::shared().format(raw)
}

/// Replaces every `**inner**` span with `inner`.
///
/// Spans pair left to right and take the shortest closer. A closer must sit on
/// the same line as its opener; an opener without one is left alone.
pub fn strip_emphasis(text: &str) -> String {
    ReplyFormatter::shared().strip_emphasis(text)
}

/// Splits text into plain segments and fenced code blocks.
///
/// An opening fence is three backticks, an optional tag of ASCII word
/// characters, and a newline. The block ends at the next three backticks.
/// Empty text between adjacent blocks is not emitted.
pub fn split_fences(text: &str) -> Vec<Segment<'_>> {
    ReplyFormatter::shared().split_fences(text)
}

/// Turns one plain segment into an ordered list, or a paragraph if it holds
/// no list markers.
///
/// A marker is `<digits>.`, `<digits>)` or `（<digits>）`, followed by at most
/// one whitespace character. The item body is every following character up to
/// the next ASCII digit and is trimmed.
pub fn extract_list(text: &str) -> DisplayNode {
    ReplyFormatter::shared().extract_list(text)
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str], leading: &str, trailing: Option<&str>) -> DisplayNode {
        DisplayNode::OrderedList {
            items: items.iter().map(|s| s.to_string()).collect(),
            leading: leading.to_string(),
            trailing: trailing.map(str::to_string),
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(format_reply("").is_empty());
    }

    #[test]
    fn plain_text_is_one_paragraph() {
        let text = "Hello there, how can I help?\nAsk me anything.";
        assert_eq!(format_reply(text), vec![DisplayNode::paragraph(text)]);
    }

    #[test]
    fn digits_without_markers_stay_a_paragraph() {
        let text = "It costs 42 dollars, or 3,50 euros";
        assert_eq!(format_reply(text), vec![DisplayNode::paragraph(text)]);
    }

    #[test]
    fn strip_single_emphasis() {
        assert_eq!(strip_emphasis("a **bold** move"), "a bold move");
    }

    #[test]
    fn strip_multiple_emphasis_pairs() {
        assert_eq!(strip_emphasis("**one** and **two**"), "one and two");
    }

    #[test]
    fn emphasis_takes_shortest_closer() {
        assert_eq!(strip_emphasis("**a** b **c**"), "a b c");
        assert_eq!(strip_emphasis("****"), "");
        assert_eq!(strip_emphasis("***a**"), "*a");
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        assert_eq!(strip_emphasis("**a\nb**"), "**a\nb**");
        assert_eq!(strip_emphasis("x **a\nb** c**"), "x **a\nb c");
    }

    #[test]
    fn emphasis_does_not_span_carriage_returns() {
        assert_eq!(strip_emphasis("\t**a（（\r**."), "\t**a（（\r**.");
        assert_eq!(strip_emphasis("**a\u{2028}b**"), "**a\u{2028}b**");
        assert_eq!(
            format_reply("\t**a（（\r**.\nb c2）\t"),
            vec![DisplayNode::paragraph("\t**a（（\r**.\nb c2）\t")]
        );
    }

    #[test]
    fn byte_order_mark_counts_as_marker_space() {
        assert_eq!(
            extract_list("1.\u{feff}item"),
            list(&["item"], "", None)
        );
    }

    #[test]
    fn formatter_instance_matches_free_functions() {
        let formatter = ReplyFormatter::default();
        let text = "Plan:\n1. **a** 2. b\n```\nx\n```";
        assert_eq!(formatter.format(text), format_reply(text));
    }

    #[test]
    fn unpaired_emphasis_is_kept() {
        assert_eq!(strip_emphasis("2 ** 3"), "2 ** 3");
    }

    #[test]
    fn code_block_with_language() {
        assert_eq!(
            format_reply("```js\nconsole.log(1)\n```"),
            vec![DisplayNode::code_block("js", "console.log(1)\n")]
        );
    }

    #[test]
    fn code_block_without_language() {
        assert_eq!(
            split_fences("```\nls -la\n```"),
            vec![Segment::Code {
                language: "",
                code: "ls -la\n"
            }]
        );
    }

    #[test]
    fn fence_needs_newline_after_tag() {
        let text = "inline ```code``` here";
        assert_eq!(split_fences(text), vec![Segment::Text(text)]);
    }

    #[test]
    fn unterminated_fence_is_text() {
        let text = "```rust\nfn main() {}";
        assert_eq!(split_fences(text), vec![Segment::Text(text)]);
    }

    #[test]
    fn text_around_code_blocks_keeps_order() {
        let text = "Try this:\n```py\nprint(1)\n```\n```sh\necho\n```Done.";
        assert_eq!(
            split_fences(text),
            vec![
                Segment::Text("Try this:\n"),
                Segment::Code {
                    language: "py",
                    code: "print(1)\n"
                },
                Segment::Text("\n"),
                Segment::Code {
                    language: "sh",
                    code: "echo\n"
                },
                Segment::Text("Done."),
            ]
        );
    }

    #[test]
    fn adjacent_code_blocks_emit_no_empty_text() {
        let text = "```a\nx\n``````b\ny\n```";
        assert_eq!(
            split_fences(text),
            vec![
                Segment::Code {
                    language: "a",
                    code: "x\n"
                },
                Segment::Code {
                    language: "b",
                    code: "y\n"
                },
            ]
        );
    }

    #[test]
    fn list_items_stop_at_next_digit() {
        assert_eq!(
            format_reply("1. Buy milk 2. Buy eggs"),
            vec![list(&["Buy milk", "Buy eggs"], "", None)]
        );
    }

    #[test]
    fn list_item_truncated_mid_sentence() {
        assert_eq!(
            extract_list("1. Buy 2 apples"),
            list(&["Buy"], "", Some("2 apples"))
        );
    }

    #[test]
    fn list_with_leading_text() {
        assert_eq!(
            extract_list("Steps:\n1) open\n2) close"),
            list(&["open", "close"], "Steps:\n", None)
        );
    }

    #[test]
    fn full_width_marker() {
        assert_eq!(
            extract_list("说明（1）打开文件"),
            list(&["打开文件"], "说明", None)
        );
    }

    #[test]
    fn full_width_item_swallows_next_open_paren() {
        // The body runs to the next digit, which sits inside the next marker.
        assert_eq!(
            extract_list("步骤：（1）打开（2）关闭"),
            list(&["打开（"], "步骤：", Some("2）关闭"))
        );
    }

    #[test]
    fn text_between_items_is_dropped() {
        assert_eq!(
            extract_list("1. alpha 7x beta 3. gamma"),
            list(&["alpha", "gamma"], "", None)
        );
    }

    #[test]
    fn marker_followed_by_digit_is_not_an_item() {
        assert_eq!(extract_list("1.5 liters"), DisplayNode::paragraph("1.5 liters"));
    }

    #[test]
    fn marker_at_end_is_not_an_item() {
        assert_eq!(extract_list("see section 4."), DisplayNode::paragraph("see section 4."));
    }

    #[test]
    fn lone_whitespace_body_becomes_empty_item() {
        assert_eq!(
            extract_list("1. 2. two"),
            list(&["", "two"], "", None)
        );
    }

    #[test]
    fn emphasis_inside_list_items_is_stripped() {
        assert_eq!(
            format_reply("1. **Milk** 2. **Eggs**"),
            vec![list(&["Milk", "Eggs"], "", None)]
        );
    }

    #[test]
    fn lists_and_code_interleave() {
        let text = "Do:\n1. install\n```sh\ncargo build\n```\nThen enjoy.";
        assert_eq!(
            format_reply(text),
            vec![
                list(&["install"], "Do:\n", None),
                DisplayNode::code_block("sh", "cargo build\n"),
                DisplayNode::paragraph("\nThen enjoy."),
            ]
        );
    }
}
