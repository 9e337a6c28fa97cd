use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// A fenced tracker block located inside a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerBlock {
    /// The block body with fences and identifier stripped.
    pub body: String,
    /// Byte range of the whole fenced region in the source message.
    pub span: Range<usize>,
}

/// Finds every fenced code block whose info string names `identifier`.
///
/// Blocks with other languages (or none) are ignored; the caller feeds the
/// returned bodies to the parser and merger.
pub fn scan_blocks(message: &str, identifier: &str) -> Vec<TrackerBlock> {
    let parser = Parser::new_ext(message, Options::empty());

    let mut blocks = Vec::new();
    let mut current: Option<(Range<usize>, String)> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().unwrap_or("");
                if lang == identifier {
                    current = Some((range, String::new()));
                }
            }
            Event::Text(text) => {
                if let Some((_, body)) = current.as_mut() {
                    body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((span, body)) = current.take() {
                    blocks.push(TrackerBlock {
                        body: body.trim().to_string(),
                        span,
                    });
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Produces the chat text to display for a message. With `hide` set, every
/// tracker block is wrapped in a hidden span instead of being shown inline.
pub fn display_text(message: &str, identifier: &str, hide: bool) -> String {
    if !hide {
        return message.to_string();
    }

    let blocks = scan_blocks(message, identifier);
    if blocks.is_empty() {
        return message.to_string();
    }

    let mut out = String::with_capacity(message.len());
    let mut cursor = 0;
    for block in &blocks {
        out.push_str(&message[cursor..block.span.start]);
        out.push_str("<span style=\"display: none !important;\">");
        out.push_str(&message[block.span.clone()]);
        out.push_str("</span>");
        cursor = block.span.end;
    }
    out.push_str(&message[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const IDENT: &str = "sim-tracker";

    #[test]
    fn finds_identifier_tagged_fence() {
        let message = "Hello!\n\n```sim-tracker\n{\"ap\": 50}\n```\n\nBye.";
        let blocks = scan_blocks(message, IDENT);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "{\"ap\": 50}");
    }

    #[test]
    fn ignores_other_code_blocks() {
        let message = "```rust\nfn main() {}\n```\n\n```\nplain\n```";
        assert!(scan_blocks(message, IDENT).is_empty());
    }

    #[test]
    fn finds_every_matching_block_in_order() {
        let message = "```sim-tracker\nfirst: 1\n```\ntext\n```sim-tracker\nsecond: 2\n```";
        let blocks = scan_blocks(message, IDENT);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].body, "first: 1");
        assert_eq!(blocks[1].body, "second: 2");
    }

    #[test]
    fn no_blocks_in_plain_message() {
        assert!(scan_blocks("just words", IDENT).is_empty());
    }

    #[test]
    fn hidden_display_text_wraps_block() {
        let message = "Before\n\n```sim-tracker\nap: 1\n```\n\nAfter";
        let shown = display_text(message, IDENT, true);
        assert!(shown.contains("<span style=\"display: none !important;\">"));
        assert!(shown.contains("ap: 1"));
        assert!(shown.starts_with("Before"));
        assert!(shown.trim_end().ends_with("After"));
    }

    #[test]
    fn unhidden_display_text_is_unchanged() {
        let message = "Before ```sim-tracker\nap: 1\n``` after";
        assert_eq!(display_text(message, IDENT, false), message);
    }
}
