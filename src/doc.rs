//! Fenced code-block extraction from CommonMark documents.
//!
//! Parsing is delegated to `pulldown-cmark`. CommonMark silently closes an
//! unterminated fence at the end of its container; here that is an error, so a
//! document with a forgotten closing fence does not swallow the rest of the file
//! into one block.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// First word of the fence info string, `None` when the fence has none.
    pub lang: Option<String>,
    /// Block contents with their line breaks.
    pub code: String,
    /// 1-based line of the opening fence.
    pub line: usize,
}

impl CodeBlock {
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("unterminated code block starting at line {0}")]
    Unterminated(usize),
}

/// Collect every fenced code block of `markdown` in document order.
/// Indented code blocks are ignored.
pub fn extract_code_blocks(markdown: &str) -> Result<Vec<CodeBlock>, DocError> {
    let mut blocks = Vec::new();
    let mut current: Option<CodeBlock> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let line = line_at(markdown, range.start);
                if !fence_is_closed(markdown, range) {
                    return Err(DocError::Unterminated(line));
                }
                current = Some(CodeBlock {
                    lang: info.split_whitespace().next().map(str::to_owned),
                    code: String::new(),
                    line,
                });
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    debug!(blocks = blocks.len(), "extracted code blocks");
    Ok(blocks)
}

#[inline]
fn line_at(text: &str, offset: usize) -> usize {
    memchr::memchr_iter(b'\n', &text.as_bytes()[..offset]).count() + 1
}

/// Strip the container prefix the opening fence had (blockquote markers,
/// list indentation) from a later line of the same block.
/// `None` when a blockquote marker is missing.
fn strip_container<'a>(line: &'a str, container: &str) -> Option<&'a str> {
    let mut rest = line;
    for c in container.chars() {
        if c == '>' {
            let trimmed = rest.trim_start_matches(' ');
            if rest.len() - trimmed.len() > 3 {
                return None;
            }
            rest = trimmed.strip_prefix('>')?;
        } else if let Some(next) = rest.strip_prefix([' ', '\t']) {
            rest = next;
        }
    }
    Some(rest)
}

/// `span` is the source range of a fenced block, opening fence included.
fn fence_is_closed(markdown: &str, span: Range<usize>) -> bool {
    let line_start = markdown[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let first_line = markdown[line_start..].lines().next().unwrap_or_default();
    let Some(fence_at) = first_line[span.start - line_start..]
        .find(['`', '~'])
        .map(|i| i + span.start - line_start)
    else {
        return false;
    };
    let (container, opening) = first_line.split_at(fence_at);
    let Some(fence) = opening.chars().next() else {
        return false;
    };
    let width = opening.chars().take_while(|&c| c == fence).count();

    markdown[span]
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .last()
        .and_then(|line| strip_container(line, container))
        .is_some_and(|closing| {
            let body = closing.trim_start_matches(' ');
            // Four spaces of indentation make the line code content.
            if closing.len() - body.len() > 3 {
                return false;
            }
            let run = body.chars().take_while(|&c| c == fence).count();
            run >= width && body[run..].trim().is_empty()
        })
}
