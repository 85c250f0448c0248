// src/strategy/prose.rs
//
// Paragraph-first greedy packing (spec §4.5), shared by the fallback
// strategy and by the prose segments that code-aware and structural leave
// between/inside atomic regions. Grounded on the teacher's
// `RecursiveCharacterSplitter::chunk`, generalized to the spec's explicit
// paragraph-then-oversize-tolerance-then-split algorithm.

use crate::analysis::is_list_item_start;
use crate::chunk::ContentType;
use crate::config::Config;
use crate::strategy::boundary::split_text;

/// A packed piece of prose, not yet wrapped in a `Chunk`: content plus its
/// 1-based line span in the original document, and whether it was kept
/// oversize to preserve the source section's integrity.
pub struct ProseDraft {
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub content_type: ContentType,
    pub oversize: bool,
}

struct Paragraph<'a> {
    lines: &'a [&'a str],
    start_line: usize,
    end_line: usize,
}

/// Split `lines` (a slice of the document, `lines[0]` is `first_line_no`)
/// into blank-line-delimited paragraphs, recording each one's line span.
fn split_paragraphs<'a>(lines: &'a [&'a str], first_line_no: usize) -> Vec<Paragraph<'a>> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                paragraphs.push(Paragraph {
                    lines: &lines[s..i],
                    start_line: first_line_no + s,
                    end_line: first_line_no + i - 1,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        paragraphs.push(Paragraph {
            lines: &lines[s..],
            start_line: first_line_no + s,
            end_line: first_line_no + lines.len() - 1,
        });
    }
    paragraphs
}

fn classify(content: &str) -> ContentType {
    let first_nonblank = content.lines().find(|l| !l.trim().is_empty());
    match first_nonblank {
        Some(l) if is_list_item_start(l) => ContentType::List,
        _ => ContentType::Text,
    }
}

/// Greedily pack paragraphs from `lines` into chunks no larger than
/// `config.max_chunk_size`, allowing a single paragraph to push a chunk up
/// to `config.effective_max()` before forcing a new one, and splitting any
/// paragraph that alone exceeds `max_chunk_size` via boundary splitting
/// (spec §4.5).
pub fn pack_prose(lines: &[&str], first_line_no: usize, config: &Config) -> Vec<ProseDraft> {
    let paragraphs = split_paragraphs(lines, first_line_no);
    let mut drafts = Vec::new();

    let mut buffer = String::new();
    let mut buf_start = 0usize;
    let mut buf_end = 0usize;

    let flush = |buffer: &mut String, buf_start: usize, buf_end: usize, drafts: &mut Vec<ProseDraft>| {
        if buffer.trim().is_empty() {
            return;
        }
        let oversize = buffer.chars().count() > config.max_chunk_size;
        drafts.push(ProseDraft {
            content: std::mem::take(buffer),
            start_line: buf_start,
            end_line: buf_end,
            content_type: classify(buffer),
            oversize,
        });
    };

    for p in &paragraphs {
        let text = p.lines.join("\n");
        let text_len = text.chars().count();
        let buf_len = buffer.chars().count();

        if buf_len == 0 {
            buf_start = p.start_line;
        }

        let would_be = if buf_len == 0 {
            text_len
        } else {
            buf_len + 2 + text_len // "\n\n" joiner
        };

        if would_be <= config.max_chunk_size {
            if buf_len > 0 {
                buffer.push_str("\n\n");
            }
            buffer.push_str(&text);
            buf_end = p.end_line;
        } else if would_be <= config.effective_max() {
            if buf_len > 0 {
                buffer.push_str("\n\n");
            }
            buffer.push_str(&text);
            buf_end = p.end_line;
            flush(&mut buffer, buf_start, buf_end, &mut drafts);
        } else {
            flush(&mut buffer, buf_start, buf_end, &mut drafts);

            if text_len > config.max_chunk_size {
                for piece in split_text(&text, config.max_chunk_size) {
                    let piece_lines = piece.matches('\n').count();
                    let piece_start = p.start_line;
                    let piece_end = (p.start_line + piece_lines).min(p.end_line);
                    drafts.push(ProseDraft {
                        content_type: classify(&piece),
                        content: piece,
                        start_line: piece_start,
                        end_line: piece_end,
                        oversize: false,
                    });
                }
            } else {
                buffer.push_str(&text);
                buf_start = p.start_line;
                buf_end = p.end_line;
            }
        }
    }
    flush(&mut buffer, buf_start, buf_end, &mut drafts);

    drafts
}
