// src/analysis.rs
//
// The document analyzer (spec §4.1): a single linear scan that locates
// fenced code blocks, ATX headers and pipe tables, and computes the ratios
// and counts the strategy selector and strategies consume. Grounded on the
// teacher's `MarkdownParser` (chunker/hierarchy.rs), generalized from a
// chunk-producing walk into a pure structural summary.

use serde::{Deserialize, Serialize};

/// Which fence character opened a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FenceKind {
    Backtick,
    Tilde,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlockRecord {
    pub start_line: usize,
    pub end_line: usize,
    pub language: Option<String>,
    pub fence_kind: FenceKind,
    /// True when EOF was reached before a matching closing fence (spec §4.1).
    pub unterminated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    pub line: usize,
    pub level: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    pub start_line: usize,
    pub end_line: usize,
    pub column_count: usize,
}

/// Structural summary of a document, produced once per `chunk()` call and
/// threaded through unmodified (spec §4.1, §5).
#[derive(Debug, Clone)]
pub struct Analysis {
    pub total_chars: usize,
    pub total_lines: usize,
    pub code_ratio: f64,
    pub code_block_count: usize,
    pub header_count: usize,
    pub table_count: usize,
    pub list_count: usize,
    pub max_header_depth: usize,
    pub code_blocks: Vec<CodeBlockRecord>,
    pub headers: Vec<HeaderRecord>,
    pub tables: Vec<TableRecord>,
    pub has_preamble: bool,
    pub preamble_end_line: usize,
}

/// Analyze `text` (already normalized to `\n` line endings). Pure, never
/// fails on valid UTF-8; empty input yields zero counts and `total_lines=1`.
pub fn analyze(text: &str) -> Analysis {
    let lines: Vec<&str> = text.split('\n').collect();
    let total_lines = lines.len().max(1);
    let total_chars = text.chars().count();

    let mut code_blocks = Vec::new();
    let mut headers = Vec::new();
    let mut tables = Vec::new();
    let mut list_count = 0usize;
    let mut max_header_depth = 0usize;
    let mut code_char_total = 0usize;

    let mut i = 0usize;
    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;

        if let Some((kind, fence_len, language)) = detect_fence_open(line) {
            let start_line = line_no;
            let mut j = i + 1;
            let mut end_line = total_lines;
            let mut unterminated = true;
            while j < lines.len() {
                if is_fence_close(lines[j], kind, fence_len) {
                    end_line = j + 1;
                    unterminated = false;
                    j += 1;
                    break;
                }
                j += 1;
            }
            if unterminated {
                j = lines.len();
                end_line = total_lines;
            }
            let block_text = lines[(start_line - 1)..end_line].join("\n");
            code_char_total += block_text.chars().count();
            code_blocks.push(CodeBlockRecord {
                start_line,
                end_line,
                language,
                fence_kind: kind,
                unterminated,
            });
            i = j;
            continue;
        }

        if let Some((level, title)) = parse_atx_header(line) {
            headers.push(HeaderRecord {
                line: line_no,
                level,
                text: title,
            });
            max_header_depth = max_header_depth.max(level);
            i += 1;
            continue;
        }

        if is_table_row(line) && i + 1 < lines.len() && is_table_separator(lines[i + 1]) {
            let column_count = count_columns(line);
            let start_line = line_no;
            let mut j = i + 2;
            while j < lines.len() && is_table_row(lines[j]) && count_columns(lines[j]) == column_count
            {
                j += 1;
            }
            tables.push(TableRecord {
                start_line,
                end_line: j,
                column_count,
            });
            i = j;
            continue;
        }

        if is_list_item_start(line) {
            let mut j = i + 1;
            while j < lines.len() {
                let l = lines[j];
                if is_list_item_start(l) || l.starts_with("  ") || l.trim().is_empty() {
                    let blank_run_ends = l.trim().is_empty()
                        && j + 1 < lines.len()
                        && lines[j + 1].trim().is_empty();
                    j += 1;
                    if blank_run_ends {
                        break;
                    }
                } else {
                    break;
                }
            }
            list_count += 1;
            i = j;
            continue;
        }

        i += 1;
    }

    let code_ratio = if total_chars == 0 {
        0.0
    } else {
        code_char_total as f64 / total_chars as f64
    };

    let (has_preamble, preamble_end_line) = match headers.first() {
        None => (false, 0),
        Some(first) if first.line > 1 => (true, first.line - 1),
        Some(_) => (false, 0),
    };

    Analysis {
        total_chars,
        total_lines,
        code_ratio,
        code_block_count: code_blocks.len(),
        header_count: headers.len(),
        table_count: tables.len(),
        list_count,
        max_header_depth,
        code_blocks,
        headers,
        tables,
        has_preamble,
        preamble_end_line,
    }
}

fn strip_up_to_3_leading_spaces(line: &str) -> Option<&str> {
    let indent = line.chars().take_while(|&c| c == ' ').count();
    if indent > 3 {
        None
    } else {
        Some(&line[indent..])
    }
}

fn detect_fence_open(line: &str) -> Option<(FenceKind, usize, Option<String>)> {
    let stripped = strip_up_to_3_leading_spaces(line)?;
    let first = stripped.chars().next()?;
    let kind = match first {
        '`' => FenceKind::Backtick,
        '~' => FenceKind::Tilde,
        _ => return None,
    };
    let fence_len = stripped.chars().take_while(|&c| c == first).count();
    if fence_len < 3 {
        return None;
    }
    let rest = &stripped[fence_len..];
    Some((kind, fence_len, parse_fence_language(rest)))
}

fn is_fence_close(line: &str, kind: FenceKind, min_len: usize) -> bool {
    let stripped = match strip_up_to_3_leading_spaces(line) {
        Some(s) => s,
        None => return false,
    };
    let expected = match kind {
        FenceKind::Backtick => '`',
        FenceKind::Tilde => '~',
    };
    if stripped.chars().next() != Some(expected) {
        return false;
    }
    let len = stripped.chars().take_while(|&c| c == expected).count();
    len >= min_len && stripped[len..].trim().is_empty()
}

/// Extract and lower-case a fence's language identifier, e.g.
/// "rust,linenos" -> "rust", ignoring trailing fence metadata.
fn parse_fence_language(rest: &str) -> Option<String> {
    let trimmed = rest.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn parse_atx_header(line: &str) -> Option<(usize, String)> {
    let trimmed = strip_up_to_3_leading_spaces(line)?;
    let hash_count = trimmed.chars().take_while(|&c| c == '#').count();
    if hash_count == 0 || hash_count > 6 || trimmed.len() <= hash_count {
        return None;
    }
    let rest = &trimmed[hash_count..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let title = rest.trim().to_string();
    if title.is_empty() {
        return None;
    }
    Some((hash_count, title))
}

pub fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 1
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || !trimmed.contains('-') {
        return false;
    }
    trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn count_columns(line: &str) -> usize {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.is_empty() {
        0
    } else {
        inner.split('|').count()
    }
}

pub fn is_list_item_start(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("- ")
        || trimmed.starts_with("* ")
        || trimmed.starts_with("+ ")
        || is_ordered_list_start(trimmed)
}

fn is_ordered_list_start(line: &str) -> bool {
    let mut chars = line.chars().peekable();
    if !chars.peek().is_some_and(|c| c.is_numeric()) {
        return false;
    }
    while chars.peek().is_some_and(|c| c.is_numeric()) {
        chars.next();
    }
    if chars.next() != Some('.') {
        return false;
    }
    matches!(chars.next(), None | Some(' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_one_line_zero_counts() {
        let a = analyze("");
        assert_eq!(a.total_lines, 1);
        assert_eq!(a.total_chars, 0);
        assert_eq!(a.code_ratio, 0.0);
        assert_eq!(a.header_count, 0);
        assert_eq!(a.table_count, 0);
        assert!(!a.has_preamble);
    }

    #[test]
    fn detects_fenced_code_block_with_language() {
        let text = "intro\n\n```rust\nfn main() {}\n```\n\nmore";
        let a = analyze(text);
        assert_eq!(a.code_block_count, 1);
        let block = &a.code_blocks[0];
        assert_eq!(block.language.as_deref(), Some("rust"));
        assert_eq!(block.start_line, 3);
        assert_eq!(block.end_line, 5);
        assert!(!block.unterminated);
    }

    #[test]
    fn unterminated_fence_runs_to_eof() {
        let text = "```python\nprint(1)\n";
        let a = analyze(text);
        assert_eq!(a.code_block_count, 1);
        assert!(a.code_blocks[0].unterminated);
        assert_eq!(a.code_blocks[0].end_line, a.total_lines);
    }

    #[test]
    fn headers_build_max_depth_and_count() {
        let text = "# A\n\ntext\n\n## B\n\nmore\n\n### C\n";
        let a = analyze(text);
        assert_eq!(a.header_count, 3);
        assert_eq!(a.max_header_depth, 3);
        assert_eq!(a.headers[0].text, "A");
        assert_eq!(a.headers[1].level, 2);
    }

    #[test]
    fn detects_table_with_column_count() {
        let text = "| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |\n";
        let a = analyze(text);
        assert_eq!(a.table_count, 1);
        assert_eq!(a.tables[0].column_count, 3);
        assert_eq!(a.tables[0].start_line, 1);
        assert_eq!(a.tables[0].end_line, 4);
    }

    #[test]
    fn fence_takes_precedence_over_table_pattern() {
        // A line inside a fence that looks like a table separator must not
        // be mistaken for one (spec §4.1 ordering tie-break).
        let text = "```\n| --- | --- |\n```\n";
        let a = analyze(text);
        assert_eq!(a.table_count, 0);
        assert_eq!(a.code_block_count, 1);
    }

    #[test]
    fn preamble_detected_when_content_precedes_first_header() {
        let text = "intro text\n\n# Title\n\nbody";
        let a = analyze(text);
        assert!(a.has_preamble);
        assert_eq!(a.preamble_end_line, 2);
    }

    #[test]
    fn no_preamble_when_header_is_first_line() {
        let text = "# Title\n\nbody";
        let a = analyze(text);
        assert!(!a.has_preamble);
    }

    #[test]
    fn no_preamble_when_no_headers() {
        let text = "just text, no headers at all";
        let a = analyze(text);
        assert!(!a.has_preamble);
        assert_eq!(a.preamble_end_line, 0);
    }
}
