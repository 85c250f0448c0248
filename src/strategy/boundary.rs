// src/strategy/boundary.rs
//
// Universal boundary-splitting subroutine (spec §4.6), used by every
// strategy whenever a unit of prose exceeds `max_chunk_size`. Grounded on
// the teacher's `RecursiveCharacterSplitter` (chunker/recursive.rs), but
// reworked from a separator-list recursion into the spec's explicit
// priority order over character counts rather than estimated tokens.

/// Split `text` into pieces each no longer than `max_size` characters,
/// preferring paragraph, then sentence, then word boundaries before
/// falling back to a hard cut (spec §4.6). Each split keeps separator
/// whitespace attached to the left piece.
pub fn split_text(text: &str, max_size: usize) -> Vec<String> {
    if max_size == 0 {
        return vec![text.to_string()];
    }
    let mut pieces = Vec::new();
    let mut remaining = text;
    while char_len(remaining) > max_size {
        let cut = find_boundary(remaining, max_size);
        if cut == 0 || cut >= remaining.len() {
            // Nothing usable found; hard split at the code-point boundary.
            let hard = char_boundary_at(remaining, max_size);
            pieces.push(remaining[..hard].to_string());
            remaining = &remaining[hard..];
            continue;
        }
        pieces.push(remaining[..cut].to_string());
        remaining = &remaining[cut..];
    }
    if !remaining.is_empty() {
        pieces.push(remaining.to_string());
    }
    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `char_idx`-th character, or `text.len()` if there
/// are fewer than that many characters.
fn char_boundary_at(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Find the byte offset to split at, within the first `max_size`
/// characters of `text`, in spec §4.6 priority order.
fn find_boundary(text: &str, max_size: usize) -> usize {
    let cap = char_boundary_at(text, max_size);
    let prefix = &text[..cap];

    if let Some(pos) = prefix.rfind("\n\n") {
        if pos > 0 {
            return pos + "\n\n".len();
        }
    }

    if let Some(pos) = rfind_sentence_boundary(prefix) {
        if pos > 0 {
            return pos;
        }
    }

    if let Some((byte_pos, ch)) = prefix
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .next_back()
    {
        let end = byte_pos + ch.len_utf8();
        if end > 0 {
            return end;
        }
    }

    cap
}

/// Rightmost ". ", "! " or "? " within `text`; the returned offset is just
/// past the separating space, so it stays attached to the left piece.
fn rfind_sentence_boundary(text: &str) -> Option<usize> {
    [". ", "! ", "? "]
        .iter()
        .filter_map(|pat| text.rfind(pat).map(|pos| pos + pat.len()))
        .max()
}

/// Leftmost ". ", "! " or "? " within `text`; the returned offset is just
/// past the separating space, mirroring `rfind_sentence_boundary` but
/// scanning forward, for finding the nearest boundary at or after a point.
fn find_sentence_boundary(text: &str) -> Option<usize> {
    [". ", "! ", "? "]
        .iter()
        .filter_map(|pat| text.find(pat).map(|pos| pos + pat.len()))
        .min()
}

/// Suffix of `text` up to `target_size` characters, aligned to a sentence
/// boundary where possible (used by overlap, spec §4.7 item 3). Always a
/// literal substring of `text` — the boundary is located by offset within
/// `text` itself, never reconstructed from re-joined segments.
pub fn sentence_aligned_suffix(text: &str, target_size: usize) -> String {
    if target_size == 0 {
        return String::new();
    }
    let char_count = char_len(text);
    if char_count <= target_size {
        return text.to_string();
    }

    let naive_start = char_boundary_at(text, char_count - target_size);
    let window = &text[naive_start..];

    let start = if let Some(pos) = window.find("\n\n") {
        naive_start + pos + "\n\n".len()
    } else if let Some(pos) = find_sentence_boundary(window) {
        naive_start + pos
    } else if let Some((byte_pos, ch)) = window.char_indices().find(|(_, c)| c.is_whitespace()) {
        naive_start + byte_pos + ch.len_utf8()
    } else {
        naive_start
    };

    text[start..].to_string()
}

/// Prefix of `text` up to `target_size` characters, aligned to a sentence
/// boundary where possible (used by overlap's `next_content`, spec §4.7
/// item 3). Always a literal substring of `text`, via `find_boundary`'s own
/// priority search rather than reconstruction from segmented sentences.
pub fn sentence_aligned_prefix(text: &str, target_size: usize) -> String {
    if target_size == 0 {
        return String::new();
    }
    if char_len(text) <= target_size {
        return text.to_string();
    }

    let cut = find_boundary(text, target_size);
    let cut = if cut == 0 { char_boundary_at(text, target_size) } else { cut };
    text[..cut].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_not_split() {
        let pieces = split_text("hello world", 100);
        assert_eq!(pieces, vec!["hello world".to_string()]);
    }

    #[test]
    fn splits_at_paragraph_boundary() {
        let text = "First paragraph here.\n\nSecond paragraph that is a bit longer than the first.";
        let pieces = split_text(text, 30);
        assert!(pieces.len() >= 2);
        assert!(pieces[0].ends_with("\n\n"));
        for p in &pieces {
            assert!(p.chars().count() <= 30 || !p.contains(' '));
        }
    }

    #[test]
    fn splits_at_sentence_boundary_when_no_paragraph() {
        let text = "Sentence one is here. Sentence two is also here. Sentence three too.";
        let pieces = split_text(text, 25);
        assert!(pieces.len() > 1);
        assert!(pieces.iter().all(|p| p.chars().count() <= 25));
    }

    #[test]
    fn hard_splits_single_long_token() {
        let text = "a".repeat(50);
        let pieces = split_text(&text, 10);
        assert_eq!(pieces.len(), 5);
        for p in &pieces {
            assert_eq!(p.chars().count(), 10);
        }
    }

    #[test]
    fn never_loses_content() {
        let text = "Para one.\n\nPara two is longer and has more words in it than para one does.\n\nPara three.";
        let pieces = split_text(text, 20);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn sentence_suffix_respects_target_size() {
        let text = "First sentence. Second sentence. Third sentence.";
        let suffix = sentence_aligned_suffix(text, 20);
        assert!(!suffix.is_empty());
        assert!(text.ends_with(suffix.as_str()) || text.contains(suffix.as_str()));
    }
}
