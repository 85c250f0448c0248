// src/segmentation/sentence.rs
//
// Grounded on the teacher's `segmentation/unicode.rs`: a universal
// Unicode-aware sentence splitter, falling back to script-specific
// punctuation splitting for CJK and Arabic text where the universal
// segmenter under-splits.

use unicode_segmentation::UnicodeSegmentation;

use super::cjk::{detect_cjk_language, has_arabic};

pub struct SentenceSegmenter;

impl SentenceSegmenter {
    /// Universal (Unicode UAX #29 sentence boundaries; works for all scripts).
    pub fn split_universal(text: &str) -> Vec<String> {
        text.unicode_sentences().map(str::to_string).collect()
    }

    /// Picks a script-specific splitter when the text is predominantly CJK
    /// or Arabic, otherwise falls back to the universal segmenter.
    pub fn split_best_effort(text: &str) -> Vec<String> {
        if let Some(lang) = detect_cjk_language(text) {
            return Self::split_with_language(text, lang);
        }
        if has_arabic(text) {
            return Self::split_arabic(text);
        }
        Self::split_universal(text)
    }

    pub fn split_with_language(text: &str, language: &str) -> Vec<String> {
        match language {
            "ja" => Self::split_japanese(text),
            "zh" | "zh-CN" | "zh-TW" => Self::split_chinese(text),
            "ar" | "ar-SA" | "ar-EG" => Self::split_arabic(text),
            _ => Self::split_universal(text),
        }
    }

    pub fn split_japanese(text: &str) -> Vec<String> {
        split_on_and_keep(text, &['。', '！', '？'])
    }

    pub fn split_chinese(text: &str) -> Vec<String> {
        split_on_and_keep(text, &['。', '！', '？', '；'])
    }

    pub fn split_arabic(text: &str) -> Vec<String> {
        split_on_and_keep(text, &['.', '؟', '!', '،'])
    }
}

/// Splits on any of `delims`, trimming and dropping empty pieces, like the
/// teacher's script-specific splitters.
fn split_on_and_keep(text: &str, delims: &[char]) -> Vec<String> {
    text.split(delims.as_ref())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_ascii_sentences() {
        let sentences = SentenceSegmenter::split_universal("One. Two. Three.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn splits_japanese_sentences() {
        let sentences = SentenceSegmenter::split_best_effort("最初の文です。次の文です。");
        assert_eq!(sentences.len(), 2);
    }
}
