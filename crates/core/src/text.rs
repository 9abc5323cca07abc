use regex::Regex;
use std::collections::BTreeSet;

const WORD_PATTERN: &str = r"[\p{L}\p{N}_]+";

fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits on every Unicode line boundary, treating `\r\n` as one.
///
/// A trailing boundary does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if !is_line_boundary(ch) {
            continue;
        }

        lines.push(&text[start..index]);
        let mut next = index + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(lf_index, '\n')) = chars.peek() {
                chars.next();
                next = lf_index + 1;
            }
        }
        start = next;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Lower-cases, replaces non-alphanumeric characters with spaces and trims.
pub fn normalize_for_similarity(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect();
    replaced.to_lowercase().trim().to_string()
}

/// Extracts the distinct lower-cased word tokens of a text.
///
/// Word characters are Unicode letters, numbers of any kind and underscore.
/// Combining marks and other connector punctuation split words. No stemming.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(WORD_PATTERN)?,
        })
    }

    pub fn distinct_tokens(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|token| token.as_str().to_string())
            .collect()
    }
}
