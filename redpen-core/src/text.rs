//! Plain-text primitives shared by the diff and highlight engines.

use crate::model::TextRange;

/// Split text into alternating runs of whitespace and non-whitespace.
///
/// Whitespace runs are kept as tokens, so joining the result reproduces the
/// input exactly. Empty input yields no tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (offset, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(current) if current != space => {
                tokens.push(&text[start..offset]);
                start = offset;
            }
            _ => {}
        }
        in_space = Some(space);
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Case-insensitive token equality
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// Find the first case-insensitive literal occurrence of `needle` in `haystack`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<TextRange> {
    occurrences(haystack, needle).next()
}

/// Iterate over successive non-overlapping case-insensitive occurrences of
/// `needle`, left to right. The needle is matched literally.
pub fn occurrences<'a>(haystack: &'a str, needle: &str) -> Occurrences<'a> {
    Occurrences {
        haystack,
        folded: needle.chars().flat_map(char::to_lowercase).collect(),
        position: 0,
    }
}

pub struct Occurrences<'a> {
    haystack: &'a str,
    folded: Vec<char>,
    position: usize,
}

impl Iterator for Occurrences<'_> {
    type Item = TextRange;

    fn next(&mut self) -> Option<TextRange> {
        if self.folded.is_empty() || self.position > self.haystack.len() {
            return None;
        }

        let rest = &self.haystack[self.position..];
        for (offset, _) in rest.char_indices() {
            if let Some(len) = match_folded(&rest[offset..], &self.folded) {
                let start = self.position + offset;
                let end = start + len;
                self.position = end;
                return Some(TextRange::new(start, end));
            }
        }

        self.position = self.haystack.len() + 1;
        None
    }
}

/// Length in bytes of the prefix of `text` that folds to `folded`, if any.
/// The match must end on a character boundary of `text`.
fn match_folded(text: &str, folded: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            if folded.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == folded.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}
