use serde::{Deserialize, Serialize};

/// A span of text by byte offsets into a single string
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_offset: start.min(end),
            end_offset: start.max(end),
        }
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }

    /// True when the two ranges share at least one byte
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start_offset < other.end_offset && other.start_offset < self.end_offset
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Slice `text` by this range
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start_offset..self.end_offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_order() {
        let range = TextRange::new(9, 4);
        assert_eq!(range.start_offset, 4);
        assert_eq!(range.end_offset, 9);
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn test_overlaps() {
        let a = TextRange::new(0, 5);
        assert!(a.overlaps(&TextRange::new(4, 8)));
        assert!(a.overlaps(&TextRange::new(0, 5)));
        assert!(!a.overlaps(&TextRange::new(5, 8)));
        assert!(!TextRange::new(5, 8).overlaps(&a));
    }
}
