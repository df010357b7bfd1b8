//! Character-offset helpers shared by the extraction passes.
//!
//! Regex matches report byte offsets; every offset, window and length exposed by the
//! extractors is counted in `char`s instead.

/// Byte/char offset translation for one text.
pub struct CharIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    pub fn len_chars(&self) -> usize {
        self.starts.len()
    }

    /// Char offset of the char starting at (or containing) `byte`.
    pub fn char_of(&self, byte: usize) -> usize {
        match self.starts.binary_search(&byte) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(if byte < self.text.len() { 1 } else { 0 }),
        }
    }

    pub fn byte_of(&self, char_offset: usize) -> usize {
        self.starts.get(char_offset).copied().unwrap_or(self.text.len())
    }

    /// Substring between two char offsets, clamped to the text.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.len_chars());
        let start = start.min(end);
        &self.text[self.byte_of(start)..self.byte_of(end)]
    }

    /// Span of a byte-offset regex match, in chars.
    pub fn span(&self, byte_start: usize, byte_end: usize) -> Span {
        Span {
            start: self.char_of(byte_start),
            end: self.char_of(byte_end),
        }
    }

    /// `before` chars ahead of `span` through `after` chars past it.
    pub fn window(&self, span: Span, before: usize, after: usize) -> &'a str {
        self.slice(span.start.saturating_sub(before), span.end.saturating_add(after))
    }
}

/// Half-open char range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Classification window around `spans[target]`, cut short halfway to the nearest
/// non-overlapping neighbour on each side.
///
/// The text between two matches is shared out by distance, so keywords next to an
/// adjacent match do not decide this match's subtype.
pub fn clipped_range(spans: &[Span], target: usize, before: usize, after: usize) -> (usize, usize) {
    let own = spans[target];
    let mut lo = own.start.saturating_sub(before);
    let mut hi = own.end.saturating_add(after);

    for (i, other) in spans.iter().enumerate() {
        if i == target || other.overlaps(&own) {
            continue;
        }
        if other.end <= own.start {
            lo = lo.max(other.end + (own.start - other.end) / 2);
        } else if other.start >= own.end {
            hi = hi.min(own.end + (other.start - own.end) / 2);
        }
    }
    (lo, hi.max(own.end))
}

/// The first `n` chars of `s`.
pub fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

/// Wraps `context` in ellipses on both sides.
pub fn surround_ellipsis(context: &str) -> String {
    format!("...{}...", context)
}

/// Wraps `context` in ellipses only when it is longer than `limit` chars.
pub fn ellipsize_long(context: &str, limit: usize) -> String {
    if context.chars().count() > limit {
        surround_ellipsis(context)
    } else {
        context.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offsets_skip_multibyte() {
        let text = "₹50 and €10";
        let index = CharIndex::new(text);
        let euro = text.find('€').unwrap();
        assert_eq!(index.char_of(euro), 8);
        assert_eq!(index.slice(0, 3), "₹50");
        assert_eq!(index.char_of(text.len()), index.len_chars());
    }

    #[test]
    fn test_window_clamps_at_edges() {
        let text = "abcdefghij";
        let index = CharIndex::new(text);
        let span = Span { start: 2, end: 4 };
        assert_eq!(index.window(span, 5, 2), "abcdef");
        assert_eq!(index.window(span, 1, 50), "bcdefghij");
    }

    #[test]
    fn test_clipped_range_splits_gaps_at_midpoint() {
        let spans = [
            Span { start: 10, end: 15 },
            Span { start: 30, end: 35 },
            Span { start: 31, end: 34 },
            Span { start: 60, end: 70 },
        ];
        assert_eq!(clipped_range(&spans, 1, 40, 40), (22, 47));
        assert_eq!(clipped_range(&spans, 0, 40, 40), (0, 22));
    }

    #[test]
    fn test_prefix_chars() {
        assert_eq!(prefix_chars("héllo", 2), "hé");
        assert_eq!(prefix_chars("hi", 10), "hi");
    }

    #[test]
    fn test_ellipsize_long_only_past_limit() {
        assert_eq!(ellipsize_long("short", 120), "short");
        let long = "x".repeat(121);
        assert_eq!(ellipsize_long(&long, 120), format!("...{}...", long));
    }
}
