//! Fixed-column field extraction.
//!
//! CHEMKIN records are positional: a field lives at a known column and has a
//! known width. The layouts are written down as tables of [`FieldSpec`] and
//! read through [`FieldSpec::slice`], so the parsers never do their own
//! column arithmetic.

/// one positional field of a record line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub width: usize,
}

impl FieldSpec {
    pub const fn new(name: &'static str, start: usize, width: usize) -> Self {
        Self { name, start, width }
    }
    /// one past the last column of the field
    pub const fn end(&self) -> usize {
        self.start + self.width
    }
    /// Raw text of the field. Short lines are treated as padded with blanks,
    /// so a field lying (partly) beyond the end of the line is truncated or empty.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        char_slice(line, self.start, self.end())
    }
    /// field text with surrounding whitespace removed
    pub fn trimmed<'a>(&self, line: &'a str) -> &'a str {
        self.slice(line).trim()
    }
}

/// Substring by character columns `[start, end)`, clamped to the line length.
pub fn char_slice(line: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let mut indices = line.char_indices().map(|(i, _)| i).chain(std::iter::once(line.len()));
    let Some(from) = indices.nth(start) else {
        return "";
    };
    let to = indices.nth(end - start - 1).unwrap_or(line.len());
    &line[from..to]
}

/// Character at a fixed column, if the line reaches that far.
pub fn char_at(line: &str, column: usize) -> Option<char> {
    line.chars().nth(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_inside_line() {
        let f = FieldSpec::new("tmin", 3, 4);
        assert_eq!(f.slice("abcdefghij"), "defg");
        assert_eq!(f.end(), 7);
    }

    #[test]
    fn test_slice_beyond_line() {
        let f = FieldSpec::new("tail", 8, 5);
        assert_eq!(f.slice("abcdefghij"), "ij");
        assert_eq!(f.slice("abc"), "");
    }

    #[test]
    fn test_char_helpers() {
        assert_eq!(char_slice("C2H6  G", 0, 4), "C2H6");
        assert_eq!(char_slice("C2H6", 2, 2), "");
        assert_eq!(char_at("C2H6  G", 6), Some('G'));
        assert_eq!(char_at("C2H6", 10), None);
    }
}
