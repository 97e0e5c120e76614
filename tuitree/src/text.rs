use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal cells.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Display width of a single character. Zero for combining marks.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}
