//! Character cursor for traversing source code.
//!
//! Maintains position state while scanning the source, handling UTF-8
//! correctly and tracking line/column for diagnostics.

/// A cursor over source text, advancing one character at a time.
///
/// # Examples
///
/// ```
/// use nanoc_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("int x;");
/// assert_eq!(cursor.current_char(), 'i');
/// cursor.advance();
/// assert_eq!(cursor.current_char(), 'n');
/// ```
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the character at the cursor, or `'\0'` at end of input.
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    /// Returns the character `offset` positions ahead of the cursor.
    pub fn peek_char(&self, offset: usize) -> char {
        self.char_at(offset)
    }

    fn char_at(&self, offset: usize) -> char {
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    /// Advances past the current character, updating line/column.
    pub fn advance(&mut self) {
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Consumes the current character if it equals `expected`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nanoc_lex::cursor::Cursor;
    ///
    /// let mut cursor = Cursor::new("==");
    /// assert!(cursor.match_char('='));
    /// assert!(cursor.match_char('='));
    /// assert!(cursor.is_at_end());
    /// ```
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the source slice between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut cursor = Cursor::new("a\nb");
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        cursor.advance();
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
    }

    #[test]
    fn match_char_only_consumes_on_match() {
        let mut cursor = Cursor::new("ab");
        assert!(!cursor.match_char('b'));
        assert!(cursor.match_char('a'));
        assert_eq!(cursor.current_char(), 'b');
    }

    #[test]
    fn peek_does_not_advance() {
        let cursor = Cursor::new("xy");
        assert_eq!(cursor.peek_char(1), 'y');
        assert_eq!(cursor.current_char(), 'x');
    }
}
