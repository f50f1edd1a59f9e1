//! Whitespace and comment skipping.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    ///
    /// Handles both `//` line comments and `/* */` block comments; block
    /// comments do not nest.
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek_char(1) == '/' => self.skip_line_comment(),
                '/' if self.cursor.peek_char(1) == '*' => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        let start_line = self.cursor.line();
        self.cursor.advance();
        self.cursor.advance();

        loop {
            if self.cursor.is_at_end() {
                self.report_error(format!(
                    "unterminated block comment starting on line {start_line}"
                ));
                return;
            }
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use nanoc_util::{Handler, Symbol};

    fn first_token(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &handler);
        lexer.next_token()
    }

    #[test]
    fn skips_leading_whitespace() {
        assert_eq!(first_token("   x"), Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn skips_line_comment() {
        assert_eq!(
            first_token("// a comment\nx"),
            Token::Ident(Symbol::intern("x"))
        );
    }

    #[test]
    fn skips_block_comment() {
        assert_eq!(
            first_token("/* a comment */ x"),
            Token::Ident(Symbol::intern("x"))
        );
    }

    #[test]
    fn unterminated_block_comment_reports_error() {
        let handler = Handler::new();
        let mut lexer = crate::Lexer::new("/* never closed", &handler);
        lexer.next_token();
        assert!(handler.has_errors());
    }
}
