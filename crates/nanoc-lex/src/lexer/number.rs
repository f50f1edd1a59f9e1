//! Integer literal lexing.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a decimal integer constant.
    ///
    /// The language only has plain decimal `int` literals, so this is a
    /// digit run followed by a parse; no hex/octal/float forms.
    pub fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        match text.parse::<i64>() {
            Ok(value) => Token::Constant(value),
            Err(e) => {
                self.report_error(format!("integer constant '{text}' out of range: {e}"));
                Token::Constant(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_util::Handler;

    fn lex_num(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &handler);
        lexer.next_token()
    }

    #[test]
    fn single_digit() {
        assert_eq!(lex_num("7"), Token::Constant(7));
    }

    #[test]
    fn multi_digit() {
        assert_eq!(lex_num("12345"), Token::Constant(12345));
    }

    #[test]
    fn leading_zero() {
        assert_eq!(lex_num("007"), Token::Constant(7));
    }
}
