//! Operator and punctuation lexing.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes plus or plus-equals or plus-plus.
    ///
    /// Handles: `+`, `+=`, `++`
    pub fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::PlusEq
        } else if self.cursor.match_char('+') {
            Token::PlusPlus
        } else {
            Token::Plus
        }
    }

    /// Lexes minus, minus-equals, or minus-minus.
    ///
    /// Handles: `-`, `-=`, `--`
    pub fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::MinusEq
        } else if self.cursor.match_char('-') {
            Token::MinusMinus
        } else {
            Token::Minus
        }
    }

    /// Lexes star or star-equals.
    ///
    /// Handles: `*`, `*=`
    pub fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::StarEq
        } else {
            Token::Star
        }
    }

    /// Lexes slash or slash-equals.
    ///
    /// Comments are skipped upstream by `skip_whitespace_and_comments`, so
    /// by the time this runs the only possibilities are `/` and `/=`.
    ///
    /// Handles: `/`, `/=`
    pub fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::SlashEq
        } else {
            Token::Slash
        }
    }

    /// Lexes percent or percent-equals.
    ///
    /// Handles: `%`, `%=`
    pub fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::PercentEq
        } else {
            Token::Percent
        }
    }

    /// Lexes equals or equals-equals.
    ///
    /// Handles: `=`, `==`
    pub fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else {
            Token::Eq
        }
    }

    /// Lexes bang or not-equals.
    ///
    /// Handles: `!`, `!=`
    pub fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    /// Lexes less, less-equals, left shift, or shift-left-equals.
    ///
    /// Handles: `<`, `<=`, `<<`, `<<=`
    pub fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                Token::ShlEq
            } else {
                Token::Shl
            }
        } else {
            Token::Lt
        }
    }

    /// Lexes greater, greater-equals, right shift, or shift-right-equals.
    ///
    /// Handles: `>`, `>=`, `>>`, `>>=`
    pub fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                Token::ShrEq
            } else {
                Token::Shr
            }
        } else {
            Token::Gt
        }
    }

    /// Lexes ampersand, logical and, or ampersand-equals.
    ///
    /// Handles: `&`, `&&`, `&=`
    pub fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            Token::AmpAmp
        } else if self.cursor.match_char('=') {
            Token::AmpEq
        } else {
            Token::Amp
        }
    }

    /// Lexes pipe, logical or, or pipe-equals.
    ///
    /// Handles: `|`, `||`, `|=`
    pub fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Token::PipePipe
        } else if self.cursor.match_char('=') {
            Token::PipeEq
        } else {
            Token::Pipe
        }
    }

    /// Lexes caret (bitwise XOR) or caret-equals.
    ///
    /// Handles: `^`, `^=`
    pub fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::CaretEq
        } else {
            Token::Caret
        }
    }

    /// Lexes tilde (bitwise NOT). Never has a compound-assignment form.
    ///
    /// Handles: `~`
    pub fn lex_tilde(&mut self) -> Token {
        self.cursor.advance();
        Token::Tilde
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_util::Handler;

    fn lex_op(source: &str) -> Token {
        let handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &handler);
        lexer.next_token()
    }

    #[test]
    fn plus_family() {
        assert_eq!(lex_op("+"), Token::Plus);
        assert_eq!(lex_op("+="), Token::PlusEq);
        assert_eq!(lex_op("++"), Token::PlusPlus);
    }

    #[test]
    fn minus_family() {
        assert_eq!(lex_op("-"), Token::Minus);
        assert_eq!(lex_op("-="), Token::MinusEq);
        assert_eq!(lex_op("--"), Token::MinusMinus);
    }

    #[test]
    fn star_and_slash() {
        assert_eq!(lex_op("*"), Token::Star);
        assert_eq!(lex_op("*="), Token::StarEq);
        assert_eq!(lex_op("/"), Token::Slash);
        assert_eq!(lex_op("/="), Token::SlashEq);
    }

    #[test]
    fn equality_and_assignment() {
        assert_eq!(lex_op("="), Token::Eq);
        assert_eq!(lex_op("=="), Token::EqEq);
        assert_eq!(lex_op("!"), Token::Bang);
        assert_eq!(lex_op("!="), Token::NotEq);
    }

    #[test]
    fn relational_and_shift() {
        assert_eq!(lex_op("<"), Token::Lt);
        assert_eq!(lex_op("<="), Token::LtEq);
        assert_eq!(lex_op("<<"), Token::Shl);
        assert_eq!(lex_op("<<="), Token::ShlEq);
        assert_eq!(lex_op(">"), Token::Gt);
        assert_eq!(lex_op(">="), Token::GtEq);
        assert_eq!(lex_op(">>"), Token::Shr);
        assert_eq!(lex_op(">>="), Token::ShrEq);
    }

    #[test]
    fn bitwise_and_logical() {
        assert_eq!(lex_op("&"), Token::Amp);
        assert_eq!(lex_op("&&"), Token::AmpAmp);
        assert_eq!(lex_op("&="), Token::AmpEq);
        assert_eq!(lex_op("|"), Token::Pipe);
        assert_eq!(lex_op("||"), Token::PipePipe);
        assert_eq!(lex_op("|="), Token::PipeEq);
        assert_eq!(lex_op("^"), Token::Caret);
        assert_eq!(lex_op("^="), Token::CaretEq);
        assert_eq!(lex_op("~"), Token::Tilde);
    }
}
