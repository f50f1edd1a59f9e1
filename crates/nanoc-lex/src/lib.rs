//! Lexical analysis for the compiler's C subset.
//!
//! Turns source text into a flat token stream. The lexer is maximal-munch
//! (operators are matched longest-first, e.g. `<<=` before `<<` before `<`)
//! and single-pass; it does not look ahead past the current character.

mod cursor;
mod lexer;
mod token;
mod unicode;

pub use lexer::Lexer;
pub use token::{keyword, Token, TokenWithSpan};

use nanoc_util::{Handler, Span};
use thiserror::Error;

/// A lexical error: the input contains a character or lexeme the grammar
/// has no rule for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{message} (line {line})")]
    Invalid { message: String, line: u32, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::Invalid { span, .. } => *span,
        }
    }
}

/// Tokenizes `source`, returning every token up to and including `Token::Eof`.
///
/// Fails on the first unrecognized character or unterminated construct.
///
/// # Examples
///
/// ```
/// use nanoc_lex::{tokenize, Token};
///
/// let tokens = tokenize("int main(void) { return 2; }").unwrap();
/// assert_eq!(tokens[0].token, Token::Int);
/// assert_eq!(tokens.last().unwrap().token, Token::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<TokenWithSpan>, LexError> {
    let handler = Handler::new();
    let mut lexer = Lexer::new(source, &handler);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let span = lexer.token_span();

        if let Some(diag) = handler.first_error() {
            return Err(LexError::Invalid {
                message: diag.message,
                line: diag.span.line,
                span: diag.span,
            });
        }

        let is_eof = token == Token::Eof;
        tokens.push(TokenWithSpan::new(token, span));
        if is_eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_minimal_function() {
        let tokens = tokenize("int main(void) { return 0; }").unwrap();
        let kinds: Vec<Token> = tokens.iter().map(|t| t.token).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Int,
                Token::Ident(nanoc_util::Symbol::intern("main")),
                Token::LParen,
                Token::Void,
                Token::RParen,
                Token::LBrace,
                Token::Return,
                Token::Constant(0),
                Token::Semicolon,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn reports_unrecognized_characters() {
        let err = tokenize("int x = @;").unwrap_err();
        assert!(matches!(err, LexError::Invalid { .. }));
    }

    #[test]
    fn reports_unterminated_block_comment() {
        let err = tokenize("int x; /* never closed").unwrap_err();
        assert!(matches!(err, LexError::Invalid { .. }));
    }
}
