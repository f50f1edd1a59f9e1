//! Core lexer implementation.
//!
//! Contains the main `Lexer` struct and its dispatch over the current
//! character.

use nanoc_util::{Handler, Span};

use crate::cursor::Cursor;
use crate::token::Token;

/// Lexer for the C subset compiled by this pipeline.
///
/// Transforms source text into a stream of tokens, skipping whitespace and
/// comments along the way.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    pub handler: &'a Handler,

    /// Starting byte offset of the token currently being lexed.
    pub token_start: usize,

    /// Line on which the current token starts (1-based).
    token_start_line: u32,

    /// Column at which the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the span covering the token currently being lexed.
    pub fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. Returns `Token::Eof` once, at end of input.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::Eof;
        }

        match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                Token::LParen
            }
            ')' => {
                self.cursor.advance();
                Token::RParen
            }
            '{' => {
                self.cursor.advance();
                Token::LBrace
            }
            '}' => {
                self.cursor.advance();
                Token::RBrace
            }
            ';' => {
                self.cursor.advance();
                Token::Semicolon
            }
            ':' => {
                self.cursor.advance();
                Token::Colon
            }
            '?' => {
                self.cursor.advance();
                Token::Question
            }
            '~' => self.lex_tilde(),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '^' => self.lex_caret(),
            c if crate::unicode::is_ident_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                self.cursor.advance();
                self.report_error(format!("unexpected character '{c}'"));
                Token::Eof
            }
        }
    }

    /// Reports a lexical error at the current token's span.
    pub fn report_error(&self, message: String) {
        self.handler.error(message, self.token_span());
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub fn column(&self) -> u32 {
        self.cursor.column()
    }
}
