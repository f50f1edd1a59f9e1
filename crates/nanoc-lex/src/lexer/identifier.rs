//! Identifier and keyword lexing.

use crate::token::{keyword, Token};
use crate::unicode::is_ident_continue;
use crate::Lexer;
use nanoc_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// Scans the maximal identifier-shaped lexeme, then checks it against
    /// the keyword table; anything not reserved becomes `Token::Ident`.
    pub fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        keyword(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
    }
}
