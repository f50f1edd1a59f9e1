//! Token kinds produced by the lexer.

use nanoc_util::{Span, Symbol};

/// A lexical token: keyword, punctuation, literal, identifier, or operator.
///
/// `Eof` is emitted once at the end of the token stream so the parser can
/// detect end-of-input without special-casing an empty slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    // Keywords
    Int,
    Void,
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,

    // Literals and identifiers
    Constant(i64),
    Ident(Symbol),

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Colon,
    Question,

    // Unary-only
    Tilde,

    // Arithmetic / bitwise / shift, plain and compound-assignment forms
    Plus,
    PlusEq,
    Minus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpEq,
    Pipe,
    PipeEq,
    Caret,
    CaretEq,
    Shl,
    ShlEq,
    Shr,
    ShrEq,

    // Increment / decrement
    PlusPlus,
    MinusMinus,

    // Logical / comparison
    Bang,
    AmpAmp,
    PipePipe,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Assignment
    Eq,

    Eof,
}

impl Token {
    /// A short, human-readable name used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier `{s}`"),
            Token::Constant(v) => format!("constant `{v}`"),
            Token::Eof => "end of input".to_string(),
            other => format!("`{other:?}`"),
        }
    }
}

/// A token paired with the source span it was lexed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}

impl TokenWithSpan {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

/// Keywords reserved by the language; identifier-shaped lexemes are looked
/// up here after the maximal-munch identifier scan accepts them.
pub fn keyword(lexeme: &str) -> Option<Token> {
    Some(match lexeme {
        "int" => Token::Int,
        "void" => Token::Void,
        "return" => Token::Return,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "while" => Token::While,
        "do" => Token::Do,
        "break" => Token::Break,
        "continue" => Token::Continue,
        _ => return None,
    })
}
