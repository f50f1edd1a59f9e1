//! nanoc-util - Shared foundation types for the nanoc pipeline.
//!
//! Every stage (lexer, parser, semantic analysis, TAC, assembly) shares three
//! things: a way to name a location in the source ([`Span`]), a way to carry
//! identifiers around cheaply ([`Symbol`]), and a way to collect diagnostics
//! before a stage reports its first error ([`Handler`]).

mod diagnostic;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::Span;
pub use symbol::Symbol;
