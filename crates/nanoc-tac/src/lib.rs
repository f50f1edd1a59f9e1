//! Three-address code: a flat instruction list IR with explicit jumps.
//!
//! Unlike a basic-block CFG, this IR keeps every instruction — including
//! `Label` markers — in one linear `Vec`, the same shape the assembly
//! emitter wants. Short-circuit `&&`/`||`, the ternary operator, and
//! pre/post increment are all lowered away here; nothing past this crate
//! needs to know they ever existed in the source.

mod lower;

use nanoc_util::Symbol;
use thiserror::Error;

pub use nanoc_par::{BinaryOp, UnaryOp};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TacError {
    /// The semantic pass is supposed to reject anything that would reach
    /// this; it exists so generation stays total instead of panicking if
    /// that invariant is ever violated.
    #[error("internal error: unsupported operator reached TAC generation")]
    UnsupportedOperator,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub function: Function,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Symbol,
    pub body: Vec<Instruction>,
}

/// An operand: either a literal or a (by-now-unique) variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Constant(i64),
    Var(Symbol),
}

#[derive(Debug, Clone)]
pub enum Instruction {
    Return(Value),
    Unary {
        op: UnaryOp,
        src: Value,
        dst: Symbol,
    },
    /// `op` is never `LogicalAnd`/`LogicalOr` — those lower to jumps in
    /// [`lower`] and never reach a `Binary` instruction.
    Binary {
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
        dst: Symbol,
    },
    Copy {
        src: Value,
        dst: Symbol,
    },
    Jump(Symbol),
    JumpIfZero {
        cond: Value,
        target: Symbol,
    },
    JumpIfNotZero {
        cond: Value,
        target: Symbol,
    },
    Label(Symbol),
}

/// Lowers a semantically-validated program into three-address code.
///
/// # Examples
///
/// ```
/// use nanoc_lex::tokenize;
/// use nanoc_par::parse;
/// use nanoc_sem::analyze;
/// use nanoc_tac::generate;
///
/// let tokens = tokenize("int main(void) { return 2 + 2; }").unwrap();
/// let program = analyze(parse(tokens).unwrap()).unwrap();
/// let tac = generate(program).unwrap();
/// assert!(matches!(tac.function.body.last(), Some(nanoc_tac::Instruction::Return(_))));
/// ```
pub fn generate(program: nanoc_par::Program) -> Result<Program, TacError> {
    let mut emitter = lower::Emitter::new();
    let function = emitter.lower_function(program.function)?;
    Ok(Program { function })
}
