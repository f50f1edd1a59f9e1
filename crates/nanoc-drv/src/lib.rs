//! Compiler driver: wires the five pipeline stages together behind one
//! `compile` entry point and gives each stage's error a place to land.
//!
//! The core is deliberately not in the file I/O business — it takes a
//! source string and returns an assembly string. Reading the `.c` path
//! and writing the `.s` output live in [`main`], alongside everything
//! else that counts as "driving" the compiler rather than being it.

use nanoc_asm::AsmError;
use nanoc_lex::LexError;
use nanoc_par::ParseError;
use nanoc_sem::SemError;
use nanoc_tac::TacError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("semantic error: {0}")]
    Sem(#[from] SemError),
    #[error("codegen error: {0}")]
    Tac(#[from] TacError),
    #[error("codegen error: {0}")]
    Asm(#[from] AsmError),
}

/// Runs the full pipeline over `source`, returning the generated
/// assembly text or the first error encountered.
///
/// # Examples
///
/// ```
/// let asm = nanoc_drv::compile("int main(void) { return 2; }").unwrap();
/// assert!(asm.contains("main"));
/// ```
pub fn compile(source: &str) -> Result<String, CompileError> {
    log::debug!("lexing");
    let tokens = nanoc_lex::tokenize(source)?;

    log::debug!("parsing {} tokens", tokens.len());
    let ast = nanoc_par::parse(tokens)?;

    log::debug!("resolving names");
    let ast = nanoc_sem::analyze(ast)?;

    log::debug!("generating three-address code");
    let tac = nanoc_tac::generate(ast)?;

    log::debug!("generating assembly");
    let asm = nanoc_asm::generate(tac)?;

    Ok(asm)
}
