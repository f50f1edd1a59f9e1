//! Assembly generation: three-address code to x86-64 text.
//!
//! A straight-line pipeline of four passes, each named for what it does
//! rather than numbered: [`select`] picks instructions against `Pseudo`
//! operands, [`stack`] assigns those operands real stack slots,
//! [`legalize`] rewrites anything the instruction set can't encode
//! directly, and [`emit`] prints the result.

mod emit;
mod legalize;
mod lir;
mod select;
mod stack;

use nanoc_util::Symbol;
use thiserror::Error;

pub use lir::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// Selection is total over the operators TAC generation can produce;
    /// this exists only so the pipeline's error type isn't infallible by
    /// assertion.
    #[error("internal error: unsupported operator reached assembly generation")]
    UnsupportedOperator,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Symbol,
    pub instructions: Vec<Instruction>,
}

/// Runs all four passes and renders the result as assembly text.
///
/// # Examples
///
/// ```
/// use nanoc_lex::tokenize;
/// use nanoc_par::parse;
/// use nanoc_sem::analyze;
/// use nanoc_tac::generate as generate_tac;
/// use nanoc_asm::generate;
///
/// let tokens = tokenize("int main(void) { return 2; }").unwrap();
/// let program = analyze(parse(tokens).unwrap()).unwrap();
/// let tac = generate_tac(program).unwrap();
/// let asm = generate(tac).unwrap();
/// assert!(asm.contains("main"));
/// ```
pub fn generate(program: nanoc_tac::Program) -> Result<String, AsmError> {
    let function = select::select(program.function);
    let function = stack::assign_slots(function);
    let function = legalize::legalize(function);
    Ok(emit::emit(&function))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_lex::tokenize;
    use nanoc_par::parse;
    use nanoc_sem::analyze;

    fn compile_to_asm(source: &str) -> String {
        let tokens = tokenize(source).unwrap();
        let program = analyze(parse(tokens).unwrap()).unwrap();
        let tac = nanoc_tac::generate(program).unwrap();
        generate(tac).unwrap()
    }

    #[test]
    fn emits_a_globl_directive_for_main() {
        let asm = compile_to_asm("int main(void) { return 2; }");
        assert!(asm.contains(".globl"));
        assert!(asm.contains("main"));
    }

    #[test]
    fn never_emits_a_pseudo_operand() {
        let asm = compile_to_asm("int main(void) { int a = 1; int b = 2; return a + b; }");
        assert!(!asm.to_lowercase().contains("pseudo"));
    }

    #[test]
    fn division_emits_cltd_and_idiv() {
        let asm = compile_to_asm("int main(void) { return 10 / 3; }");
        assert!(asm.contains("cltd"));
        assert!(asm.contains("idivl"));
    }

    #[test]
    fn conditional_branches_lower_to_jcc() {
        let asm = compile_to_asm("int main(void) { int a = 3; return a < 4 ? 1 : 0; }");
        assert!(asm.contains("cmpl"));
        assert!(asm.contains("je") || asm.contains("jne"));
    }
}
