//! Pass D: renders the legalized instruction list as GNU/AT&T assembly.

use crate::lir::{BinaryOp, CondCode, Instruction, Operand, Reg, UnaryOp};
use std::fmt::Write as _;

/// macOS's linker expects a leading underscore on external symbols; Linux
/// does not. Cross-compiling for both from one host isn't a goal here, so
/// this is a compile-time choice rather than a runtime target flag.
#[cfg(target_os = "macos")]
const SYMBOL_PREFIX: &str = "_";
#[cfg(not(target_os = "macos"))]
const SYMBOL_PREFIX: &str = "";

pub(crate) fn emit(function: &crate::Function) -> String {
    let mut out = String::new();
    let name = function.name.as_str();

    let _ = writeln!(out, "    .globl {SYMBOL_PREFIX}{name}");
    let _ = writeln!(out, "{SYMBOL_PREFIX}{name}:");
    let _ = writeln!(out, "    pushq   %rbp");
    let _ = writeln!(out, "    movq    %rsp, %rbp");

    for inst in &function.instructions {
        emit_instruction(inst, &mut out);
    }

    out
}

fn emit_instruction(inst: &Instruction, out: &mut String) {
    match inst {
        Instruction::Mov { src, dst } => {
            let _ = writeln!(out, "    movl    {}, {}", operand32(src), operand32(dst));
        }
        Instruction::MovB { src, dst } => {
            let _ = writeln!(out, "    movb    {}, {}", operand8(src), operand8(dst));
        }
        Instruction::Unary { op, operand } => {
            let _ = writeln!(out, "    {}    {}", unary_mnemonic(*op), operand32(operand));
        }
        Instruction::Binary { op, src, dst } => {
            let _ = writeln!(
                out,
                "    {}    {}, {}",
                binary_mnemonic(*op),
                shift_operand(*op, src),
                operand32(dst)
            );
        }
        Instruction::Idiv(operand) => {
            let _ = writeln!(out, "    idivl   {}", operand32(operand));
        }
        Instruction::Cdq => {
            let _ = writeln!(out, "    cltd");
        }
        Instruction::Cmp { src, dst } => {
            let _ = writeln!(out, "    cmpl    {}, {}", operand32(src), operand32(dst));
        }
        Instruction::AllocateStack(bytes) => {
            let _ = writeln!(out, "    subq    ${bytes}, %rsp");
        }
        Instruction::Jmp(label) => {
            let _ = writeln!(out, "    jmp     {}", label.as_str());
        }
        Instruction::JmpCC { cc, target } => {
            let _ = writeln!(out, "    j{}     {}", cond_suffix(*cc), target.as_str());
        }
        Instruction::SetCC { cc, operand } => {
            let _ = writeln!(out, "    set{}   {}", cond_suffix(*cc), operand8(operand));
        }
        Instruction::Label(name) => {
            let _ = writeln!(out, "{}:", name.as_str());
        }
        Instruction::Ret => {
            let _ = writeln!(out, "    movq    %rbp, %rsp");
            let _ = writeln!(out, "    popq    %rbp");
            let _ = writeln!(out, "    ret");
        }
    }
}

/// Shifts take their count in `%cl`, not `%ecx` — the only place an
/// otherwise-32-bit operand is printed at byte width.
fn shift_operand(op: BinaryOp, operand: &Operand) -> String {
    match (op, operand) {
        (BinaryOp::Shl | BinaryOp::Shr, Operand::Reg(Reg::Cx)) => "%cl".to_string(),
        _ => operand32(operand),
    }
}

fn operand32(operand: &Operand) -> String {
    match operand {
        Operand::Imm(v) => format!("${v}"),
        Operand::Reg(reg) => format!("%{}", reg32(*reg)),
        Operand::Stack(offset) => format!("{offset}(%rbp)"),
        Operand::Pseudo(_) => unreachable!("pseudo operands are eliminated before emission"),
    }
}

fn operand8(operand: &Operand) -> String {
    match operand {
        Operand::Imm(v) => format!("${v}"),
        Operand::Reg(reg) => format!("%{}", reg8(*reg)),
        Operand::Stack(offset) => format!("{offset}(%rbp)"),
        Operand::Pseudo(_) => unreachable!("pseudo operands are eliminated before emission"),
    }
}

fn reg32(reg: Reg) -> &'static str {
    match reg {
        Reg::Ax => "eax",
        Reg::Dx => "edx",
        Reg::Cx => "ecx",
        Reg::R10 => "r10d",
        Reg::R11 => "r11d",
    }
}

fn reg8(reg: Reg) -> &'static str {
    match reg {
        Reg::Ax => "al",
        Reg::Dx => "dl",
        Reg::Cx => "cl",
        Reg::R10 => "r10b",
        Reg::R11 => "r11b",
    }
}

fn unary_mnemonic(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "negl",
        UnaryOp::Not => "notl",
    }
}

fn binary_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "addl",
        BinaryOp::Sub => "subl",
        BinaryOp::Mult => "imull",
        BinaryOp::And => "andl",
        BinaryOp::Or => "orl",
        BinaryOp::Xor => "xorl",
        BinaryOp::Shl => "shll",
        BinaryOp::Shr => "sarl",
    }
}

fn cond_suffix(cc: CondCode) -> &'static str {
    match cc {
        CondCode::E => "e",
        CondCode::Ne => "ne",
        CondCode::L => "l",
        CondCode::Le => "le",
        CondCode::G => "g",
        CondCode::Ge => "ge",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_util::Symbol;

    #[test]
    fn emits_globl_directive_and_prologue() {
        let function = crate::Function {
            name: Symbol::intern("main"),
            instructions: vec![Instruction::Ret],
        };
        let text = emit(&function);
        assert!(text.contains(".globl"));
        assert!(text.contains("pushq   %rbp"));
        assert!(text.contains("ret"));
    }

    #[test]
    fn shift_count_prints_as_cl() {
        let text = shift_operand(BinaryOp::Shl, &Operand::Reg(Reg::Cx));
        assert_eq!(text, "%cl");
    }

    #[test]
    fn stack_operand_uses_rbp_relative_form() {
        assert_eq!(operand32(&Operand::Stack(-8)), "-8(%rbp)");
    }
}
