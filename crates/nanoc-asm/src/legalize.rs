//! Pass C: the only pass that knows x86-64 encoding constraints.
//!
//! `mov`/`cmp`/binary instructions cannot address two memory operands at
//! once, `idiv` cannot take an immediate divisor, shift counts must sit
//! in `%cl`, and `imul` cannot write directly to memory. Each restriction
//! is worked around by staging one operand through a scratch register.

use crate::lir::{BinaryOp, Instruction, Operand, Reg};

pub(crate) fn legalize(function: crate::Function) -> crate::Function {
    let mut instructions = Vec::new();
    for inst in function.instructions {
        legalize_instruction(inst, &mut instructions);
    }
    crate::Function {
        name: function.name,
        instructions,
    }
}

fn is_memory(op: &Operand) -> bool {
    matches!(op, Operand::Stack(_))
}

fn is_imm(op: &Operand) -> bool {
    matches!(op, Operand::Imm(_))
}

fn legalize_instruction(inst: Instruction, out: &mut Vec<Instruction>) {
    match inst {
        Instruction::Mov { src, dst } if is_memory(&src) && is_memory(&dst) => {
            out.push(Instruction::Mov {
                src,
                dst: Operand::Reg(Reg::R10),
            });
            out.push(Instruction::Mov {
                src: Operand::Reg(Reg::R10),
                dst,
            });
        }
        Instruction::Idiv(src @ Operand::Imm(_)) => {
            out.push(Instruction::Mov {
                src,
                dst: Operand::Reg(Reg::R10),
            });
            out.push(Instruction::Idiv(Operand::Reg(Reg::R10)));
        }
        Instruction::Binary {
            op: op @ (BinaryOp::Add | BinaryOp::Sub | BinaryOp::And | BinaryOp::Or | BinaryOp::Xor),
            src,
            dst,
        } if is_memory(&src) && is_memory(&dst) => {
            out.push(Instruction::Mov {
                src,
                dst: Operand::Reg(Reg::R10),
            });
            out.push(Instruction::Binary {
                op,
                src: Operand::Reg(Reg::R10),
                dst,
            });
        }
        Instruction::Binary {
            op: BinaryOp::Mult,
            src,
            dst,
        } if is_memory(&dst) => {
            out.push(Instruction::Mov {
                src: dst,
                dst: Operand::Reg(Reg::R11),
            });
            out.push(Instruction::Binary {
                op: BinaryOp::Mult,
                src,
                dst: Operand::Reg(Reg::R11),
            });
            out.push(Instruction::Mov {
                src: Operand::Reg(Reg::R11),
                dst,
            });
        }
        Instruction::Binary {
            op: op @ (BinaryOp::Shl | BinaryOp::Shr),
            src,
            dst,
        } if !matches!(src, Operand::Imm(_)) => {
            out.push(Instruction::MovB {
                src,
                dst: Operand::Reg(Reg::Cx),
            });
            out.push(Instruction::Binary {
                op,
                src: Operand::Reg(Reg::Cx),
                dst,
            });
        }
        Instruction::Cmp { src, dst } if is_memory(&src) && is_memory(&dst) => {
            out.push(Instruction::Mov {
                src,
                dst: Operand::Reg(Reg::R10),
            });
            out.push(Instruction::Cmp {
                src: Operand::Reg(Reg::R10),
                dst,
            });
        }
        Instruction::Cmp { src, dst } if is_imm(&dst) => {
            out.push(Instruction::Mov {
                src: dst,
                dst: Operand::Reg(Reg::R11),
            });
            out.push(Instruction::Cmp {
                src,
                dst: Operand::Reg(Reg::R11),
            });
        }
        other => out.push(other),
    }
}
