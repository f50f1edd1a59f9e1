//! Pass A: target-agnostic instruction selection from three-address code.
//!
//! Every destination here is a `Pseudo` operand; nothing in this module
//! knows that x86-64 restricts which operand forms may pair with which
//! instructions. That knowledge belongs to [`legalize`](crate::legalize).

use crate::lir::{BinaryOp as AsmBinaryOp, CondCode, Instruction, Operand, Reg, UnaryOp as AsmUnaryOp};
use nanoc_tac as tac;

pub(crate) fn select(function: tac::Function) -> crate::Function {
    let mut instructions = Vec::new();
    for inst in function.body {
        select_instruction(inst, &mut instructions);
    }
    crate::Function {
        name: function.name,
        instructions,
    }
}

fn select_instruction(inst: tac::Instruction, out: &mut Vec<Instruction>) {
    match inst {
        tac::Instruction::Return(v) => {
            out.push(Instruction::Mov {
                src: select_value(v),
                dst: Operand::Reg(Reg::Ax),
            });
            out.push(Instruction::Ret);
        }
        tac::Instruction::Unary {
            op: tac::UnaryOp::Not,
            src,
            dst,
        } => {
            out.push(Instruction::Cmp {
                src: Operand::Imm(0),
                dst: select_value(src),
            });
            out.push(Instruction::Mov {
                src: Operand::Imm(0),
                dst: Operand::Pseudo(dst),
            });
            out.push(Instruction::SetCC {
                cc: CondCode::E,
                operand: Operand::Pseudo(dst),
            });
        }
        tac::Instruction::Unary { op, src, dst } => {
            let dst = Operand::Pseudo(dst);
            out.push(Instruction::Mov {
                src: select_value(src),
                dst,
            });
            out.push(Instruction::Unary {
                op: select_unary_op(op),
                operand: dst,
            });
        }
        tac::Instruction::Binary {
            op: tac::BinaryOp::Divide,
            lhs,
            rhs,
            dst,
        } => {
            out.push(Instruction::Mov {
                src: select_value(lhs),
                dst: Operand::Reg(Reg::Ax),
            });
            out.push(Instruction::Cdq);
            out.push(Instruction::Idiv(select_value(rhs)));
            out.push(Instruction::Mov {
                src: Operand::Reg(Reg::Ax),
                dst: Operand::Pseudo(dst),
            });
        }
        tac::Instruction::Binary {
            op: tac::BinaryOp::Remainder,
            lhs,
            rhs,
            dst,
        } => {
            out.push(Instruction::Mov {
                src: select_value(lhs),
                dst: Operand::Reg(Reg::Ax),
            });
            out.push(Instruction::Cdq);
            out.push(Instruction::Idiv(select_value(rhs)));
            out.push(Instruction::Mov {
                src: Operand::Reg(Reg::Dx),
                dst: Operand::Pseudo(dst),
            });
        }
        tac::Instruction::Binary { op, lhs, rhs, dst } if is_relational(op) => {
            out.push(Instruction::Cmp {
                src: select_value(rhs),
                dst: select_value(lhs),
            });
            out.push(Instruction::Mov {
                src: Operand::Imm(0),
                dst: Operand::Pseudo(dst),
            });
            out.push(Instruction::SetCC {
                cc: relational_cc(op),
                operand: Operand::Pseudo(dst),
            });
        }
        tac::Instruction::Binary { op, lhs, rhs, dst } => {
            let dst_operand = Operand::Pseudo(dst);
            out.push(Instruction::Mov {
                src: select_value(lhs),
                dst: dst_operand,
            });
            out.push(Instruction::Binary {
                op: select_binary_op(op),
                src: select_value(rhs),
                dst: dst_operand,
            });
        }
        tac::Instruction::Copy { src, dst } => out.push(Instruction::Mov {
            src: select_value(src),
            dst: Operand::Pseudo(dst),
        }),
        tac::Instruction::Jump(target) => out.push(Instruction::Jmp(target)),
        tac::Instruction::JumpIfZero { cond, target } => {
            out.push(Instruction::Cmp {
                src: Operand::Imm(0),
                dst: select_value(cond),
            });
            out.push(Instruction::JmpCC {
                cc: CondCode::E,
                target,
            });
        }
        tac::Instruction::JumpIfNotZero { cond, target } => {
            out.push(Instruction::Cmp {
                src: Operand::Imm(0),
                dst: select_value(cond),
            });
            out.push(Instruction::JmpCC {
                cc: CondCode::Ne,
                target,
            });
        }
        tac::Instruction::Label(name) => out.push(Instruction::Label(name)),
    }
}

fn select_value(v: tac::Value) -> Operand {
    match v {
        tac::Value::Constant(c) => Operand::Imm(c),
        tac::Value::Var(name) => Operand::Pseudo(name),
    }
}

fn select_unary_op(op: tac::UnaryOp) -> AsmUnaryOp {
    match op {
        tac::UnaryOp::Negate => AsmUnaryOp::Neg,
        tac::UnaryOp::Complement => AsmUnaryOp::Not,
        tac::UnaryOp::Not => unreachable!("logical not is selected separately"),
    }
}

fn is_relational(op: tac::BinaryOp) -> bool {
    matches!(
        op,
        tac::BinaryOp::Equal
            | tac::BinaryOp::NotEqual
            | tac::BinaryOp::LessThan
            | tac::BinaryOp::LessOrEqual
            | tac::BinaryOp::GreaterThan
            | tac::BinaryOp::GreaterOrEqual
    )
}

fn relational_cc(op: tac::BinaryOp) -> CondCode {
    match op {
        tac::BinaryOp::Equal => CondCode::E,
        tac::BinaryOp::NotEqual => CondCode::Ne,
        tac::BinaryOp::LessThan => CondCode::L,
        tac::BinaryOp::LessOrEqual => CondCode::Le,
        tac::BinaryOp::GreaterThan => CondCode::G,
        tac::BinaryOp::GreaterOrEqual => CondCode::Ge,
        _ => unreachable!(),
    }
}

fn select_binary_op(op: tac::BinaryOp) -> AsmBinaryOp {
    match op {
        tac::BinaryOp::Add => AsmBinaryOp::Add,
        tac::BinaryOp::Subtract => AsmBinaryOp::Sub,
        tac::BinaryOp::Multiply => AsmBinaryOp::Mult,
        tac::BinaryOp::BitwiseAnd => AsmBinaryOp::And,
        tac::BinaryOp::BitwiseOr => AsmBinaryOp::Or,
        tac::BinaryOp::BitwiseXor => AsmBinaryOp::Xor,
        tac::BinaryOp::ShiftLeft => AsmBinaryOp::Shl,
        tac::BinaryOp::ShiftRight => AsmBinaryOp::Shr,
        other => unreachable!("{other:?} is handled by a dedicated arm"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_util::Symbol;

    fn function_with(body: Vec<tac::Instruction>) -> tac::Function {
        tac::Function {
            name: Symbol::intern("main"),
            body,
        }
    }

    #[test]
    fn return_moves_into_ax() {
        let asm = select(function_with(vec![tac::Instruction::Return(tac::Value::Constant(2))]));
        assert!(matches!(
            asm.instructions.as_slice(),
            [Instruction::Mov { dst: Operand::Reg(Reg::Ax), .. }, Instruction::Ret]
        ));
    }

    #[test]
    fn division_routes_through_cdq_and_idiv() {
        let dst = Symbol::intern("t.0");
        let asm = select(function_with(vec![tac::Instruction::Binary {
            op: tac::BinaryOp::Divide,
            lhs: tac::Value::Constant(10),
            rhs: tac::Value::Constant(3),
            dst,
        }]));
        assert!(asm.instructions.iter().any(|i| matches!(i, Instruction::Cdq)));
        assert!(asm.instructions.iter().any(|i| matches!(i, Instruction::Idiv(_))));
    }

    #[test]
    fn relational_binary_emits_setcc() {
        let dst = Symbol::intern("t.0");
        let asm = select(function_with(vec![tac::Instruction::Binary {
            op: tac::BinaryOp::LessThan,
            lhs: tac::Value::Constant(1),
            rhs: tac::Value::Constant(2),
            dst,
        }]));
        assert!(asm
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::SetCC { cc: CondCode::L, .. })));
    }
}
