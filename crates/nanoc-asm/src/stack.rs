//! Pass B: assigns every `Pseudo` operand a stack slot.
//!
//! Local variables are never spilled back once assigned — this subset
//! has no register allocator, so each distinct name simply gets its own
//! 4-byte slot for the lifetime of the function.

use crate::lir::{Instruction, Operand};
use nanoc_util::Symbol;
use std::collections::HashMap;

const SLOT_SIZE: i32 = 4;

pub(crate) fn assign_slots(function: crate::Function) -> crate::Function {
    let mut slots: HashMap<Symbol, i32> = HashMap::new();
    let mut next_slot = 0i32;

    let mut assign = |name: Symbol, slots: &mut HashMap<Symbol, i32>| -> i32 {
        *slots.entry(name).or_insert_with(|| {
            next_slot += 1;
            -(next_slot * SLOT_SIZE)
        })
    };

    let mut instructions: Vec<Instruction> = function
        .instructions
        .into_iter()
        .map(|inst| rewrite(inst, &mut slots, &mut assign))
        .collect();

    if next_slot > 0 {
        instructions.insert(0, Instruction::AllocateStack(next_slot * SLOT_SIZE));
    }

    crate::Function {
        name: function.name,
        instructions,
    }
}

fn rewrite(
    inst: Instruction,
    slots: &mut HashMap<Symbol, i32>,
    assign: &mut impl FnMut(Symbol, &mut HashMap<Symbol, i32>) -> i32,
) -> Instruction {
    let mut operand = |op: Operand| -> Operand {
        match op {
            Operand::Pseudo(name) => Operand::Stack(assign(name, slots)),
            other => other,
        }
    };
    match inst {
        Instruction::Mov { src, dst } => Instruction::Mov {
            src: operand(src),
            dst: operand(dst),
        },
        Instruction::MovB { src, dst } => Instruction::MovB {
            src: operand(src),
            dst: operand(dst),
        },
        Instruction::Unary { op, operand: o } => Instruction::Unary {
            op,
            operand: operand(o),
        },
        Instruction::Binary { op, src, dst } => Instruction::Binary {
            op,
            src: operand(src),
            dst: operand(dst),
        },
        Instruction::Idiv(o) => Instruction::Idiv(operand(o)),
        Instruction::Cmp { src, dst } => Instruction::Cmp {
            src: operand(src),
            dst: operand(dst),
        },
        Instruction::SetCC { cc, operand: o } => Instruction::SetCC {
            cc,
            operand: operand(o),
        },
        other @ (Instruction::Cdq
        | Instruction::AllocateStack(_)
        | Instruction::Jmp(_)
        | Instruction::JmpCC { .. }
        | Instruction::Label(_)
        | Instruction::Ret) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lir::Reg;

    #[test]
    fn distinct_pseudos_get_distinct_slots() {
        let function = crate::Function {
            name: Symbol::intern("main"),
            instructions: vec![
                Instruction::Mov {
                    src: Operand::Imm(1),
                    dst: Operand::Pseudo(Symbol::intern("a")),
                },
                Instruction::Mov {
                    src: Operand::Pseudo(Symbol::intern("a")),
                    dst: Operand::Reg(Reg::Ax),
                },
                Instruction::Mov {
                    src: Operand::Imm(2),
                    dst: Operand::Pseudo(Symbol::intern("b")),
                },
            ],
        };
        let function = assign_slots(function);
        assert!(matches!(
            function.instructions[0],
            Instruction::AllocateStack(8)
        ));
        let Instruction::Mov { dst: Operand::Stack(a_slot), .. } = function.instructions[1] else {
            panic!("expected a's first write to be a stack slot")
        };
        let Instruction::Mov { src: Operand::Stack(a_again), .. } = function.instructions[2] else {
            panic!("expected a's read to reuse the same slot")
        };
        assert_eq!(a_slot, a_again);
    }

    #[test]
    fn no_allocate_stack_when_no_locals() {
        let function = crate::Function {
            name: Symbol::intern("main"),
            instructions: vec![Instruction::Mov {
                src: Operand::Imm(0),
                dst: Operand::Reg(Reg::Ax),
            }],
        };
        let function = assign_slots(function);
        assert!(!matches!(function.instructions[0], Instruction::AllocateStack(_)));
    }
}
