//! Expression and statement lowering into flat three-address code.

use crate::{BinaryOp, Instruction, TacError, UnaryOp, Value};
use nanoc_par::{self as ast, IncDecOp};
use nanoc_util::Symbol;
use std::collections::HashMap;

/// One loop's `continue`/`break` targets, keyed by the loop label semantic
/// analysis minted for it. A `break`/`continue` node already carries the
/// label of the loop it belongs to (see `nanoc_par::Statement::Break`), so
/// this map only needs to translate that label into the two TAC labels
/// generated for this particular occurrence of the loop — it is not a
/// stack standing in for nesting, nesting is already resolved upstream.
struct LoopLabels {
    continue_label: Symbol,
    break_label: Symbol,
}

pub(crate) struct Emitter {
    instructions: Vec<Instruction>,
    temp_counter: u32,
    label_counter: u32,
    loop_labels: HashMap<Symbol, LoopLabels>,
}

impl Emitter {
    pub(crate) fn new() -> Self {
        Self {
            instructions: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
            loop_labels: HashMap::new(),
        }
    }

    fn fresh_temp(&mut self) -> Symbol {
        let id = self.temp_counter;
        self.temp_counter += 1;
        Symbol::intern(&format!("tmp.{id}"))
    }

    fn fresh_label(&mut self, hint: &str) -> Symbol {
        let id = self.label_counter;
        self.label_counter += 1;
        Symbol::intern(&format!("{hint}.{id}"))
    }

    fn emit(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub(crate) fn lower_function(
        &mut self,
        function: ast::Function,
    ) -> Result<crate::Function, TacError> {
        self.lower_block(function.body)?;

        // Every path through a `void`-returning-adjacent `int main` in
        // this subset falls off the end as if it had `return 0;`.
        if !matches!(self.instructions.last(), Some(Instruction::Return(_))) {
            self.emit(Instruction::Return(Value::Constant(0)));
        }

        Ok(crate::Function {
            name: function.name,
            body: std::mem::take(&mut self.instructions),
        })
    }

    fn lower_block(&mut self, block: ast::Block) -> Result<(), TacError> {
        for item in block.0 {
            match item {
                ast::BlockItem::Decl(decl) => self.lower_declaration(decl)?,
                ast::BlockItem::Stmt(stmt) => self.lower_statement(stmt)?,
            }
        }
        Ok(())
    }

    fn lower_declaration(&mut self, decl: ast::Declaration) -> Result<(), TacError> {
        if let Some(init) = decl.init {
            let value = self.lower_expr(init)?;
            self.emit(Instruction::Copy {
                src: value,
                dst: decl.name,
            });
        }
        Ok(())
    }

    fn lower_statement(&mut self, stmt: ast::Statement) -> Result<(), TacError> {
        match stmt {
            ast::Statement::Return(expr) => {
                let value = self.lower_expr(expr)?;
                self.emit(Instruction::Return(value));
            }
            ast::Statement::Expression(expr) => {
                self.lower_expr(expr)?;
            }
            ast::Statement::Null => {}
            ast::Statement::Compound(block) => self.lower_block(block)?,
            ast::Statement::If {
                cond,
                then_branch,
                else_branch,
            } => self.lower_if(cond, *then_branch, else_branch.map(|b| *b))?,
            ast::Statement::While { cond, body, label, .. } => {
                let label = label.expect("semantic analysis labels every loop");
                self.lower_while(label, cond, *body)?
            }
            ast::Statement::DoWhile { body, cond, label, .. } => {
                let label = label.expect("semantic analysis labels every loop");
                self.lower_do_while(label, *body, cond)?
            }
            ast::Statement::For {
                init,
                cond,
                post,
                body,
                label,
                ..
            } => {
                let label = label.expect("semantic analysis labels every loop");
                self.lower_for(label, init, cond, post, *body)?
            }
            ast::Statement::Break { label, .. } => {
                let label = label.expect("semantic analysis rejects break outside a loop");
                let target = self
                    .loop_labels
                    .get(&label)
                    .expect("loop label was registered when its loop was lowered")
                    .break_label;
                self.emit(Instruction::Jump(target));
            }
            ast::Statement::Continue { label, .. } => {
                let label = label.expect("semantic analysis rejects continue outside a loop");
                let target = self
                    .loop_labels
                    .get(&label)
                    .expect("loop label was registered when its loop was lowered")
                    .continue_label;
                self.emit(Instruction::Jump(target));
            }
        }
        Ok(())
    }

    fn lower_if(
        &mut self,
        cond: ast::Expr,
        then_branch: ast::Statement,
        else_branch: Option<ast::Statement>,
    ) -> Result<(), TacError> {
        let cond_value = self.lower_expr(cond)?;
        match else_branch {
            None => {
                let end_label = self.fresh_label("if_end");
                self.emit(Instruction::JumpIfZero {
                    cond: cond_value,
                    target: end_label,
                });
                self.lower_statement(then_branch)?;
                self.emit(Instruction::Label(end_label));
            }
            Some(else_branch) => {
                let else_label = self.fresh_label("if_else");
                let end_label = self.fresh_label("if_end");
                self.emit(Instruction::JumpIfZero {
                    cond: cond_value,
                    target: else_label,
                });
                self.lower_statement(then_branch)?;
                self.emit(Instruction::Jump(end_label));
                self.emit(Instruction::Label(else_label));
                self.lower_statement(else_branch)?;
                self.emit(Instruction::Label(end_label));
            }
        }
        Ok(())
    }

    fn lower_while(&mut self, label: Symbol, cond: ast::Expr, body: ast::Statement) -> Result<(), TacError> {
        let continue_label = self.fresh_label("while_continue");
        let break_label = self.fresh_label("while_break");

        self.emit(Instruction::Label(continue_label));
        let cond_value = self.lower_expr(cond)?;
        self.emit(Instruction::JumpIfZero {
            cond: cond_value,
            target: break_label,
        });

        self.loop_labels.insert(label, LoopLabels { continue_label, break_label });
        let result = self.lower_statement(body);
        self.loop_labels.remove(&label);
        result?;

        self.emit(Instruction::Jump(continue_label));
        self.emit(Instruction::Label(break_label));
        Ok(())
    }

    fn lower_do_while(&mut self, label: Symbol, body: ast::Statement, cond: ast::Expr) -> Result<(), TacError> {
        let start_label = self.fresh_label("do_start");
        let continue_label = self.fresh_label("do_continue");
        let break_label = self.fresh_label("do_break");

        self.emit(Instruction::Label(start_label));

        self.loop_labels.insert(label, LoopLabels { continue_label, break_label });
        let result = self.lower_statement(body);
        self.loop_labels.remove(&label);
        result?;

        self.emit(Instruction::Label(continue_label));
        let cond_value = self.lower_expr(cond)?;
        self.emit(Instruction::JumpIfNotZero {
            cond: cond_value,
            target: start_label,
        });
        self.emit(Instruction::Label(break_label));
        Ok(())
    }

    fn lower_for(
        &mut self,
        label: Symbol,
        init: ast::ForInit,
        cond: Option<ast::Expr>,
        post: Option<ast::Expr>,
        body: ast::Statement,
    ) -> Result<(), TacError> {
        match init {
            ast::ForInit::Decl(decl) => self.lower_declaration(decl)?,
            ast::ForInit::Expr(Some(expr)) => {
                self.lower_expr(expr)?;
            }
            ast::ForInit::Expr(None) => {}
        }

        let start_label = self.fresh_label("for_start");
        let continue_label = self.fresh_label("for_continue");
        let break_label = self.fresh_label("for_break");

        self.emit(Instruction::Label(start_label));
        if let Some(cond) = cond {
            let cond_value = self.lower_expr(cond)?;
            self.emit(Instruction::JumpIfZero {
                cond: cond_value,
                target: break_label,
            });
        }

        self.loop_labels.insert(label, LoopLabels { continue_label, break_label });
        let result = self.lower_statement(body);
        self.loop_labels.remove(&label);
        result?;

        self.emit(Instruction::Label(continue_label));
        if let Some(post) = post {
            self.lower_expr(post)?;
        }
        self.emit(Instruction::Jump(start_label));
        self.emit(Instruction::Label(break_label));
        Ok(())
    }

    fn lower_expr(&mut self, expr: ast::Expr) -> Result<Value, TacError> {
        match expr {
            ast::Expr::Constant(v) => Ok(Value::Constant(v)),
            ast::Expr::Var(name) => Ok(Value::Var(name)),
            ast::Expr::Unary(op, operand) => {
                let src = self.lower_expr(*operand)?;
                let dst = self.fresh_temp();
                self.emit(Instruction::Unary { op, src, dst });
                Ok(Value::Var(dst))
            }
            ast::Expr::Binary(BinaryOp::LogicalAnd, lhs, rhs) => self.lower_logical_and(*lhs, *rhs),
            ast::Expr::Binary(BinaryOp::LogicalOr, lhs, rhs) => self.lower_logical_or(*lhs, *rhs),
            ast::Expr::Binary(op, lhs, rhs) => {
                let lhs = self.lower_expr(*lhs)?;
                let rhs = self.lower_expr(*rhs)?;
                let dst = self.fresh_temp();
                self.emit(Instruction::Binary { op, lhs, rhs, dst });
                Ok(Value::Var(dst))
            }
            ast::Expr::Assignment { op, lvalue, rhs } => self.lower_assignment(op, *lvalue, *rhs),
            ast::Expr::PrefixIncDec(op, operand) => self.lower_prefix_incdec(op, *operand),
            ast::Expr::PostfixIncDec(op, operand) => self.lower_postfix_incdec(op, *operand),
            ast::Expr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => self.lower_conditional(*cond, *then_expr, *else_expr),
        }
    }

    fn lower_logical_and(&mut self, lhs: ast::Expr, rhs: ast::Expr) -> Result<Value, TacError> {
        let false_label = self.fresh_label("and_false");
        let end_label = self.fresh_label("and_end");
        let dst = self.fresh_temp();

        let lhs_value = self.lower_expr(lhs)?;
        self.emit(Instruction::JumpIfZero {
            cond: lhs_value,
            target: false_label,
        });
        let rhs_value = self.lower_expr(rhs)?;
        self.emit(Instruction::JumpIfZero {
            cond: rhs_value,
            target: false_label,
        });
        self.emit(Instruction::Copy {
            src: Value::Constant(1),
            dst,
        });
        self.emit(Instruction::Jump(end_label));
        self.emit(Instruction::Label(false_label));
        self.emit(Instruction::Copy {
            src: Value::Constant(0),
            dst,
        });
        self.emit(Instruction::Label(end_label));
        Ok(Value::Var(dst))
    }

    fn lower_logical_or(&mut self, lhs: ast::Expr, rhs: ast::Expr) -> Result<Value, TacError> {
        let true_label = self.fresh_label("or_true");
        let end_label = self.fresh_label("or_end");
        let dst = self.fresh_temp();

        let lhs_value = self.lower_expr(lhs)?;
        self.emit(Instruction::JumpIfNotZero {
            cond: lhs_value,
            target: true_label,
        });
        let rhs_value = self.lower_expr(rhs)?;
        self.emit(Instruction::JumpIfNotZero {
            cond: rhs_value,
            target: true_label,
        });
        self.emit(Instruction::Copy {
            src: Value::Constant(0),
            dst,
        });
        self.emit(Instruction::Jump(end_label));
        self.emit(Instruction::Label(true_label));
        self.emit(Instruction::Copy {
            src: Value::Constant(1),
            dst,
        });
        self.emit(Instruction::Label(end_label));
        Ok(Value::Var(dst))
    }

    fn lower_conditional(
        &mut self,
        cond: ast::Expr,
        then_expr: ast::Expr,
        else_expr: ast::Expr,
    ) -> Result<Value, TacError> {
        let else_label = self.fresh_label("cond_else");
        let end_label = self.fresh_label("cond_end");
        let dst = self.fresh_temp();

        let cond_value = self.lower_expr(cond)?;
        self.emit(Instruction::JumpIfZero {
            cond: cond_value,
            target: else_label,
        });
        let then_value = self.lower_expr(then_expr)?;
        self.emit(Instruction::Copy {
            src: then_value,
            dst,
        });
        self.emit(Instruction::Jump(end_label));
        self.emit(Instruction::Label(else_label));
        let else_value = self.lower_expr(else_expr)?;
        self.emit(Instruction::Copy {
            src: else_value,
            dst,
        });
        self.emit(Instruction::Label(end_label));
        Ok(Value::Var(dst))
    }

    fn lower_assignment(
        &mut self,
        op: Option<BinaryOp>,
        lvalue: ast::Expr,
        rhs: ast::Expr,
    ) -> Result<Value, TacError> {
        let ast::Expr::Var(name) = lvalue else {
            unreachable!("semantic analysis rejects non-variable lvalues")
        };
        let rhs_value = self.lower_expr(rhs)?;
        let value = match op {
            None => rhs_value,
            Some(BinaryOp::LogicalAnd) | Some(BinaryOp::LogicalOr) => {
                unreachable!("&&= and ||= do not exist in this language")
            }
            Some(op) => {
                let dst = self.fresh_temp();
                self.emit(Instruction::Binary {
                    op,
                    lhs: Value::Var(name),
                    rhs: rhs_value,
                    dst,
                });
                Value::Var(dst)
            }
        };
        self.emit(Instruction::Copy { src: value, dst: name });
        Ok(Value::Var(name))
    }

    fn lower_prefix_incdec(&mut self, op: IncDecOp, operand: ast::Expr) -> Result<Value, TacError> {
        let ast::Expr::Var(name) = operand else {
            unreachable!("semantic analysis rejects non-variable operands")
        };
        let bin_op = incdec_op(op);
        let dst = self.fresh_temp();
        self.emit(Instruction::Binary {
            op: bin_op,
            lhs: Value::Var(name),
            rhs: Value::Constant(1),
            dst,
        });
        self.emit(Instruction::Copy {
            src: Value::Var(dst),
            dst: name,
        });
        Ok(Value::Var(name))
    }

    fn lower_postfix_incdec(&mut self, op: IncDecOp, operand: ast::Expr) -> Result<Value, TacError> {
        let ast::Expr::Var(name) = operand else {
            unreachable!("semantic analysis rejects non-variable operands")
        };
        let original = self.fresh_temp();
        self.emit(Instruction::Copy {
            src: Value::Var(name),
            dst: original,
        });
        let bin_op = incdec_op(op);
        let updated = self.fresh_temp();
        self.emit(Instruction::Binary {
            op: bin_op,
            lhs: Value::Var(name),
            rhs: Value::Constant(1),
            dst: updated,
        });
        self.emit(Instruction::Copy {
            src: Value::Var(updated),
            dst: name,
        });
        Ok(Value::Var(original))
    }
}

fn incdec_op(op: IncDecOp) -> BinaryOp {
    match op {
        IncDecOp::Increment => BinaryOp::Add,
        IncDecOp::Decrement => BinaryOp::Subtract,
    }
}
