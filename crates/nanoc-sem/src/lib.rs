//! Semantic analysis: variable resolution, alpha-renaming, and loop-context
//! validation over the parsed AST.
//!
//! This pass rewrites every `Declaration` and `Expr::Var` to use a unique
//! name (`x` becomes `x.0`, a shadowing redeclaration becomes `x.1`, and so
//! on) so later stages never have to reason about scoping again — by the
//! time TAC generation runs, two identifiers compare equal iff they refer
//! to the same variable.

mod scope;

use nanoc_par::{Block, BlockItem, Declaration, Expr, ForInit, Function, Program, Statement};
use nanoc_util::{Span, Symbol};
use scope::{RibKind, Scopes};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemError {
    #[error("redeclaration of '{name}' in the same scope (line {line})")]
    DuplicateDecl { name: String, line: u32 },

    #[error("use of undeclared identifier '{name}'")]
    UndeclaredVar { name: String },

    #[error("expression is not assignable")]
    InvalidLValue,

    #[error("'break' statement not within a loop (line {line})")]
    BreakOutsideLoop { line: u32 },

    #[error("'continue' statement not within a loop (line {line})")]
    ContinueOutsideLoop { line: u32 },
}

/// Resolves names and validates loop-control placement in `program`,
/// returning a rewritten program in which every identifier is unique.
///
/// # Examples
///
/// ```
/// use nanoc_lex::tokenize;
/// use nanoc_par::parse;
/// use nanoc_sem::analyze;
///
/// let tokens = tokenize("int main(void) { int x = 1; return x; }").unwrap();
/// let program = parse(tokens).unwrap();
/// let resolved = analyze(program).unwrap();
/// assert_eq!(resolved.function.name.as_str(), "main");
/// ```
pub fn analyze(program: Program) -> Result<Program, SemError> {
    let mut resolver = Resolver::new();
    let function = resolver.resolve_function(program.function)?;
    Ok(Program { function })
}

struct Resolver {
    scopes: Scopes,
    next_id: u32,
    next_loop_id: u32,
}

impl Resolver {
    fn new() -> Self {
        Self {
            scopes: Scopes::new(),
            next_id: 0,
            next_loop_id: 0,
        }
    }

    fn fresh_name(&mut self, base: Symbol) -> Symbol {
        let id = self.next_id;
        self.next_id += 1;
        Symbol::intern(&format!("{base}.{id}"))
    }

    /// Mints a fresh label naming one loop, so `nanoc-tac` can read the
    /// label a `break`/`continue` targets straight off the AST node
    /// instead of re-deriving loop nesting from scratch.
    fn fresh_loop_label(&mut self) -> Symbol {
        let id = self.next_loop_id;
        self.next_loop_id += 1;
        Symbol::intern(&format!("loop.{id}"))
    }

    fn resolve_function(&mut self, function: Function) -> Result<Function, SemError> {
        let body = self.resolve_block(function.body)?;
        Ok(Function { body, ..function })
    }

    fn resolve_block(&mut self, block: Block) -> Result<Block, SemError> {
        let items = block
            .0
            .into_iter()
            .map(|item| self.resolve_block_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block(items))
    }

    fn resolve_block_item(&mut self, item: BlockItem) -> Result<BlockItem, SemError> {
        match item {
            BlockItem::Decl(decl) => Ok(BlockItem::Decl(self.resolve_declaration(decl)?)),
            BlockItem::Stmt(stmt) => Ok(BlockItem::Stmt(self.resolve_statement(stmt)?)),
        }
    }

    fn resolve_declaration(&mut self, decl: Declaration) -> Result<Declaration, SemError> {
        // Resolve the initializer before binding the new name, so
        // `int x = x;` refers to an outer `x`, never to itself.
        let init = decl.init.map(|e| self.resolve_expr(e)).transpose()?;

        let unique = self.fresh_name(decl.name);
        if !self.scopes.declare(decl.name, unique) {
            return Err(SemError::DuplicateDecl {
                name: decl.name.to_string(),
                line: decl.span.line,
            });
        }

        Ok(Declaration {
            name: unique,
            init,
            span: decl.span,
        })
    }

    fn resolve_statement(&mut self, stmt: Statement) -> Result<Statement, SemError> {
        match stmt {
            Statement::Return(e) => Ok(Statement::Return(self.resolve_expr(e)?)),
            Statement::Expression(e) => Ok(Statement::Expression(self.resolve_expr(e)?)),
            Statement::Null => Ok(Statement::Null),
            Statement::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.resolve_expr(cond)?;
                let then_branch = Box::new(self.resolve_statement(*then_branch)?);
                let else_branch = else_branch
                    .map(|e| self.resolve_statement(*e))
                    .transpose()?
                    .map(Box::new);
                Ok(Statement::If {
                    cond,
                    then_branch,
                    else_branch,
                })
            }
            Statement::Compound(block) => {
                self.scopes.push(RibKind::Block);
                let block = self.resolve_block(block);
                self.scopes.pop();
                Ok(Statement::Compound(block?))
            }
            Statement::Break { span, .. } => match self.scopes.innermost_loop_label() {
                Some(label) => Ok(Statement::Break { span, label: Some(label) }),
                None => Err(SemError::BreakOutsideLoop { line: span.line }),
            },
            Statement::Continue { span, .. } => match self.scopes.innermost_loop_label() {
                Some(label) => Ok(Statement::Continue { span, label: Some(label) }),
                None => Err(SemError::ContinueOutsideLoop { line: span.line }),
            },
            Statement::While { cond, body, span, .. } => {
                let cond = self.resolve_expr(cond)?;
                let label = self.fresh_loop_label();
                self.scopes.push(RibKind::Loop(label));
                let body = self.resolve_statement(*body);
                self.scopes.pop();
                Ok(Statement::While {
                    cond,
                    body: Box::new(body?),
                    span,
                    label: Some(label),
                })
            }
            Statement::DoWhile { body, cond, span, .. } => {
                let label = self.fresh_loop_label();
                self.scopes.push(RibKind::Loop(label));
                let body = self.resolve_statement(*body);
                self.scopes.pop();
                let body = body?;
                let cond = self.resolve_expr(cond)?;
                Ok(Statement::DoWhile {
                    body: Box::new(body),
                    cond,
                    span,
                    label: Some(label),
                })
            }
            Statement::For {
                init,
                cond,
                post,
                body,
                span,
                ..
            } => self.resolve_for(init, cond, post, body, span),
        }
    }

    fn resolve_for(
        &mut self,
        init: ForInit,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Box<Statement>,
        span: Span,
    ) -> Result<Statement, SemError> {
        self.scopes.push(RibKind::Block);

        let resolve_rest = |this: &mut Self| -> Result<Statement, SemError> {
            let init = match init {
                ForInit::Decl(decl) => ForInit::Decl(this.resolve_declaration(decl)?),
                ForInit::Expr(Some(e)) => ForInit::Expr(Some(this.resolve_expr(e)?)),
                ForInit::Expr(None) => ForInit::Expr(None),
            };
            let cond = cond.map(|c| this.resolve_expr(c)).transpose()?;

            let label = this.fresh_loop_label();
            this.scopes.push(RibKind::Loop(label));
            let body_result = this.resolve_statement(*body);
            this.scopes.pop();
            let body = Box::new(body_result?);

            // `post` runs in the header scope (sees the loop variable) but
            // after the body's own nested scope has already closed.
            let post = post.map(|p| this.resolve_expr(p)).transpose()?;

            Ok(Statement::For {
                init,
                cond,
                post,
                body,
                span,
                label: Some(label),
            })
        };

        let result = resolve_rest(self);
        self.scopes.pop();
        result
    }

    fn resolve_expr(&mut self, expr: Expr) -> Result<Expr, SemError> {
        match expr {
            Expr::Constant(v) => Ok(Expr::Constant(v)),
            Expr::Var(name) => match self.scopes.resolve(name) {
                Some(unique) => Ok(Expr::Var(unique)),
                None => Err(SemError::UndeclaredVar {
                    name: name.to_string(),
                }),
            },
            Expr::Unary(op, operand) => {
                Ok(Expr::Unary(op, Box::new(self.resolve_expr(*operand)?)))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.resolve_expr(*lhs)?;
                let rhs = self.resolve_expr(*rhs)?;
                Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
            }
            Expr::Assignment { op, lvalue, rhs } => {
                require_lvalue(&lvalue)?;
                let lvalue = self.resolve_expr(*lvalue)?;
                let rhs = self.resolve_expr(*rhs)?;
                Ok(Expr::Assignment {
                    op,
                    lvalue: Box::new(lvalue),
                    rhs: Box::new(rhs),
                })
            }
            Expr::PrefixIncDec(op, operand) => {
                require_lvalue(&operand)?;
                Ok(Expr::PrefixIncDec(op, Box::new(self.resolve_expr(*operand)?)))
            }
            Expr::PostfixIncDec(op, operand) => {
                require_lvalue(&operand)?;
                Ok(Expr::PostfixIncDec(op, Box::new(self.resolve_expr(*operand)?)))
            }
            Expr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond = self.resolve_expr(*cond)?;
                let then_expr = self.resolve_expr(*then_expr)?;
                let else_expr = self.resolve_expr(*else_expr)?;
                Ok(Expr::Conditional {
                    cond: Box::new(cond),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                })
            }
        }
    }
}

fn require_lvalue(expr: &Expr) -> Result<(), SemError> {
    match expr {
        Expr::Var(_) => Ok(()),
        _ => Err(SemError::InvalidLValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_lex::tokenize;
    use nanoc_par::parse;

    fn analyze_source(source: &str) -> Result<Program, SemError> {
        analyze(parse(tokenize(source).unwrap()).unwrap())
    }

    #[test]
    fn shadowing_in_a_nested_block_gets_distinct_names() {
        let program =
            analyze_source("int main(void) { int x = 1; { int x = 2; } return x; }").unwrap();
        let BlockItem::Decl(outer) = &program.function.body.0[0] else {
            panic!()
        };
        assert_eq!(outer.name.as_str(), "x.0");
    }

    #[test]
    fn duplicate_declaration_in_same_scope_is_rejected() {
        let err = analyze_source("int main(void) { int x = 1; int x = 2; return x; }")
            .unwrap_err();
        assert!(matches!(err, SemError::DuplicateDecl { .. }));
    }

    #[test]
    fn undeclared_variable_is_rejected() {
        let err = analyze_source("int main(void) { return y; }").unwrap_err();
        assert!(matches!(err, SemError::UndeclaredVar { .. }));
    }

    #[test]
    fn assigning_to_a_constant_is_an_invalid_lvalue() {
        let err = analyze_source("int main(void) { 1 = 2; return 0; }").unwrap_err();
        assert!(matches!(err, SemError::InvalidLValue));
    }

    #[test]
    fn break_outside_a_loop_is_rejected() {
        let err = analyze_source("int main(void) { break; return 0; }").unwrap_err();
        assert!(matches!(err, SemError::BreakOutsideLoop { .. }));
    }

    #[test]
    fn continue_inside_nested_block_within_loop_is_accepted() {
        let program = analyze_source(
            "int main(void) { while (1) { if (1) { continue; } } return 0; }",
        );
        assert!(program.is_ok());
    }

    #[test]
    fn for_loop_variable_is_visible_in_cond_and_post_but_not_after() {
        let program =
            analyze_source("int main(void) { for (int i = 0; i < 1; i = i + 1) {} return 0; }")
                .unwrap();
        assert!(matches!(
            program.function.body.0[0],
            BlockItem::Stmt(Statement::For { .. })
        ));
    }

    #[test]
    fn for_loop_variable_does_not_leak_past_the_loop() {
        let err = analyze_source("int main(void) { for (int i = 0; i < 1; i = i + 1) {} return i; }")
            .unwrap_err();
        assert!(matches!(err, SemError::UndeclaredVar { .. }));
    }

    #[test]
    fn break_is_resolved_to_its_enclosing_loop_label() {
        let program = analyze_source("int main(void) { while (1) { break; } return 0; }").unwrap();
        let BlockItem::Stmt(Statement::While { body, label: while_label, .. }) =
            &program.function.body.0[0]
        else {
            panic!("expected a while loop");
        };
        let Statement::Break { label: break_label, .. } = body.as_ref() else {
            panic!("expected a break statement");
        };
        assert!(while_label.is_some());
        assert_eq!(break_label, while_label);
    }

    #[test]
    fn nested_loops_resolve_break_to_the_innermost_label() {
        let program = analyze_source(
            "int main(void) { while (1) { while (1) { break; } break; } return 0; }",
        )
        .unwrap();
        let BlockItem::Stmt(Statement::While { body: outer_body, label: outer_label, .. }) =
            &program.function.body.0[0]
        else {
            panic!("expected the outer while loop");
        };
        let Statement::Compound(outer_block) = outer_body.as_ref() else {
            panic!("expected a compound body");
        };
        let inner_label = match &outer_block.0[0] {
            BlockItem::Stmt(Statement::While { label, .. }) => *label,
            other => panic!("expected the inner while loop, got {other:?}"),
        };
        let outer_break_label = match &outer_block.0[1] {
            BlockItem::Stmt(Statement::Break { label, .. }) => *label,
            other => panic!("expected the outer break, got {other:?}"),
        };
        assert_ne!(inner_label, *outer_label);
        assert_eq!(outer_break_label, *outer_label);
    }
}
