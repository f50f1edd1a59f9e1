//! Expression parsing via precedence climbing.
//!
//! Binary operators, assignment, and the ternary `?:` all share one loop:
//! each gets a binding power in [`bp`], and the loop keeps folding the
//! right-hand side in as long as the next operator binds at least as
//! tightly as the minimum the caller asked for.

use crate::ast::*;
use crate::{ParseError, Parser};
use nanoc_lex::Token;

/// Binding powers, lowest to highest. Assignment and the ternary operator
/// are right-associative (the recursive call reuses the same minimum);
/// everything else is left-associative (the recursive call requires one
/// more than the operator's own power).
#[doc(hidden)]
pub mod bp {
    pub const ASSIGNMENT: u8 = 1;
    pub const TERNARY: u8 = 3;
    pub const LOGICAL_OR: u8 = 5;
    pub const LOGICAL_AND: u8 = 10;
    pub const BITWISE_OR: u8 = 15;
    pub const BITWISE_XOR: u8 = 20;
    pub const BITWISE_AND: u8 = 25;
    pub const EQUALITY: u8 = 30;
    pub const RELATIONAL: u8 = 35;
    pub const SHIFT: u8 = 40;
    pub const ADDITIVE: u8 = 45;
    pub const MULTIPLICATIVE: u8 = 50;
}

/// Compound-assignment tokens paired with the binary operator they desugar
/// around, e.g. `a += b` parses as `Assignment { op: Some(Add), ... }`.
fn compound_assign_op(token: Token) -> Option<BinaryOp> {
    Some(match token {
        Token::PlusEq => BinaryOp::Add,
        Token::MinusEq => BinaryOp::Subtract,
        Token::StarEq => BinaryOp::Multiply,
        Token::SlashEq => BinaryOp::Divide,
        Token::PercentEq => BinaryOp::Remainder,
        Token::AmpEq => BinaryOp::BitwiseAnd,
        Token::PipeEq => BinaryOp::BitwiseOr,
        Token::CaretEq => BinaryOp::BitwiseXor,
        Token::ShlEq => BinaryOp::ShiftLeft,
        Token::ShrEq => BinaryOp::ShiftRight,
        _ => return None,
    })
}

fn binary_op(token: Token) -> Option<(BinaryOp, u8)> {
    Some(match token {
        Token::Star => (BinaryOp::Multiply, bp::MULTIPLICATIVE),
        Token::Slash => (BinaryOp::Divide, bp::MULTIPLICATIVE),
        Token::Percent => (BinaryOp::Remainder, bp::MULTIPLICATIVE),
        Token::Plus => (BinaryOp::Add, bp::ADDITIVE),
        Token::Minus => (BinaryOp::Subtract, bp::ADDITIVE),
        Token::Shl => (BinaryOp::ShiftLeft, bp::SHIFT),
        Token::Shr => (BinaryOp::ShiftRight, bp::SHIFT),
        Token::Lt => (BinaryOp::LessThan, bp::RELATIONAL),
        Token::LtEq => (BinaryOp::LessOrEqual, bp::RELATIONAL),
        Token::Gt => (BinaryOp::GreaterThan, bp::RELATIONAL),
        Token::GtEq => (BinaryOp::GreaterOrEqual, bp::RELATIONAL),
        Token::EqEq => (BinaryOp::Equal, bp::EQUALITY),
        Token::NotEq => (BinaryOp::NotEqual, bp::EQUALITY),
        Token::Amp => (BinaryOp::BitwiseAnd, bp::BITWISE_AND),
        Token::Caret => (BinaryOp::BitwiseXor, bp::BITWISE_XOR),
        Token::Pipe => (BinaryOp::BitwiseOr, bp::BITWISE_OR),
        Token::AmpAmp => (BinaryOp::LogicalAnd, bp::LOGICAL_AND),
        Token::PipePipe => (BinaryOp::LogicalOr, bp::LOGICAL_OR),
        _ => return None,
    })
}

impl Parser {
    pub(crate) fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let token = self.peek();

            if token == Token::Eq || compound_assign_op(token).is_some() {
                if bp::ASSIGNMENT < min_bp {
                    break;
                }
                let op = compound_assign_op(token);
                self.advance();
                let rhs = self.parse_expression(bp::ASSIGNMENT)?;
                left = Expr::Assignment {
                    op,
                    lvalue: Box::new(left),
                    rhs: Box::new(rhs),
                };
                continue;
            }

            if token == Token::Question {
                if bp::TERNARY < min_bp {
                    break;
                }
                self.advance();
                let then_expr = self.parse_expression(0)?;
                self.expect(Token::Colon)?;
                let else_expr = self.parse_expression(bp::TERNARY)?;
                left = Expr::Conditional {
                    cond: Box::new(left),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                };
                continue;
            }

            if let Some((op, prec)) = binary_op(token) {
                if prec < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expression(prec + 1)?;
                left = Expr::Binary(op, Box::new(left), Box::new(rhs));
                continue;
            }

            break;
        }

        Ok(left)
    }

    /// Prefix operators (`-`, `~`, `!`, `++`, `--`) and postfix `++`/`--`,
    /// bottoming out at a primary expression.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                Ok(Expr::Unary(UnaryOp::Negate, Box::new(self.parse_unary()?)))
            }
            Token::Tilde => {
                self.advance();
                Ok(Expr::Unary(
                    UnaryOp::Complement,
                    Box::new(self.parse_unary()?),
                ))
            }
            Token::Bang => {
                self.advance();
                Ok(Expr::Unary(UnaryOp::Not, Box::new(self.parse_unary()?)))
            }
            Token::PlusPlus => {
                self.advance();
                Ok(Expr::PrefixIncDec(
                    IncDecOp::Increment,
                    Box::new(self.parse_unary()?),
                ))
            }
            Token::MinusMinus => {
                self.advance();
                Ok(Expr::PrefixIncDec(
                    IncDecOp::Decrement,
                    Box::new(self.parse_unary()?),
                ))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Token::PlusPlus => {
                    self.advance();
                    expr = Expr::PostfixIncDec(IncDecOp::Increment, Box::new(expr));
                }
                Token::MinusMinus => {
                    self.advance();
                    expr = Expr::PostfixIncDec(IncDecOp::Decrement, Box::new(expr));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Constant(value) => {
                self.advance();
                Ok(Expr::Constant(value))
            }
            Token::Ident(sym) => {
                self.advance();
                Ok(Expr::Var(sym))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression(0)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Eof => Err(ParseError::UnexpectedEof {
                expected: "expression".to_string(),
            }),
            other => Err(ParseError::Unexpected {
                expected: "expression".to_string(),
                found: other.describe(),
                line: self.span().line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_lex::tokenize;
    use nanoc_util::Symbol;

    fn parse_expr(source: &str) -> Expr {
        let tokens = tokenize(&format!("int f(void) {{ return {source}; }}")).unwrap();
        let program = crate::parse(tokens).unwrap();
        match &program.function.body.0[0] {
            BlockItem::Stmt(Statement::Return(expr)) => expr.clone(),
            other => panic!("expected a return statement, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expr::Binary(BinaryOp::Add, _, rhs) => {
                assert!(matches!(*rhs, Expr::Binary(BinaryOp::Multiply, _, _)));
            }
            other => panic!("expected addition at the top, got {other:?}"),
        }
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expr = parse_expr("1 - 2 - 3");
        match expr {
            Expr::Binary(BinaryOp::Subtract, lhs, _) => {
                assert!(matches!(*lhs, Expr::Binary(BinaryOp::Subtract, _, _)));
            }
            other => panic!("expected subtraction at the top, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let expr = parse_expr("a = b = 3");
        match expr {
            Expr::Assignment { rhs, .. } => {
                assert!(matches!(*rhs, Expr::Assignment { .. }));
            }
            other => panic!("expected assignment at the top, got {other:?}"),
        }
    }

    #[test]
    fn compound_assignment_carries_its_operator() {
        let expr = parse_expr("a += 1");
        match expr {
            Expr::Assignment { op: Some(BinaryOp::Add), .. } => {}
            other => panic!("expected += to carry Add, got {other:?}"),
        }
    }

    #[test]
    fn ternary_is_right_associative_and_binds_looser_than_logical_or() {
        let expr = parse_expr("a || b ? 1 : 2");
        match expr {
            Expr::Conditional { cond, .. } => {
                assert!(matches!(*cond, Expr::Binary(BinaryOp::LogicalOr, _, _)));
            }
            other => panic!("expected a conditional at the top, got {other:?}"),
        }
    }

    #[test]
    fn postfix_increment_wraps_the_operand() {
        let expr = parse_expr("x++");
        assert!(matches!(
            expr,
            Expr::PostfixIncDec(IncDecOp::Increment, operand)
                if matches!(*operand, Expr::Var(s) if s == Symbol::intern("x"))
        ));
    }

    #[test]
    fn unary_negation_of_a_parenthesized_expression() {
        let expr = parse_expr("-(1 + 2)");
        assert!(matches!(expr, Expr::Unary(UnaryOp::Negate, inner)
            if matches!(*inner, Expr::Binary(BinaryOp::Add, _, _))));
    }
}
