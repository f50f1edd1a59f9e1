//! Statement parsing: return, if/else, compound, loops, break/continue.

use crate::ast::*;
use crate::{ParseError, Parser};
use nanoc_lex::Token;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek() {
            Token::Return => {
                self.advance();
                let expr = self.parse_expression(0)?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Return(expr))
            }
            Token::If => self.parse_if_statement(),
            Token::LBrace => Ok(Statement::Compound(self.parse_block()?)),
            Token::Break => {
                let span = self.advance().span;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Break { span, label: None })
            }
            Token::Continue => {
                let span = self.advance().span;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Continue { span, label: None })
            }
            Token::While => self.parse_while_statement(),
            Token::Do => self.parse_do_while_statement(),
            Token::For => self.parse_for_statement(),
            Token::Semicolon => {
                self.advance();
                Ok(Statement::Null)
            }
            _ => {
                let expr = self.parse_expression(0)?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Expression(expr))
            }
        }
    }

    /// `if (cond) then [else else_branch]`.
    ///
    /// The dangling-`else` ambiguity resolves itself here: because this
    /// function greedily consumes an `else` right after parsing `then`,
    /// an `else` always binds to the nearest enclosing `if`.
    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expression(0)?;
        self.expect(Token::RParen)?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        let span = self.span();
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expression(0)?;
        self.expect(Token::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { cond, body, span, label: None })
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, ParseError> {
        let span = self.span();
        self.expect(Token::Do)?;
        let body = Box::new(self.parse_statement()?);
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expression(0)?;
        self.expect(Token::RParen)?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::DoWhile { body, cond, span, label: None })
    }

    fn parse_for_statement(&mut self) -> Result<Statement, ParseError> {
        let span = self.span();
        self.expect(Token::For)?;
        self.expect(Token::LParen)?;

        let init = if self.check(Token::Int) {
            ForInit::Decl(self.parse_declaration()?)
        } else if self.eat(Token::Semicolon) {
            ForInit::Expr(None)
        } else {
            let expr = self.parse_expression(0)?;
            self.expect(Token::Semicolon)?;
            ForInit::Expr(Some(expr))
        };

        let cond = if self.check(Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression(0)?)
        };
        self.expect(Token::Semicolon)?;

        let post = if self.check(Token::RParen) {
            None
        } else {
            Some(self.parse_expression(0)?)
        };
        self.expect(Token::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For {
            init,
            cond,
            post,
            body,
            span,
            label: None,
        })
    }
}
