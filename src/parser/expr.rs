//! Precedence-climbing expression grammar (§4.3): 13 tiers from `or` down to
//! primary expressions, each implemented as one method that calls the next
//! tier down for its operands.
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::PipelineError;
use crate::lexer::TokenKind;

use super::Parser;

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, PipelineError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_xor()?;
        while self.check(&TokenKind::Or) {
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_xor()?;
            left = Expr::new(ExprKind::Binary { op: BinaryOp::Or, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    fn parse_xor(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Xor) {
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_and()?;
            left = Expr::new(ExprKind::Binary { op: BinaryOp::Xor, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_equality()?;
        while self.check(&TokenKind::And) {
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_equality()?;
            left = Expr::new(ExprKind::Binary { op: BinaryOp::And, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match &self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Identical => BinaryOp::Identical,
                TokenKind::NotIdentical => BinaryOp::NotIdentical,
                _ => break,
            };
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_relational()?;
            left = Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_is()?;
        loop {
            let op = match &self.current.kind {
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEq => BinaryOp::GreaterEq,
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEq => BinaryOp::LessEq,
                _ => break,
            };
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_is()?;
            left = Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    fn parse_is(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_additive()?;
        while self.check(&TokenKind::Is) {
            let position = self.current.position;
            self.advance()?;
            let ty = self.parse_type()?;
            left = Expr::new(ExprKind::IsType { expr: Box::new(left), ty }, position);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_str_repeat()?;
        loop {
            let op = match &self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_str_repeat()?;
            left = Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    /// `! @`: concat and string-repeat share a precedence tier (§4.3).
    fn parse_str_repeat(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match &self.current.kind {
                TokenKind::At => BinaryOp::StrRepeat,
                TokenKind::Bang => BinaryOp::Concat,
                _ => break,
            };
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, PipelineError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::FloorDiv => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_power()?;
            left = Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Ok(left)
    }

    /// Right-associative: `2 ** 3 ** 2 == 2 ** (3 ** 2)`.
    fn parse_power(&mut self) -> Result<Expr, PipelineError> {
        let left = self.parse_unary()?;
        if self.check(&TokenKind::Pow) {
            let position = self.current.position;
            self.advance()?;
            let right = self.parse_power()?;
            return Ok(Expr::new(ExprKind::Binary { op: BinaryOp::Pow, left: Box::new(left), right: Box::new(right) }, position));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, PipelineError> {
        let op = match &self.current.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let position = self.current.position;
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, position));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, PipelineError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check(&TokenKind::Dot) {
                let position = self.current.position;
                self.advance()?;
                let (field, _) = self.expect_identifier()?;
                expr = Expr::new(ExprKind::FieldAccess { base: Box::new(expr), field }, position);
            } else if self.check(&TokenKind::LBracket) {
                let position = self.current.position;
                self.advance()?;
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                expr = Expr::new(ExprKind::Subscript { base: Box::new(expr), index: Box::new(index) }, position);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, PipelineError> {
        let position = self.current.position;
        match self.current.kind.clone() {
            TokenKind::IntLiteral(value) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::IntLiteral(value), position))
            }
            TokenKind::FloatLiteral(value) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::FloatLiteral(value), position))
            }
            TokenKind::StrLiteral(value) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::StrLiteral(value), position))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Expr::new(ExprKind::BoolLiteral(true), position))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expr::new(ExprKind::BoolLiteral(false), position))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                if self.check(&TokenKind::LParen) {
                    self.parse_call(name, position)
                } else {
                    Ok(Expr::new(ExprKind::Variable(name), position))
                }
            }
            TokenKind::LBrace => self.parse_init_list(position),
            _ => Err(self.syntax_error("an expression")),
        }
    }

    fn parse_call(&mut self, name: String, position: crate::error::Position) -> Result<Expr, PipelineError> {
        self.expect(TokenKind::LParen)?;
        let mut args = vec![];
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Expr::new(ExprKind::Call { name, args }, position))
    }

    /// `{ expr, ... }`: a positional struct literal, the target type left
    /// for the analyzer to infer from context (§4.3, §4.5.9).
    fn parse_init_list(&mut self, position: crate::error::Position) -> Result<Expr, PipelineError> {
        self.expect(TokenKind::LBrace)?;
        let mut values = vec![];
        while !self.check(&TokenKind::RBrace) {
            values.push(self.parse_expr()?);
            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::InitList(values), position))
    }
}
