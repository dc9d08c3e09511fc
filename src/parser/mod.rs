//! Recursive-descent parser (§4.3): token stream -> [`Document`].
mod expr;

use crate::ast::*;
use crate::error::{PipelineError, PipelineErrorKind, Position};
use crate::lexer::{CommentFilter, Lexer, Token, TokenKind};

fn same_kind(a: &TokenKind, b: &TokenKind) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

pub struct Parser<'a> {
    filter: CommentFilter<'a>,
    current: Token,
    /// One token of lookahead, filled lazily; needed to tell a declaration
    /// (`Point p = ...;`) apart from an expression statement starting with
    /// the same leading identifier (`p = ...;`, `p();`).
    peeked: Option<Token>,
    file: String,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, file: impl Into<String>) -> Result<Self, PipelineError> {
        let file = file.into();
        let lexer = Lexer::new(source, file.clone())?;
        let mut filter = CommentFilter::new(lexer);
        let current = filter.next_token()?;
        Ok(Parser { filter, current, peeked: None, file })
    }

    fn syntax_error(&self, expected: impl Into<String>) -> PipelineError {
        PipelineError::new(
            PipelineErrorKind::SyntaxError,
            format!("Expected {}, got {}", expected.into(), self.current.kind),
            self.file.clone(),
            self.current.position,
        )
    }

    fn peek(&mut self) -> Result<&Token, PipelineError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.filter.next_token()?);
        }
        Ok(self.peeked.as_ref().unwrap())
    }

    fn advance(&mut self) -> Result<Token, PipelineError> {
        let consumed = self.current.clone();
        self.current = match self.peeked.take() {
            Some(token) => token,
            None => self.filter.next_token()?,
        };
        Ok(consumed)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        same_kind(&self.current.kind, kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, PipelineError> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.syntax_error(kind.to_string()))
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, Position), PipelineError> {
        if let TokenKind::Identifier(name) = self.current.kind.clone() {
            let position = self.current.position;
            self.advance()?;
            Ok((name, position))
        } else {
            Err(self.syntax_error("identifier"))
        }
    }

    fn expect_string(&mut self) -> Result<String, PipelineError> {
        if let TokenKind::StrLiteral(value) = self.current.kind.clone() {
            self.advance()?;
            Ok(value)
        } else {
            Err(self.syntax_error("string literal"))
        }
    }

    /// Parses one source file into an unresolved [`Document`] (includes are
    /// left for the include resolver).
    pub fn parse_document(&mut self) -> Result<Document, PipelineError> {
        let mut document = Document::default();
        while !self.check(&TokenKind::Eot) {
            match &self.current.kind {
                TokenKind::Include => document.includes.push(self.parse_include()?),
                TokenKind::Struct => document.structs.push(self.parse_struct()?),
                TokenKind::Variant => document.variants.push(self.parse_variant()?),
                TokenKind::Func => document.functions.push(self.parse_function()?),
                _ => return Err(self.syntax_error("'include', 'struct', 'variant' or 'func'")),
            }
        }
        Ok(document)
    }

    fn parse_include(&mut self) -> Result<IncludePath, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::Include)?;
        let path = self.expect_string()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(IncludePath { path, position })
    }

    fn parse_type(&mut self) -> Result<Type, PipelineError> {
        let ty = match &self.current.kind {
            TokenKind::KwInt => Type::Int,
            TokenKind::KwFloat => Type::Float,
            TokenKind::KwBool => Type::Bool,
            TokenKind::KwStr => Type::Str,
            TokenKind::Identifier(name) => Type::Named(name.clone()),
            _ => return Err(self.syntax_error("a type")),
        };
        self.advance()?;
        Ok(ty)
    }

    fn parse_field(&mut self) -> Result<Field, PipelineError> {
        let position = self.current.position;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Field { name, ty, position })
    }

    fn parse_field_list(&mut self) -> Result<Vec<Field>, PipelineError> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = vec![];
        while !self.check(&TokenKind::RBrace) {
            fields.push(self.parse_field()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(fields)
    }

    fn parse_struct(&mut self) -> Result<StructDecl, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::Struct)?;
        let (name, _) = self.expect_identifier()?;
        let fields = self.parse_field_list()?;
        Ok(StructDecl { name, fields, position, file: self.file.clone() })
    }

    fn parse_variant(&mut self) -> Result<VariantDecl, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::Variant)?;
        let (name, _) = self.expect_identifier()?;
        let fields = self.parse_field_list()?;
        Ok(VariantDecl { name, fields, position, file: self.file.clone() })
    }

    fn parse_param(&mut self) -> Result<Param, PipelineError> {
        let position = self.current.position;
        let ty = self.parse_type()?;
        let mutable = if self.check(&TokenKind::Dollar) {
            self.advance()?;
            true
        } else {
            false
        };
        let (name, _) = self.expect_identifier()?;
        Ok(Param { name, ty, mutable, position })
    }

    fn parse_function(&mut self) -> Result<FunctionDecl, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::Func)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let mut params = vec![];
        while !self.check(&TokenKind::RParen) {
            params.push(self.parse_param()?);
            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.check(&TokenKind::Arrow) {
            self.advance()?;
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(FunctionDecl { name, params, return_type, body, position, file: self.file.clone() })
    }

    fn parse_block(&mut self) -> Result<Vec<Instr>, PipelineError> {
        self.expect(TokenKind::LBrace)?;
        let mut instrs = vec![];
        while !self.check(&TokenKind::RBrace) {
            instrs.push(self.parse_instr()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(instrs)
    }

    /// A statement starting with a type keyword always begins a variable
    /// declaration. One starting with an identifier is ambiguous between a
    /// declaration with a named type (`Point p = ...;`) and an expression
    /// statement or assignment referring to a variable named `Point`
    /// (`Point = 1;`, `Point();`) — resolved with one token of lookahead:
    /// a second identifier immediately after the first means declaration.
    fn parse_instr(&mut self) -> Result<Instr, PipelineError> {
        let position = self.current.position;

        if matches!(self.current.kind, TokenKind::Identifier(_)) && matches!(self.peek()?.kind, TokenKind::Identifier(_)) {
            return self.parse_var_decl(false);
        }

        match &self.current.kind {
            TokenKind::Dollar => self.parse_var_decl(true),
            TokenKind::KwInt | TokenKind::KwFloat | TokenKind::KwBool | TokenKind::KwStr => {
                self.parse_var_decl(false)
            }
            TokenKind::Return => {
                self.advance()?;
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(Instr::new(InstrKind::Return(value), position))
            }
            TokenKind::Break => {
                self.advance()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Instr::new(InstrKind::Break, position))
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Instr::new(InstrKind::Continue, position))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            _ => self.parse_assign_or_expr_stmt(),
        }
    }

    fn parse_var_decl(&mut self, leading_dollar: bool) -> Result<Instr, PipelineError> {
        let position = self.current.position;
        let mutable = if leading_dollar {
            self.expect(TokenKind::Dollar)?;
            true
        } else if self.check(&TokenKind::Dollar) {
            self.advance()?;
            true
        } else {
            false
        };
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Instr::new(InstrKind::VarDecl { name, ty, mutable, value }, position))
    }

    fn parse_assignable(&mut self) -> Result<Assignable, PipelineError> {
        let position = self.current.position;
        let (base, _) = self.expect_identifier()?;
        let mut path = vec![];
        while self.check(&TokenKind::Dot) {
            self.advance()?;
            let (field, _) = self.expect_identifier()?;
            path.push(field);
        }
        Ok(Assignable { base, path, position })
    }

    /// Disambiguates `name = expr;` / `name.field = expr;` (assignment)
    /// from a bare expression statement (`name();`) by parsing a full
    /// expression first and only reinterpreting it as an l-value if `=`
    /// follows — the l-value grammar is a strict subset of the expression
    /// grammar (a chain of field accesses on a variable).
    fn parse_assign_or_expr_stmt(&mut self) -> Result<Instr, PipelineError> {
        let position = self.current.position;
        let expr = self.parse_expr()?;
        if self.check(&TokenKind::Assign) {
            let target = assignable_from_expr(&expr, &self.file)?;
            self.advance()?;
            let value = self.parse_expr()?;
            self.expect(TokenKind::Semicolon)?;
            Ok(Instr::new(InstrKind::Assign { target, value }, position))
        } else {
            self.expect(TokenKind::Semicolon)?;
            Ok(Instr::new(InstrKind::ExprStmt(expr), position))
        }
    }

    /// A condition is a declaration-condition (`Type name = expr`) when it
    /// opens with a type keyword, or an identifier immediately followed by
    /// another identifier; otherwise it is a plain boolean expression.
    fn parse_condition(&mut self) -> Result<Condition, PipelineError> {
        let position = self.current.position;
        let looks_like_decl = matches!(
            self.current.kind,
            TokenKind::KwInt | TokenKind::KwFloat | TokenKind::KwBool | TokenKind::KwStr
        ) || (matches!(self.current.kind, TokenKind::Identifier(_)) && matches!(self.peek()?.kind, TokenKind::Identifier(_)));

        if looks_like_decl {
            let ty = self.parse_type()?;
            let (name, _) = self.expect_identifier()?;
            self.expect(TokenKind::Assign)?;
            let value = self.parse_expr()?;
            Ok(Condition::Declaration { ty, name, value, position })
        } else {
            Ok(Condition::Expr(self.parse_expr()?))
        }
    }

    fn parse_if(&mut self) -> Result<Instr, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_condition()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        let mut branches = vec![(cond, body)];

        while self.check(&TokenKind::Elif) {
            self.advance()?;
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_condition()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            branches.push((cond, body));
        }

        let else_body = if self.check(&TokenKind::Else) {
            self.advance()?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Instr::new(InstrKind::If { branches, else_body }, position))
    }

    fn parse_while(&mut self) -> Result<Instr, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Instr::new(InstrKind::While { cond, body }, position))
    }

    fn parse_do_while(&mut self) -> Result<Instr, PipelineError> {
        let position = self.current.position;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block()?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Instr::new(InstrKind::DoWhile { body, cond }, position))
    }
}

/// Reinterprets a parsed expression as an assignment target. Only a bare
/// variable or a chain of field accesses on one qualifies (§4.3).
fn assignable_from_expr(expr: &Expr, file: &str) -> Result<Assignable, PipelineError> {
    fn collect(expr: &Expr, path: &mut Vec<String>) -> Option<String> {
        match &expr.kind {
            ExprKind::Variable(name) => Some(name.clone()),
            ExprKind::FieldAccess { base, field } => {
                let base_name = collect(base, path)?;
                path.push(field.clone());
                Some(base_name)
            }
            _ => None,
        }
    }

    let mut path = vec![];
    match collect(expr, &mut path) {
        Some(base) => Ok(Assignable { base, path, position: expr.position }),
        None => Err(PipelineError::new(
            PipelineErrorKind::SyntaxError,
            "Left-hand side of assignment must be a variable or field access",
            file.to_owned(),
            expr.position,
        )),
    }
}
