use crate::error::Position;

use super::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Eq,
    NotEq,
    Identical,
    NotIdentical,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Or,
    And,
    Xor,
    /// `str @ int`: repeat a string `n` times (§4.5, GLOSSARY).
    StrRepeat,
    /// `! `: string concatenation, both operands cast to `str` (§4.5).
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i32),
    FloatLiteral(f64),
    BoolLiteral(bool),
    StrLiteral(String),
    Variable(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `expr is TYPE`: true if the variant expression's active field has the
    /// given type (§4.5.7).
    IsType {
        expr: Box<Expr>,
        ty: Type,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// `{ expr, ... }`: a positional struct literal. The target struct is
    /// inferred from context (declared type, parameter, return type); a
    /// literal reached only through a variant field must be wrapped in an
    /// explicit `VariantName({...})` call instead (§4.5.9).
    InitList(Vec<Expr>),
    /// `base.field[.field...]`, used for both reading a field and narrowed
    /// variant access after an `is`/declaration-condition check.
    FieldAccess {
        base: Box<Expr>,
        field: String,
    },
    /// `s[i]`: `s` cast to `str`, `i` cast to `int`; result is the length-1
    /// substring at that index (§4.5.8).
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// Implicit widening/narrowing cast inserted by the semantic analyzer;
    /// never produced directly by the parser (§4.5.8).
    Cast {
        target: Type,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
    /// Filled in by the semantic analyzer; absent right after parsing.
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Expr { kind, position, ty: None }
    }
}
