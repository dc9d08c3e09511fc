use crate::error::Position;

use super::{Expr, Type};

/// A dotted assignment target, e.g. `point.x` or plain `counter`.
#[derive(Debug, Clone)]
pub struct Assignable {
    pub base: String,
    pub path: Vec<String>,
    pub position: Position,
}

/// The condition guarding an `if`/`elif` branch: either a plain boolean
/// expression, or a declaration-condition that narrows a variant value to
/// one of its fields for the lifetime of the branch (§4.5.6).
#[derive(Debug, Clone)]
pub enum Condition {
    Expr(Expr),
    Declaration { ty: Type, name: String, value: Expr, position: Position },
}

#[derive(Debug, Clone)]
pub enum InstrKind {
    VarDecl {
        name: String,
        ty: Type,
        mutable: bool,
        value: Expr,
    },
    Assign {
        target: Assignable,
        value: Expr,
    },
    ExprStmt(Expr),
    Return(Option<Expr>),
    Break,
    Continue,
    If {
        branches: Vec<(Condition, Vec<Instr>)>,
        else_body: Option<Vec<Instr>>,
    },
    While {
        cond: Expr,
        body: Vec<Instr>,
    },
    DoWhile {
        body: Vec<Instr>,
        cond: Expr,
    },
    /// Sentinel body for a builtin function (§4.6, GLOSSARY `<builtins>`):
    /// the interpreter dispatches to a native implementation by name
    /// instead of executing a user-written body.
    Intrinsic(String),
}

#[derive(Debug, Clone)]
pub struct Instr {
    pub kind: InstrKind,
    pub position: Position,
}

impl Instr {
    pub fn new(kind: InstrKind, position: Position) -> Self {
        Instr { kind, position }
    }
}
