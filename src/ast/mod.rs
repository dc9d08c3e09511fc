//! Document tree produced by the parser (§3, §4.3).
//!
//! Unlike a polymorphic tree traversed by double-dispatch visitors, every
//! node here is a variant of a tagged-union enum, traversed by pattern
//! matching. This mirrors the rest of the pipeline: the semantic analyzer
//! walks the same enums to type-check and rewrite them in place, and the
//! interpreter walks them again to execute.
use std::collections::HashMap;

use crate::error::Position;

mod decl;
mod expr;
mod instr;

pub use decl::{Field, FunctionDecl, Param, StructDecl, VariantDecl};
pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use instr::{Assignable, Condition, Instr, InstrKind};

/// A primitive or named type, as written in source or inferred by the
/// semantic analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    /// A user-declared struct or variant, resolved by name.
    Named(String),
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "str"),
            Type::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Uniquely identifies an overload: a function's name together with the
/// types of its parameters, in order (§4.5.9).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionIdentification {
    pub name: String,
    pub params: Vec<Type>,
}

impl FunctionIdentification {
    pub fn new(name: impl Into<String>, params: Vec<Type>) -> Self {
        FunctionIdentification { name: name.into(), params }
    }
}

impl std::fmt::Display for FunctionIdentification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        write!(f, "{}({})", self.name, params)
    }
}

/// A single source file as the parser leaves it: its own declarations plus
/// the (still unresolved) list of files it wants included. The include
/// resolver merges these into one [`Program`] before semantic analysis.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub includes: Vec<IncludePath>,
    pub structs: Vec<StructDecl>,
    pub variants: Vec<VariantDecl>,
    pub functions: Vec<FunctionDecl>,
}

#[derive(Debug, Clone)]
pub struct IncludePath {
    pub path: String,
    pub position: Position,
}

/// The fully merged, include-free program handed to the semantic analyzer
/// and then the interpreter.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub structs: HashMap<String, StructDecl>,
    pub variants: HashMap<String, VariantDecl>,
    pub functions: HashMap<FunctionIdentification, FunctionDecl>,
}
