use crate::error::Position;

use super::{Instr, Type};

/// A named, ordered field of a struct or variant.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub position: Position,
}

/// All fields present simultaneously, in declaration order.
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<Field>,
    pub position: Position,
    pub file: String,
}

/// Exactly one field active at runtime; field types must be pairwise
/// distinct so the active field is identifiable by type alone (§4.5.4).
#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub name: String,
    pub fields: Vec<Field>,
    pub position: Position,
    pub file: String,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
    pub position: Position,
}

/// `None` means the function returns no value and may only be called as a
/// statement, never nested inside another expression (§4.3, §4.7).
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Vec<Instr>,
    pub position: Position,
    pub file: String,
}
