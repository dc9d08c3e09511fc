//! Builtin functions (§4.6), grounded the same way the original interpreter
//! prepares them: as real function declarations merged into the program
//! like any include, rather than a special-cased dispatch table living
//! outside the function-call machinery. Each body is a single
//! `InstrKind::Intrinsic` sentinel that [`super::exec`] recognizes and
//! dispatches to a native implementation.
use std::collections::HashMap;

use crate::ast::{FunctionDecl, FunctionIdentification, Param, Program, Type};
use crate::error::Position;

pub const BUILTINS_FILE: &str = "<builtins>";

fn pos() -> Position {
    Position::new(0, 0)
}

fn param(name: &str, ty: Type) -> Param {
    Param { name: name.to_owned(), ty, mutable: false, position: pos() }
}

fn builtin(name: &str, params: Vec<Param>, return_type: Option<Type>) -> FunctionDecl {
    FunctionDecl {
        name: name.to_owned(),
        params,
        return_type,
        body: vec![crate::ast::Instr::new(crate::ast::InstrKind::Intrinsic(name.to_owned()), pos())],
        position: pos(),
        file: BUILTINS_FILE.to_owned(),
    }
}

/// Every builtin, ready to be merged into a [`Program`] exactly like any
/// included file's declarations would be.
pub fn builtin_program() -> Program {
    let decls = vec![
        builtin("no_arguments", vec![], Some(Type::Int)),
        builtin("argument", vec![param("index", Type::Int)], Some(Type::Str)),
        builtin("print", vec![param("value", Type::Str)], None),
        builtin("println", vec![param("value", Type::Str)], None),
        builtin("input", vec![], Some(Type::Str)),
        builtin("input", vec![param("n", Type::Int)], Some(Type::Str)),
        builtin("len", vec![param("value", Type::Str)], Some(Type::Int)),
        builtin("abs", vec![param("value", Type::Int)], Some(Type::Int)),
        builtin("abs", vec![param("value", Type::Float)], Some(Type::Float)),
        builtin("min", vec![param("a", Type::Int), param("b", Type::Int)], Some(Type::Int)),
        builtin("min", vec![param("a", Type::Float), param("b", Type::Float)], Some(Type::Float)),
        builtin("max", vec![param("a", Type::Int), param("b", Type::Int)], Some(Type::Int)),
        builtin("max", vec![param("a", Type::Float), param("b", Type::Float)], Some(Type::Float)),
    ];

    let mut functions = HashMap::new();
    for decl in decls {
        let id = FunctionIdentification::new(decl.name.clone(), decl.params.iter().map(|p| p.ty.clone()).collect());
        functions.insert(id, decl);
    }

    Program { structs: HashMap::new(), variants: HashMap::new(), functions }
}
