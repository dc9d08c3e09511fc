//! Semantic analyzer (§4.5): name resolution, type checking, recursive-type
//! detection, overload resolution, and explicit cast insertion.
mod scope;
mod types;

use std::collections::HashMap;

use crate::ast::{Condition, Expr, ExprKind, FunctionDecl, FunctionIdentification, Instr, InstrKind, Program, Type};
use crate::error::{PipelineError, PipelineErrorKind, Position, WhyResult};
use scope::Scopes;
use types::{arg_distance, cast_needed};

/// Runs every pipeline-fatal check and rewrites the tree with explicit
/// casts in place. Returns the same [`Program`], now safe for the
/// interpreter to execute without further validation.
pub fn analyze(mut program: Program) -> WhyResult<Program> {
    validate_type_declarations(&program)?;

    let ids: Vec<FunctionIdentification> = program.functions.keys().cloned().collect();
    for id in ids {
        let mut func = program.functions.remove(&id).expect("key was just read from this map");
        analyze_function(&program, &mut func)?;
        program.functions.insert(id, func);
    }

    Ok(program)
}

fn validate_type_declarations(program: &Program) -> WhyResult<()> {
    for decl in program.structs.values() {
        check_field_types_exist(program, &decl.fields, &decl.file)?;
        check_field_names_distinct(&decl.fields, &decl.file)?;
    }
    for decl in program.variants.values() {
        check_field_types_exist(program, &decl.fields, &decl.file)?;
        check_field_names_distinct(&decl.fields, &decl.file)?;
        check_field_types_distinct(&decl.fields, &decl.file)?;
    }
    detect_type_recursion(program)?;
    Ok(())
}

fn check_field_types_exist(program: &Program, fields: &[crate::ast::Field], file: &str) -> WhyResult<()> {
    for field in fields {
        if let Type::Named(name) = &field.ty {
            if !program.structs.contains_key(name) && !program.variants.contains_key(name) {
                return Err(PipelineError::new(
                    PipelineErrorKind::UnknownFieldType,
                    format!("Unknown type '{name}' for field '{}'", field.name),
                    file.to_owned(),
                    field.position,
                )
                .into());
            }
        }
    }
    Ok(())
}

fn check_field_names_distinct(fields: &[crate::ast::Field], file: &str) -> WhyResult<()> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if !seen.insert(&field.name) {
            return Err(PipelineError::new(
                PipelineErrorKind::FieldNameCollision,
                format!("Field '{}' is declared more than once", field.name),
                file.to_owned(),
                field.position,
            )
            .into());
        }
    }
    Ok(())
}

fn check_field_types_distinct(fields: &[crate::ast::Field], file: &str) -> WhyResult<()> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if !seen.insert(&field.ty) {
            return Err(PipelineError::new(
                PipelineErrorKind::FieldTypeCollision,
                format!("Variant field '{}' repeats a type already used by another field", field.name),
                file.to_owned(),
                field.position,
            )
            .into());
        }
    }
    Ok(())
}

enum VisitState {
    Visiting,
    Done,
}

fn detect_type_recursion(program: &Program) -> WhyResult<()> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, decl) in &program.structs {
        graph.insert(name.as_str(), named_field_types(&decl.fields));
    }
    for (name, decl) in &program.variants {
        graph.insert(name.as_str(), named_field_types(&decl.fields));
    }

    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let names: Vec<&str> = graph.keys().copied().collect();
    for name in names {
        visit_for_recursion(name, &graph, &mut state, program)?;
    }
    Ok(())
}

fn named_field_types(fields: &[crate::ast::Field]) -> Vec<&str> {
    fields
        .iter()
        .filter_map(|f| if let Type::Named(n) = &f.ty { Some(n.as_str()) } else { None })
        .collect()
}

fn visit_for_recursion<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    state: &mut HashMap<&'a str, VisitState>,
    program: &Program,
) -> WhyResult<()> {
    match state.get(node) {
        Some(VisitState::Done) => return Ok(()),
        Some(VisitState::Visiting) => {
            let (position, file) = type_origin(program, node);
            return Err(PipelineError::new(PipelineErrorKind::FieldTypeRecursion, format!("Type '{node}' is recursive"), file, position).into());
        }
        None => {}
    }

    state.insert(node, VisitState::Visiting);
    if let Some(neighbors) = graph.get(node) {
        for neighbor in neighbors {
            visit_for_recursion(neighbor, graph, state, program)?;
        }
    }
    state.insert(node, VisitState::Done);
    Ok(())
}

fn type_origin(program: &Program, name: &str) -> (Position, String) {
    if let Some(decl) = program.structs.get(name) {
        (decl.position, decl.file.clone())
    } else if let Some(decl) = program.variants.get(name) {
        (decl.position, decl.file.clone())
    } else {
        (Position::start(), String::new())
    }
}

fn analyze_function(program: &Program, func: &mut FunctionDecl) -> WhyResult<()> {
    let mut scopes = Scopes::new();
    scopes.push();
    for param in &func.params {
        scopes.declare(param.name.clone(), param.ty.clone(), param.mutable);
    }

    if matches!(func.body.first(), Some(Instr { kind: InstrKind::Intrinsic(_), .. })) {
        scopes.pop();
        return Ok(());
    }

    analyze_block(program, &mut func.body, &mut scopes, func, 0)?;
    scopes.pop();
    Ok(())
}

fn analyze_block(program: &Program, body: &mut [Instr], scopes: &mut Scopes, func: &FunctionDecl, loop_depth: usize) -> WhyResult<()> {
    scopes.push();
    for instr in body.iter_mut() {
        analyze_instr(program, instr, scopes, func, loop_depth)?;
    }
    scopes.pop();
    Ok(())
}

fn analyze_instr(program: &Program, instr: &mut Instr, scopes: &mut Scopes, func: &FunctionDecl, loop_depth: usize) -> WhyResult<()> {
    let file = &func.file;
    match &mut instr.kind {
        InstrKind::VarDecl { name, ty, mutable, value } => {
            let value_ty = analyze_expr_expected(program, value, scopes, file, Some(ty))?;
            require_assignable(program, &value_ty, ty, value, file)?;
            scopes.declare_checked(name.clone(), ty.clone(), *mutable, instr.position, file)?;
        }
        InstrKind::Assign { target, value } => {
            let (declared_ty, mutable) = scopes
                .lookup(&target.base)
                .ok_or_else(|| PipelineError::new(PipelineErrorKind::UnknownVariable, format!("Unknown variable '{}'", target.base), file.clone(), target.position))?;
            if !mutable {
                return Err(PipelineError::new(
                    PipelineErrorKind::Immutable,
                    format!("Variable '{}' is not mutable", target.base),
                    file.clone(),
                    target.position,
                )
                .into());
            }
            let field_ty = resolve_field_path(program, &declared_ty, &target.path, target.position, file)?;
            let value_ty = analyze_expr_expected(program, value, scopes, file, Some(&field_ty))?;
            require_assignable(program, &value_ty, &field_ty, value, file)?;
        }
        InstrKind::ExprStmt(expr) => {
            // A void-returning call is only legal as a bare statement: go
            // through `analyze_call` directly rather than `analyze_expr`,
            // which requires every expression to carry a concrete type.
            if let ExprKind::Call { name, args } = &mut expr.kind {
                let ty = analyze_call(program, name, args, scopes, expr.position, file)?;
                expr.ty = ty;
            } else {
                analyze_expr(program, expr, scopes, file)?;
            }
        }
        InstrKind::Return(expr) => match (&mut *expr, &func.return_type) {
            (Some(e), Some(ret_ty)) => {
                let ty = analyze_expr_expected(program, e, scopes, file, Some(ret_ty))?;
                require_assignable(program, &ty, ret_ty, e, file)?;
            }
            (None, None) => {}
            (Some(_), None) => {
                return Err(PipelineError::new(
                    PipelineErrorKind::InvalidReturn,
                    "Function declares no return type but 'return' supplies a value",
                    file.clone(),
                    instr.position,
                )
                .into());
            }
            (None, Some(ret_ty)) => {
                return Err(PipelineError::new(
                    PipelineErrorKind::InvalidReturn,
                    format!("Function must return a value of type '{ret_ty}'"),
                    file.clone(),
                    instr.position,
                )
                .into());
            }
        },
        InstrKind::Break => {
            if loop_depth == 0 {
                return Err(PipelineError::new(PipelineErrorKind::InvalidBreak, "'break' used outside of a loop", file.clone(), instr.position).into());
            }
        }
        InstrKind::Continue => {
            if loop_depth == 0 {
                return Err(PipelineError::new(PipelineErrorKind::InvalidContinue, "'continue' used outside of a loop", file.clone(), instr.position).into());
            }
        }
        InstrKind::If { branches, else_body } => {
            for (cond, block) in branches {
                scopes.push();
                analyze_condition(program, cond, scopes, file)?;
                for inner in block.iter_mut() {
                    analyze_instr(program, inner, scopes, func, loop_depth)?;
                }
                scopes.pop();
            }
            if let Some(block) = else_body {
                analyze_block(program, block, scopes, func, loop_depth)?;
            }
        }
        InstrKind::While { cond, body } => {
            let cond_ty = analyze_expr(program, cond, scopes, file)?;
            if cond_ty != Type::Bool {
                return Err(PipelineError::new(PipelineErrorKind::InvalidIfCondition, "'while' condition must be 'bool'", file.clone(), cond.position).into());
            }
            analyze_block(program, body, scopes, func, loop_depth + 1)?;
        }
        InstrKind::DoWhile { body, cond } => {
            analyze_block(program, body, scopes, func, loop_depth + 1)?;
            let cond_ty = analyze_expr(program, cond, scopes, file)?;
            if cond_ty != Type::Bool {
                return Err(PipelineError::new(PipelineErrorKind::InvalidIfCondition, "'do-while' condition must be 'bool'", file.clone(), cond.position).into());
            }
        }
        InstrKind::Intrinsic(_) => {}
    }
    Ok(())
}

fn analyze_condition(program: &Program, cond: &mut Condition, scopes: &mut Scopes, file: &str) -> WhyResult<()> {
    match cond {
        Condition::Expr(expr) => {
            let ty = analyze_expr(program, expr, scopes, file)?;
            if ty != Type::Bool {
                return Err(PipelineError::new(PipelineErrorKind::InvalidIfCondition, "Condition must be 'bool'", file.to_owned(), expr.position).into());
            }
        }
        Condition::Declaration { ty, name, value, position } => {
            let value_ty = analyze_expr(program, value, scopes, file)?;
            match &value_ty {
                Type::Named(variant_name) if program.variants.contains_key(variant_name) => {
                    let decl = &program.variants[variant_name];
                    if !decl.fields.iter().any(|f| f.ty == *ty) {
                        return Err(PipelineError::new(
                            PipelineErrorKind::InvalidIfCondition,
                            format!("Variant '{variant_name}' has no field of type '{ty}'"),
                            file.to_owned(),
                            *position,
                        )
                        .into());
                    }
                }
                _ => {
                    return Err(PipelineError::new(
                        PipelineErrorKind::InvalidIfCondition,
                        "Declaration-condition narrowing requires a variant expression",
                        file.to_owned(),
                        *position,
                    )
                    .into());
                }
            }
            // The narrowed binding is immutable and scoped to the branch
            // that declared it (§4.5.6 — narrowing outside the guarded
            // branch is never permitted).
            scopes.declare(name.clone(), ty.clone(), false);
        }
    }
    Ok(())
}

fn resolve_field_path(program: &Program, base: &Type, path: &[String], position: Position, file: &str) -> WhyResult<Type> {
    let mut current = base.clone();
    for field in path {
        match &current {
            Type::Named(name) => {
                let decl = program
                    .structs
                    .get(name)
                    .ok_or_else(|| PipelineError::new(PipelineErrorKind::FieldAccess, format!("'{name}' is not a struct"), file.to_owned(), position))?;
                let found = decl
                    .fields
                    .iter()
                    .find(|f| &f.name == field)
                    .ok_or_else(|| PipelineError::new(PipelineErrorKind::FieldAccess, format!("Struct '{name}' has no field '{field}'"), file.to_owned(), position))?;
                current = found.ty.clone();
            }
            _ => {
                return Err(PipelineError::new(PipelineErrorKind::FieldAccess, "Field access on a non-struct value", file.to_owned(), position).into());
            }
        }
    }
    Ok(current)
}

/// Accepts an exact match or a legal implicit widening, rewriting `expr` in
/// place with an inserted [`ExprKind::Cast`] for the latter (§4.5.8).
fn require_assignable(program: &Program, from: &Type, to: &Type, expr: &mut Expr, file: &str) -> WhyResult<()> {
    if from == to {
        expr.ty = Some(to.clone());
        return Ok(());
    }
    if cast_needed(from, to).is_some() {
        wrap_cast(expr, to.clone());
        return Ok(());
    }
    let _ = program;
    Err(PipelineError::new(
        PipelineErrorKind::InvalidCast,
        format!("Cannot implicitly convert '{from}' to '{to}'"),
        file.to_owned(),
        expr.position,
    )
    .into())
}

fn wrap_cast(expr: &mut Expr, target: Type) {
    let position = expr.position;
    let placeholder = Expr::new(ExprKind::BoolLiteral(false), position);
    let operand = std::mem::replace(expr, placeholder);
    *expr = Expr::new(ExprKind::Cast { target: target.clone(), operand: Box::new(operand) }, position);
    expr.ty = Some(target);
}

fn analyze_expr(program: &Program, expr: &mut Expr, scopes: &mut Scopes, file: &str) -> WhyResult<Type> {
    analyze_expr_expected(program, expr, scopes, file, None)
}

/// `expected` carries the target type down into a bare struct literal
/// (`{ expr, ... }`), which has no type of its own until matched against
/// whatever context it appears in (§4.5.9). Every other expression kind
/// ignores it.
fn analyze_expr_expected(program: &Program, expr: &mut Expr, scopes: &mut Scopes, file: &str, expected: Option<&Type>) -> WhyResult<Type> {
    let ty = match &mut expr.kind {
        ExprKind::IntLiteral(_) => Type::Int,
        ExprKind::FloatLiteral(_) => Type::Float,
        ExprKind::BoolLiteral(_) => Type::Bool,
        ExprKind::StrLiteral(_) => Type::Str,
        ExprKind::Variable(name) => {
            let (ty, _) = scopes
                .lookup(name)
                .ok_or_else(|| PipelineError::new(PipelineErrorKind::UnknownVariable, format!("Unknown variable '{name}'"), file.to_owned(), expr.position))?;
            ty
        }
        ExprKind::Binary { op, left, right } => {
            let lt = analyze_expr(program, left, scopes, file)?;
            let rt = analyze_expr(program, right, scopes, file)?;
            types::binary_result_type(*op, &lt, &rt, left, right, expr.position, file)?
        }
        ExprKind::Unary { op, operand } => {
            let ot = analyze_expr(program, operand, scopes, file)?;
            types::unary_result_type(*op, &ot, expr.position, file)?
        }
        ExprKind::IsType { expr: inner, ty } => {
            let inner_ty = analyze_expr(program, &mut *inner, scopes, file)?;
            match &inner_ty {
                Type::Named(name) if program.variants.contains_key(name) => {
                    let decl = &program.variants[name];
                    if !decl.fields.iter().any(|f| f.ty == *ty) {
                        return Err(PipelineError::new(
                            PipelineErrorKind::InvalidOperatorArgs,
                            format!("Variant '{name}' has no field of type '{ty}'"),
                            file.to_owned(),
                            expr.position,
                        )
                        .into());
                    }
                }
                _ => {
                    return Err(PipelineError::new(PipelineErrorKind::InvalidOperatorArgs, "'is' can only be used on a variant value", file.to_owned(), expr.position).into());
                }
            }
            Type::Bool
        }
        ExprKind::Call { name, args } => analyze_call(program, name, args, scopes, expr.position, file)?.ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::InvalidFunctionCall, format!("Function '{name}' does not return a value"), file.to_owned(), expr.position)
        })?,
        ExprKind::InitList(values) => analyze_init_list(program, values, expected, scopes, expr.position, file)?,
        ExprKind::FieldAccess { base, field } => {
            let base_ty = analyze_expr(program, base, scopes, file)?;
            resolve_field_path(program, &base_ty, std::slice::from_ref(field), expr.position, file)?
        }
        ExprKind::Subscript { base, index } => {
            let base_ty = analyze_expr(program, base, scopes, file)?;
            let index_ty = analyze_expr(program, index, scopes, file)?;
            if matches!(base_ty, Type::Named(_)) {
                return Err(PipelineError::new(PipelineErrorKind::InvalidOperatorArgs, format!("Cannot subscript a '{base_ty}' value"), file.to_owned(), expr.position).into());
            }
            if base_ty != Type::Str {
                require_assignable(program, &base_ty, &Type::Str, base, file)?;
            }
            if matches!(index_ty, Type::Named(_)) {
                return Err(PipelineError::new(PipelineErrorKind::InvalidOperatorArgs, "Subscript index must be numeric", file.to_owned(), expr.position).into());
            }
            if index_ty != Type::Int {
                require_assignable(program, &index_ty, &Type::Int, index, file)?;
            }
            Type::Str
        }
        ExprKind::Cast { target, .. } => target.clone(),
    };
    expr.ty = Some(ty.clone());
    Ok(ty)
}

/// A bare `{ expr, ... }` always constructs a struct; its target type comes
/// from `expected`, never from the literal itself (§4.3, §4.5.9). A target
/// reached only through a variant (an `expected` that names a variant, not
/// a struct) is rejected: the caller must wrap the literal in an explicit
/// `VariantName({...})` instead, which disambiguates the field.
fn analyze_init_list(program: &Program, values: &mut [Expr], expected: Option<&Type>, scopes: &mut Scopes, position: Position, file: &str) -> WhyResult<Type> {
    let type_name = match expected {
        Some(Type::Named(name)) => name.clone(),
        Some(other) => {
            return Err(PipelineError::new(PipelineErrorKind::InvalidInitList, format!("Struct literal cannot be used where a '{other}' is expected"), file.to_owned(), position).into());
        }
        None => {
            return Err(PipelineError::new(PipelineErrorKind::InvalidInitList, "Struct literal's target type cannot be inferred here", file.to_owned(), position).into());
        }
    };

    let decl = program.structs.get(&type_name).ok_or_else(|| {
        PipelineError::new(
            PipelineErrorKind::InvalidInitList,
            format!("'{type_name}' is not a struct; construct it with '{type_name}({{...}})' instead"),
            file.to_owned(),
            position,
        )
    })?;

    if values.len() != decl.fields.len() {
        return Err(PipelineError::new(
            PipelineErrorKind::InvalidInitList,
            format!("Struct '{type_name}' requires {} field(s), got {}", decl.fields.len(), values.len()),
            file.to_owned(),
            position,
        )
        .into());
    }

    let field_types: Vec<Type> = decl.fields.iter().map(|f| f.ty.clone()).collect();
    for (value, field_ty) in values.iter_mut().zip(field_types.iter()) {
        let value_ty = analyze_expr_expected(program, value, scopes, file, Some(field_ty))?;
        require_assignable(program, &value_ty, field_ty, value, file)?;
    }

    Ok(Type::Named(type_name))
}

/// `VariantName(expr)`: the only way to build a variant whose active field
/// is a struct, and an alternative to a bare implicit cast for any other
/// field type (§4.5.9).
fn analyze_variant_construction(program: &Program, name: &str, decl: &crate::ast::VariantDecl, args: &mut [Expr], scopes: &mut Scopes, position: Position, file: &str) -> WhyResult<Type> {
    if args.len() != 1 {
        return Err(PipelineError::new(PipelineErrorKind::InvalidFunctionCall, format!("Variant '{name}' construction takes exactly 1 argument, got {}", args.len()), file.to_owned(), position).into());
    }

    if matches!(args[0].kind, ExprKind::InitList(_)) {
        let struct_fields: Vec<&crate::ast::Field> = decl.fields.iter().filter(|f| matches!(&f.ty, Type::Named(n) if program.structs.contains_key(n))).collect();
        let field_ty = match struct_fields.as_slice() {
            [only] => only.ty.clone(),
            _ => {
                return Err(PipelineError::new(
                    PipelineErrorKind::InvalidInitList,
                    format!("Variant '{name}' has no single struct-typed field for this literal to construct"),
                    file.to_owned(),
                    position,
                )
                .into());
            }
        };
        let arg_ty = analyze_expr_expected(program, &mut args[0], scopes, file, Some(&field_ty))?;
        require_assignable(program, &arg_ty, &field_ty, &mut args[0], file)?;
        return Ok(Type::Named(name.to_owned()));
    }

    let arg_ty = analyze_expr(program, &mut args[0], scopes, file)?;
    if decl.fields.iter().any(|f| f.ty == arg_ty) {
        return Ok(Type::Named(name.to_owned()));
    }

    let castable: Vec<&crate::ast::Field> = decl.fields.iter().filter(|f| cast_needed(&arg_ty, &f.ty).is_some()).collect();
    match castable.as_slice() {
        [only] => {
            wrap_cast(&mut args[0], only.ty.clone());
            Ok(Type::Named(name.to_owned()))
        }
        [] => Err(PipelineError::new(PipelineErrorKind::InvalidInitList, format!("Variant '{name}' has no field compatible with type '{arg_ty}'"), file.to_owned(), position).into()),
        _ => Err(PipelineError::new(
            PipelineErrorKind::AmbiguousFunctionCall,
            format!("Value of type '{arg_ty}' matches more than one field of variant '{name}'"),
            file.to_owned(),
            position,
        )
        .into()),
    }
}

/// When every same-name, same-arity function overload agrees on the type
/// of parameter `index`, a bare struct literal at that argument position
/// can borrow it as its expected type; otherwise there's nothing to infer
/// from and the literal is rejected once argument analysis reaches it.
fn expected_param_type(program: &Program, name: &str, arity: usize, index: usize) -> Option<Type> {
    let mut candidates = program.functions.keys().filter(|id| id.name == name && id.params.len() == arity);
    let first = candidates.next()?.params[index].clone();
    if candidates.all(|id| id.params[index] == first) {
        Some(first)
    } else {
        None
    }
}

fn analyze_call(program: &Program, name: &str, args: &mut [Expr], scopes: &mut Scopes, position: Position, file: &str) -> WhyResult<Option<Type>> {
    if let Some(decl) = program.variants.get(name) {
        return analyze_variant_construction(program, name, decl, args, scopes, position, file).map(Some);
    }

    let arity = args.len();
    let mut arg_types = Vec::with_capacity(args.len());
    for (index, arg) in args.iter_mut().enumerate() {
        let expected = expected_param_type(program, name, arity, index);
        arg_types.push(analyze_expr_expected(program, arg, scopes, file, expected.as_ref())?);
    }

    let candidates: Vec<&FunctionIdentification> = program.functions.keys().filter(|id| id.name == name && id.params.len() == arg_types.len()).collect();

    if candidates.is_empty() {
        return Err(PipelineError::new(PipelineErrorKind::InvalidFunctionCall, format!("No function named '{name}' takes {} argument(s)", arg_types.len()), file.to_owned(), position).into());
    }

    let mut scored: Vec<(u32, &FunctionIdentification)> = vec![];
    for id in candidates {
        let mut total = 0u32;
        let mut ok = true;
        for (arg_ty, param_ty) in arg_types.iter().zip(id.params.iter()) {
            match arg_distance(arg_ty, param_ty) {
                Some(d) => total += d as u32,
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            scored.push((total, id));
        }
    }

    if scored.is_empty() {
        return Err(PipelineError::new(PipelineErrorKind::InvalidFunctionCall, format!("No overload of '{name}' accepts the given argument types"), file.to_owned(), position).into());
    }

    let min = scored.iter().map(|(d, _)| *d).min().unwrap();
    let winners: Vec<&FunctionIdentification> = scored.iter().filter(|(d, _)| *d == min).map(|(_, id)| *id).collect();

    if winners.len() > 1 {
        return Err(PipelineError::new(PipelineErrorKind::AmbiguousFunctionCall, format!("Call to '{name}' is ambiguous between {} equally good overloads", winners.len()), file.to_owned(), position).into());
    }

    let winner = winners[0].clone();
    let return_type = program.functions[&winner].return_type.clone();

    for (arg, param_ty) in args.iter_mut().zip(winner.params.iter()) {
        let arg_ty = arg.ty.clone().expect("analyze_expr always sets ty");
        if &arg_ty != param_ty {
            wrap_cast(arg, param_ty.clone());
        }
    }

    Ok(return_type)
}
