//! Include resolver (§4.4): loads every entrypoint file and everything it
//! transitively includes into one merged [`Program`], tolerating cycles by
//! never re-parsing a path that was already loaded.
use std::collections::HashSet;

use crate::ast::{Document, FunctionIdentification, IncludePath, Program};
use crate::error::{CliError, PipelineError, PipelineErrorKind, WhyError, WhyResult};
use crate::interpreter::builtins;

pub fn load_program(entrypoints: &[String]) -> WhyResult<Program> {
    if entrypoints.is_empty() {
        return Err(CliError::NoFiles.into());
    }

    let mut seen_args = HashSet::new();
    for path in entrypoints {
        if !seen_args.insert(path.clone()) {
            return Err(CliError::DuplicateFile(path.clone()).into());
        }
    }

    let mut program = builtins::builtin_program();
    let mut loaded = HashSet::new();

    for path in entrypoints {
        let source = std::fs::read_to_string(path).map_err(|_| WhyError::from(CliError::FileOpen(path.clone())))?;
        load_document(path, &source, &mut program, &mut loaded)?;
    }

    Ok(program)
}

fn load_document(path: &str, source: &str, program: &mut Program, loaded: &mut HashSet<String>) -> WhyResult<()> {
    if !loaded.insert(path.to_owned()) {
        return Ok(());
    }

    let document: Document = crate::parse_document(source, path)?;
    merge(document.structs, document.variants, document.functions, path, program)?;

    for include in &document.includes {
        load_include(include, program, loaded)?;
    }

    Ok(())
}

fn load_include(include: &IncludePath, program: &mut Program, loaded: &mut HashSet<String>) -> WhyResult<()> {
    if loaded.contains(&include.path) {
        return Ok(());
    }

    let source = std::fs::read_to_string(&include.path).map_err(|_| {
        WhyError::from(PipelineError::new(
            PipelineErrorKind::IncludeFileOpen,
            format!("Could not open included file '{}'", include.path),
            include.path.clone(),
            include.position,
        ))
    })?;

    load_document(&include.path, &source, program, loaded)
}

fn merge(
    structs: Vec<crate::ast::StructDecl>,
    variants: Vec<crate::ast::VariantDecl>,
    functions: Vec<crate::ast::FunctionDecl>,
    file: &str,
    program: &mut Program,
) -> WhyResult<()> {
    for decl in structs {
        if program.structs.contains_key(&decl.name) {
            return Err(PipelineError::new(
                PipelineErrorKind::DuplicateStruct,
                format!("Struct '{}' is already defined", decl.name),
                file.to_owned(),
                decl.position,
            )
            .into());
        }
        program.structs.insert(decl.name.clone(), decl);
    }

    for decl in variants {
        if program.variants.contains_key(&decl.name) {
            return Err(PipelineError::new(
                PipelineErrorKind::DuplicateVariant,
                format!("Variant '{}' is already defined", decl.name),
                file.to_owned(),
                decl.position,
            )
            .into());
        }
        program.variants.insert(decl.name.clone(), decl);
    }

    for decl in functions {
        let id = FunctionIdentification::new(decl.name.clone(), decl.params.iter().map(|p| p.ty.clone()).collect());
        if program.functions.contains_key(&id) {
            return Err(PipelineError::new(
                PipelineErrorKind::DuplicateFunction,
                format!("Duplicate function with signature {id}"),
                file.to_owned(),
                decl.position,
            )
            .into());
        }
        program.functions.insert(id, decl);
    }

    Ok(())
}
