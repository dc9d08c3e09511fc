pub mod ast;
pub mod cli;
pub mod dump;
pub mod error;
pub mod include;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod semantic;

use error::{PipelineError, WhyResult};

/// Loads and merges `entrypoints` (and everything they transitively
/// include, plus the builtins) into one analyzed [`ast::Program`], ready to
/// run.
pub fn build_program(entrypoints: &[String]) -> WhyResult<ast::Program> {
    let merged = include::load_program(entrypoints)?;
    let analyzed = semantic::analyze(merged)?;
    Ok(analyzed)
}

/// Same merge as [`build_program`] but without semantic analysis, so the
/// tree still reflects exactly what was parsed (no inserted `Cast` nodes).
/// Used by `--dump-dt`.
pub fn build_merged_program(entrypoints: &[String]) -> WhyResult<ast::Program> {
    include::load_program(entrypoints)
}

pub fn parse_document(source: &str, file: &str) -> Result<ast::Document, PipelineError> {
    let mut parser = parser::Parser::new(source, file.to_owned())?;
    parser.parse_document()
}
