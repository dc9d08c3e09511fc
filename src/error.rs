//! Central error model shared by every pipeline stage.
//!
//! Every stage propagates its own error up through `?`; this module only
//! fixes the *shape* (message + source file + position) and the three
//! stderr formats from the external interface contract.
use std::fmt;

/// A 1-based (line, column) pair, attached to every token and tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn start() -> Self {
        Position { line: 1, col: 1 }
    }

    pub const fn new(line: usize, col: usize) -> Self {
        Position { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<line: {}, col: {}>", self.line, self.col)
    }
}

/// Closed taxonomy of errors that abort the reader/lexer/parser/include/
/// semantic pipeline before a single instruction has executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    ReaderControlChar,
    ReaderInputError,
    IdentifierTooLong,
    CommentTooLong,
    InvalidHexChar,
    UnknownEscape,
    NewlineInString,
    UnterminatedString,
    StringTooLong,
    IntWithLeadingZero,
    IntTooLarge,
    InvalidExponent,
    UnknownToken,
    SyntaxError,
    DuplicateStruct,
    DuplicateVariant,
    DuplicateFunction,
    IncludeFileOpen,
    UnknownFieldType,
    FieldTypeRecursion,
    NameCollision,
    FieldNameCollision,
    FieldTypeCollision,
    VariableNameCollision,
    UnknownVariable,
    InvalidCast,
    FieldAccess,
    InvalidOperatorArgs,
    InvalidInitList,
    Immutable,
    InvalidFunctionCall,
    AmbiguousFunctionCall,
    InvalidReturn,
    InvalidBreak,
    InvalidContinue,
    InvalidIfCondition,
    InvalidOverload,
}

/// A fatal error raised by the reader, lexer, parser, include resolver, or
/// semantic analyzer. Formats per the "Parse / semantic / pre-execution
/// errors" stderr contract.
#[derive(Debug, Clone)]
pub struct PipelineError {
    pub kind: PipelineErrorKind,
    pub message: String,
    pub file: String,
    pub position: Position,
}

impl PipelineError {
    pub fn new(kind: PipelineErrorKind, message: impl Into<String>, file: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            file: file.into(),
            position,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {}\nin file {}\nat line {}, column {}.\n",
            self.message, self.file, self.position.line, self.position.col
        )
    }
}

impl std::error::Error for PipelineError {}

/// Closed taxonomy of errors raised while a program is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    BuiltinFunctionArgument,
    IntegerRange,
    StandardInput,
    StandardOutput,
    MainNotFound,
    MainReturnType,
    CastImpossible,
    OperatorArgument,
    ZeroDivision,
    StackOverflow,
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
    pub file: String,
    pub position: Position,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>, file: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            file: file.into(),
            position,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The program was terminated following a runtime error:\n{}\nwhile executing file {}\nat line {}, column {}.\n",
            self.message, self.file, self.position.line, self.position.col
        )
    }
}

impl std::error::Error for RuntimeError {}

/// CLI-level errors: these never carry a source position, only a message.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CliError {
    #[error("No source code files given to interpreter")]
    NoFiles,
    #[error("File name given to interpreter more than once: {0}")]
    DuplicateFile(String),
    #[error("Failed to open file {0}")]
    FileOpen(String),
}

/// The union of every way the interpreter can fail, used only at the very
/// top of `main` to pick the right stderr format and exit code.
#[derive(Debug, thiserror::Error)]
pub enum WhyError {
    #[error("The interpreter's command line interface encountered an error:\n{0}\n")]
    Cli(CliError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("An unexpected error occured:\n{0}\n")]
    Unexpected(String),
}

impl From<CliError> for WhyError {
    fn from(value: CliError) -> Self {
        WhyError::Cli(value)
    }
}

pub type WhyResult<T> = Result<T, WhyError>;
