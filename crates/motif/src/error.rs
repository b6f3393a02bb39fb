use std::fmt::{self, Display};

use crate::{ast::CodeLoc, lex::TokenKind, value::Value};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// Result of evaluating one AST node: a control-flow outcome or a runtime error.
pub type EvalResult = RunResult<Flow>;

/// Non-local control flow carried alongside the value of an expression.
///
/// Evaluation normally produces `Normal(value)`. The other variants are the
/// signals raised by `return`, `break`, and `yield`; each frame either consumes
/// the signal it is responsible for (a call consumes `Return`, a loop consumes
/// `Break` and `Yield`) or propagates it upward untouched. Errors travel
/// separately as the `Err` arm of [`EvalResult`].
#[derive(Debug, Clone)]
pub enum Flow {
    Normal(Value),
    Return(Value),
    Break(Value),
    Yield(Value),
}

impl Flow {
    /// Unwraps the carried value regardless of which signal carried it.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Normal(value) | Self::Return(value) | Self::Break(value) | Self::Yield(value) => value,
        }
    }
}

/// A runtime error with its source position.
///
/// Error kinds are distinguished by message text, not by type; every message
/// renders with the `Runtime error at line L col C:` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub message: String,
    pub loc: CodeLoc,
}

impl RunError {
    pub fn new(message: impl Into<String>, loc: CodeLoc) -> Self {
        Self {
            message: message.into(),
            loc,
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Runtime error at line {} col {}: {}",
            self.loc.line, self.loc.col, self.message
        )
    }
}

impl std::error::Error for RunError {}

/// The first syntax error encountered by the parser.
///
/// The parser records the first failure and suppresses the rest of the run;
/// a program that produced a `ParseError` must not be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub loc: CodeLoc,
    /// Kind of the token the parser was looking at when the error fired.
    pub got: TokenKind,
}

impl ParseError {
    pub fn new(message: impl Into<String>, loc: CodeLoc, got: TokenKind) -> Self {
        Self {
            message: message.into(),
            loc,
            got,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at line {} col {}: {} (got {})",
            self.loc.line, self.loc.col, self.message, self.got
        )
    }
}

impl std::error::Error for ParseError {}
