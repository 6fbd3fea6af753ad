//! Error types for every stage of the template pipeline.
//!
//! Parsing and code generation fail hard: a compile call either yields a
//! complete program or the first error with the offending source position.

use std::fmt;

use thiserror::Error;

/// A location in the template source. Line and column are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute line/column for a byte offset into `source`.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnterminatedInterpolation,
    UnterminatedAttributeValue,
    InvalidTagName,
    InvalidAttributeName,
    UnexpectedEof,
    MismatchedEndTag { expected: String, found: String },
    UnmatchedEndTag(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedInterpolation => f.write_str("unterminated interpolation"),
            Self::UnterminatedAttributeValue => f.write_str("unterminated attribute value"),
            Self::InvalidTagName => f.write_str("invalid tag name"),
            Self::InvalidAttributeName => f.write_str("invalid attribute name"),
            Self::UnexpectedEof => f.write_str("unexpected end of template"),
            Self::MismatchedEndTag { expected, found } => {
                write!(f, "expected </{expected}>, found </{found}>")
            }
            Self::UnmatchedEndTag(tag) => write!(f, "</{tag}> closes no open element"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("malformed v-for expression `{0}`")]
    MalformedForExpression(String),
    #[error("v-model target `{0}` is not assignable")]
    InvalidModelTarget(String),
    #[error("invalid expression `{text}`: {message}")]
    Expression { text: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Failure while evaluating an expression against a runtime scope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("`{0}` is not defined")]
    Unbound(String),
    #[error("cannot read `{property}` of {target}")]
    InvalidMember { target: String, property: String },
    #[error("{0} is not a function")]
    NotCallable(String),
    #[error("invalid assignment target")]
    InvalidAssignment,
    #[error("{0}")]
    Custom(String),
}

/// Failure while evaluating a compiled program through a renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("failed to resolve component `{0}`")]
    UnknownComponent(String),
    #[error("cannot render a list over {0}")]
    InvalidListSource(String),
    #[error("renderer error: {0}")]
    Renderer(String),
}
