//! Error types, layered scanner → parser → top-level, each wrapping the one
//! below it via `#[from]`.

use std::path::PathBuf;

/// A source position: byte offset plus 1-based line and column.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Mark {
    /// The byte offset from the start of the input.
    pub index: u64,
    /// The 1-based line number.
    pub line: u64,
    /// The 1-based column number.
    pub column: u64,
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Errors raised while converting an input string into a token stream.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("{mark}: {problem}")]
    Problem { problem: &'static str, mark: Mark },
    #[error("{mark}: malformed unicode escape")]
    InvalidUnicodeEscape { mark: Mark },
}

/// Errors raised while converting a token stream into a `Value` tree.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("unexpected end of token stream")]
    UnexpectedEndOfStream,
    #[error("{mark}: unexpected token")]
    UnexpectedToken { mark: Mark },
    #[error("{mark}: unknown alias `*{name}`")]
    UnknownAlias { name: String, mark: Mark },
    #[error("{mark}: invalid syntax: {problem}")]
    InvalidSyntax { problem: &'static str, mark: Mark },
    #[error("{mark}: tag cannot be applied to a collection")]
    InvalidTag { mark: Mark },
    #[error("{mark}: invalid boolean literal `{lexeme}`")]
    InvalidBool { lexeme: String, mark: Mark },
    #[error("{mark}: invalid integer literal `{lexeme}`")]
    InvalidInt { lexeme: String, mark: Mark },
    #[error("{mark}: invalid float literal `{lexeme}`")]
    InvalidFloat { lexeme: String, mark: Mark },
    #[error(transparent)]
    Scanner(#[from] ScannerError),
}

/// Errors raised while classifying a plain scalar lexeme under an explicit tag.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid boolean literal `{0}`")]
    InvalidBool(String),
    #[error("invalid integer literal `{0}`")]
    InvalidInt(String),
    #[error("invalid float literal `{0}`")]
    InvalidFloat(String),
}

/// Errors raised while rendering a `Value` tree as YAML text.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The crate-level error type returned by the public parsing API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Emitter(#[from] EmitterError),
}

impl From<ScannerError> for Error {
    fn from(err: ScannerError) -> Self {
        Error::Parser(ParserError::from(err))
    }
}

/// Errors raised by [`crate::parse_from_file`](crate::parse_from_file).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParserError),
}

/// Errors raised by [`crate::serialize_to_file`](crate::serialize_to_file).
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to write `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Emit(#[from] EmitterError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
