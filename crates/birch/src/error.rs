//! The error taxonomy shared by the lexer, parser, evaluator and render driver.
//!
//! Every fallible operation in this crate returns `Result<T, Error>`. There is
//! no local recovery anywhere in the core: an error is fatal to the enclosing
//! `render`/`eval` call and is handed back to the caller unchanged.

use std::fmt;

use thiserror::Error;

/// A source position used to annotate parse and lex failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.offset)
    }
}

/// The full error taxonomy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Lexing or parsing failure.
    #[error("syntax error at {position}: {message}")]
    Syntax { message: String, position: Position },

    /// A bare identifier was read but has no local binding and no matching
    /// method on the implicit receiver.
    #[error("undefined local variable or method `{name}`")]
    Name { name: String },

    /// Method dispatch found no entry for `name` on `receiver_type`.
    #[error("undefined method `{name}` for {receiver_type}")]
    NoMethod {
        receiver_type: &'static str,
        name: String,
    },

    /// An operand failed to coerce to the shape a method required.
    #[error("type error: {message}")]
    Type { message: String },

    /// Wrong arity, or an element had the wrong shape (e.g. `to_h` on a
    /// non-pair).
    #[error("argument error: {message}")]
    Argument { message: String },

    /// Out-of-range index on a required (non-optional) indexing operation.
    #[error("index {index} out of range for length {len}")]
    Index { index: i64, len: usize },

    /// Integer divide or modulo by zero.
    #[error("divided by 0")]
    ZeroDivision,

    /// Evaluation recursion depth exceeded `MAX_EVAL_DEPTH`.
    #[error("stack level too deep")]
    Stack,
}

impl Error {
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Error::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn no_method(receiver_type: &'static str, name: impl Into<String>) -> Self {
        Error::NoMethod {
            receiver_type,
            name: name.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Error::Type {
            message: message.into(),
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        Error::Argument {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
