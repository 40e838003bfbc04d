use thiserror::Error;
use crate::lexer::Position;

/// Parser error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("Expected {expected} but found {found} at {pos}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: Position,
    },

    #[error("Expected {0} but reached end of input")]
    UnexpectedEof(String),

    #[error("Variable '{0}' is already declared at {1}")]
    DuplicateDeclaration(String, Position),

    #[error("Undeclared variable '{0}' at {1}")]
    UndeclaredVariable(String, Position),

    #[error("Type mismatch: expected {expected} but got {found} at {pos}")]
    TypeMismatch {
        expected: String,
        found: String,
        pos: Position,
    },

    #[error("Invalid literal '{0}' at {1}")]
    InvalidLiteral(String, Position),

    #[error("'{0}' is reserved by the assembler and cannot name a variable at {1}")]
    ReservedName(String, Position),
}

impl ParserError {
    /// Where the error was detected; `None` at end of input
    pub fn position(&self) -> Option<Position> {
        match self {
            ParserError::UnexpectedToken { pos, .. } | ParserError::TypeMismatch { pos, .. } => Some(*pos),
            ParserError::DuplicateDeclaration(_, pos)
            | ParserError::UndeclaredVariable(_, pos)
            | ParserError::InvalidLiteral(_, pos)
            | ParserError::ReservedName(_, pos) => Some(*pos),
            ParserError::UnexpectedEof(_) => None,
        }
    }
}
