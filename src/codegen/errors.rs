use thiserror::Error;
use crate::lexer::Position;

/// Code generation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Undeclared variable '{0}' at {1}")]
    UndeclaredVariable(String, Position),

    #[error("Variable '{0}' declared twice at {1}")]
    DuplicateDeclaration(String, Position),

    #[error("Unsupported type: {0} at {1}")]
    UnsupportedType(String, Position),

    #[error("Unsupported operator: {0} at {1}")]
    UnsupportedOperator(String, Position),
}
