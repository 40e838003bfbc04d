//! Error type for the whole lexer → parser → code generator pipeline.

use thiserror::Error;

use crate::codegen::CodegenError;
use crate::lexer::LexerError;
use crate::parser::ParserError;

pub type CompileResult<T> = Result<T, CompileError>;

/// The first error raised by any pipeline stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("parse error: {0}")]
    Parser(#[from] ParserError),

    #[error("codegen error: {0}")]
    Codegen(#[from] CodegenError),
}
