pub mod ast;
pub mod errors;
pub mod expressions;
pub mod statements;

pub use ast::*;
pub use errors::*;
pub use expressions::Parser;

use crate::lexer::Token;

/// Convenience function for parsing a token sequence
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParserError> {
    Parser::new(tokens).parse_program()
}
