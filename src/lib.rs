//! Kat Language Compiler
//!
//! Compiles Kat, a small statically typed imperative language, to x86-64
//! NASM assembly through three independent stages: the lexer, the parser and
//! the code generator.

pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbol;

pub use codegen::*;
pub use error::*;
pub use lexer::*;
pub use parser::*;
pub use symbol::*;

/// Run the whole pipeline over `source`
///
/// Each stage runs to completion before the next one starts; the first error
/// from any stage is returned and nothing is produced.
pub fn compile(source: &str) -> CompileResult<Assembly> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(tokens)?;
    Ok(codegen::generate(&program)?)
}
