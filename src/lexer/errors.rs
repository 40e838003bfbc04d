use thiserror::Error;

/// Position in source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("Unknown token '{0}' at {1}")]
    UnknownToken(char, Position),

    #[error("Unterminated string literal at {0}")]
    UnterminatedString(Position),

    #[error("Unterminated char literal at {0}")]
    UnterminatedCharLiteral(Position),

    #[error("Unterminated block comment at {0}")]
    UnterminatedComment(Position),
}

impl LexerError {
    /// Where the offending construct starts
    pub fn position(&self) -> Position {
        match self {
            LexerError::UnknownToken(_, pos)
            | LexerError::UnterminatedString(pos)
            | LexerError::UnterminatedCharLiteral(pos)
            | LexerError::UnterminatedComment(pos) => *pos,
        }
    }
}
