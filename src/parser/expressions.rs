use crate::lexer::{Keyword, Operator, Position, Token, TokenKind, VarType};
use crate::parser::{BinaryOp, ExprKind, Expression, LiteralValue, ParserError, Program};
use crate::symbol::SymbolTable;
use log::debug;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    symbol_table: SymbolTable,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            symbol_table: SymbolTable::new(),
        }
    }

    /// Get reference to symbol table
    #[must_use]
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    /// Get mutable reference to symbol table
    pub fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }

    /// Parse the whole token sequence
    pub fn parse_program(&mut self) -> Result<Program, ParserError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.parse_statement(&mut statements)?;
        }

        debug!(
            "parsed {} top-level statements, {} variables declared",
            statements.len(),
            self.symbol_table.len()
        );
        Ok(Program { statements })
    }

    /// Check if we've reached the end of tokens
    pub(crate) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// Peek at current token without consuming it
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    /// Advance to next token
    pub(crate) fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.current);
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    /// Check if current token matches a kind
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    pub(crate) fn check_operator(&self, op: Operator) -> bool {
        self.check(TokenKind::Operator(op))
    }

    /// Error describing the current token (or end of input) as unexpected
    pub(crate) fn unexpected(&self, expected: &str) -> ParserError {
        match self.peek() {
            Some(token) => ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
                pos: token.pos,
            },
            None => ParserError::UnexpectedEof(expected.to_string()),
        }
    }

    /// Expect a specific token kind and consume it
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Position, ParserError> {
        if self.check(kind) {
            let pos = self.tokens[self.current].pos;
            self.current += 1;
            Ok(pos)
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Expect an identifier, returning its name and position
    pub(crate) fn expect_identifier(&mut self) -> Result<(String, Position), ParserError> {
        match self.peek() {
            Some(Token { kind: TokenKind::Identifier, lexeme, pos }) => {
                let found = (lexeme.clone(), *pos);
                self.current += 1;
                Ok(found)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Type of a declared variable, or `UndeclaredVariable`
    pub(crate) fn resolve_variable(&self, name: &str, pos: Position) -> Result<VarType, ParserError> {
        self.symbol_table
            .lookup_variable(name)
            .map(|symbol| symbol.var_type)
            .ok_or_else(|| ParserError::UndeclaredVariable(name.to_string(), pos))
    }

    /// Parse an expression: atoms joined by binary operators, left to right
    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let mut left = self.parse_atom()?;

        while let Some(op) = self.match_binary_op() {
            let right = self.parse_atom()?;
            left = self.make_binary(left, op, right)?;
        }

        Ok(left)
    }

    /// Build `left <op> right`, checking the operand types
    pub(crate) fn make_binary(
        &self,
        left: Expression,
        op: BinaryOp,
        right: Expression,
    ) -> Result<Expression, ParserError> {
        let result_type = op.result_type(left.expr_type, right.expr_type).ok_or_else(|| {
            ParserError::TypeMismatch {
                expected: format!("operands valid for '{op}'"),
                found: format!("{} {op} {}", left.expr_type, right.expr_type),
                pos: right.pos,
            }
        })?;
        let pos = left.pos;

        Ok(Expression::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            result_type,
            pos,
        ))
    }

    fn match_binary_op(&mut self) -> Option<BinaryOp> {
        let op = match self.peek()?.kind {
            TokenKind::Operator(op) => BinaryOp::from_operator(op)?,
            _ => return None,
        };
        self.current += 1;
        Some(op)
    }

    /// Parse a literal or a variable reference
    pub(crate) fn parse_atom(&mut self) -> Result<Expression, ParserError> {
        let Some(token) = self.peek().cloned() else {
            return Err(ParserError::UnexpectedEof("expression".to_string()));
        };
        let pos = token.pos;

        let value = match token.kind {
            TokenKind::Identifier => {
                let var_type = self.resolve_variable(&token.lexeme, pos)?;
                self.current += 1;
                return Ok(Expression::variable(token.lexeme, var_type, pos));
            }
            TokenKind::IntegerLiteral => {
                let value: i32 = token
                    .lexeme
                    .parse()
                    .map_err(|_| ParserError::InvalidLiteral(token.lexeme.clone(), pos))?;
                LiteralValue::Integer(i64::from(value))
            }
            TokenKind::FloatLiteral => {
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| ParserError::InvalidLiteral(token.lexeme.clone(), pos))?;
                LiteralValue::Float(value)
            }
            TokenKind::StringLiteral => {
                let inner = &token.lexeme[1..token.lexeme.len() - 1];
                LiteralValue::String(inner.to_string())
            }
            TokenKind::CharLiteral => {
                let value = decode_char_literal(&token.lexeme)
                    .ok_or_else(|| ParserError::InvalidLiteral(token.lexeme.clone(), pos))?;
                LiteralValue::Char(value)
            }
            TokenKind::Keyword(Keyword::True) => LiteralValue::Bool(true),
            TokenKind::Keyword(Keyword::False) => LiteralValue::Bool(false),
            _ => return Err(self.unexpected("expression")),
        };

        self.current += 1;
        Ok(Expression::literal(value, pos))
    }
}

/// Decode a char literal lexeme such as `'a'` or `'\n'`
///
/// Unknown escapes pass the escaped character through unchanged.
fn decode_char_literal(lexeme: &str) -> Option<char> {
    let inner = lexeme.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();

    let value = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        },
        c => c,
    };

    chars.next().is_none().then_some(value)
}
