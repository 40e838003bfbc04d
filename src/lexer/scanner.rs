use crate::lexer::{Keyword, LexerError, Operator, Position, Token, TokenKind};
use log::{debug, trace};

pub struct Scanner {
    input: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    pub fn scan_all(mut self) -> Result<Vec<Token>, LexerError> {
        loop {
            self.skip_trivia()?;
            if self.is_at_end() {
                break;
            }

            let token = self.scan_token()?;
            trace!("{}: {}", token.pos, token);
            self.tokens.push(token);
        }

        debug!("scanned {} tokens over {} lines", self.tokens.len(), self.line);
        Ok(self.tokens)
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.current + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme_from(&self, start_idx: usize) -> String {
        self.input[start_idx..self.current].iter().collect()
    }

    /// Skip whitespace and comments until the next token or end of input
    fn skip_trivia(&mut self) -> Result<(), LexerError> {
        while let Some(ch) = self.peek() {
            match (ch, self.peek_ahead(1)) {
                (c, _) if c.is_whitespace() => {
                    self.advance();
                }
                ('/', Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                ('/', Some('*')) => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), LexerError> {
        let start_pos = self.current_position();
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexerError::UnterminatedComment(start_pos))
    }

    fn scan_token(&mut self) -> Result<Token, LexerError> {
        let start_pos = self.current_position();
        let start_idx = self.current;

        let Some(ch) = self.peek() else {
            return Err(LexerError::UnknownToken('\0', start_pos));
        };

        let kind = match ch {
            c if c.is_ascii_alphabetic() || c == '_' => return Ok(self.scan_identifier_or_keyword()),
            c if c.is_ascii_digit() => return Ok(self.scan_number()),
            '"' => return self.scan_string_literal(),
            '\'' => return self.scan_char_literal(),
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            ';' => TokenKind::Semicolon,
            _ => {
                let rest: String = self.input[self.current..].iter().take(2).collect();
                let op = Operator::match_prefix(&rest)
                    .ok_or(LexerError::UnknownToken(ch, start_pos))?;
                for _ in 0..op.as_str().len() {
                    self.advance();
                }
                return Ok(Token::new(TokenKind::Operator(op), start_pos, op.as_str().to_string()));
            }
        };

        self.advance();
        Ok(Token::new(kind, start_pos, self.lexeme_from(start_idx)))
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start_pos = self.current_position();
        let start_idx = self.current;

        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = self.lexeme_from(start_idx);
        let kind = match Keyword::from_str(&text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        };
        Token::new(kind, start_pos, text)
    }

    fn scan_number(&mut self) -> Token {
        let start_pos = self.current_position();
        let start_idx = self.current;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let mut kind = TokenKind::IntegerLiteral;
        if self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            kind = TokenKind::FloatLiteral;
            self.advance(); // consume '.'
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        Token::new(kind, start_pos, self.lexeme_from(start_idx))
    }

    /// Scan `"..."`, keeping escape sequences verbatim in the lexeme
    fn scan_string_literal(&mut self) -> Result<Token, LexerError> {
        let start_pos = self.current_position();
        let start_idx = self.current;
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None | Some('\n') => return Err(LexerError::UnterminatedString(start_pos)),
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                    if self.advance().is_none() {
                        return Err(LexerError::UnterminatedString(start_pos));
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        self.advance(); // closing quote

        Ok(Token::new(TokenKind::StringLiteral, start_pos, self.lexeme_from(start_idx)))
    }

    /// Scan `'x'` or `'\x'`
    fn scan_char_literal(&mut self) -> Result<Token, LexerError> {
        let start_pos = self.current_position();
        let start_idx = self.current;
        let unterminated = LexerError::UnterminatedCharLiteral(start_pos);
        self.advance(); // opening quote

        match self.peek() {
            None | Some('\'') | Some('\n') => return Err(unterminated),
            Some('\\') => {
                self.advance();
                match self.advance() {
                    None | Some('\n') => return Err(unterminated),
                    Some(_) => {}
                }
            }
            Some(_) => {
                self.advance();
            }
        }

        if !self.match_char('\'') {
            return Err(unterminated);
        }

        Ok(Token::new(TokenKind::CharLiteral, start_pos, self.lexeme_from(start_idx)))
    }
}

/// Convenience function for tokenizing input
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    Scanner::new(input).scan_all()
}
