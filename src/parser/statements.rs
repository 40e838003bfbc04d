use crate::lexer::{Keyword, Operator, TokenKind, VarType};
use crate::parser::expressions::Parser;
use crate::parser::{ExprKind, Expression, OutputItem, ParserError, Statement, StatementKind};
use crate::symbol::is_reserved_name;
use log::trace;

impl Parser {
    /// Parse one source statement, appending the resulting node(s)
    ///
    /// `out` and `in` chains produce one node per `<<` / `>>` item.
    pub(crate) fn parse_statement(&mut self, statements: &mut Vec<Statement>) -> Result<(), ParserError> {
        let Some(token) = self.peek() else {
            return Err(ParserError::UnexpectedEof("statement".to_string()));
        };
        trace!("statement at {}: {}", token.pos, token);
        let kind = token.kind;

        match kind {
            TokenKind::Keyword(kw) => match (kw, kw.var_type()) {
                (_, Some(var_type)) => statements.push(self.parse_declaration(var_type)?),
                (Keyword::Out, _) => self.parse_output(statements)?,
                (Keyword::In, _) => self.parse_input(statements)?,
                (Keyword::If, _) => statements.push(self.parse_if_statement()?),
                _ => return Err(self.unexpected("statement")),
            },
            TokenKind::Identifier => statements.push(self.parse_assignment()?),
            _ => return Err(self.unexpected("statement")),
        }

        Ok(())
    }

    /// Parse a `{ ... }` block
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Statement>, ParserError> {
        self.expect(TokenKind::OpenBrace, "'{'")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.is_at_end() {
                return Err(ParserError::UnexpectedEof("'}'".to_string()));
            }
            self.parse_statement(&mut statements)?;
        }

        self.expect(TokenKind::CloseBrace, "'}'")?;
        Ok(statements)
    }

    /// Parse `<type> name = expr;`
    fn parse_declaration(&mut self, var_type: VarType) -> Result<Statement, ParserError> {
        let pos = self.expect(TokenKind::Keyword(var_type.keyword()), "type keyword")?;

        let (name, name_pos) = self.expect_identifier()?;
        if is_reserved_name(&name) {
            return Err(ParserError::ReservedName(name, name_pos));
        }
        if self.symbol_table().lookup_variable(&name).is_some() {
            return Err(ParserError::DuplicateDeclaration(name, name_pos));
        }

        self.expect(TokenKind::Operator(Operator::Assign), "'='")?;
        let initializer = self.parse_expression()?;
        self.check_assignable(var_type, &initializer)?;
        self.expect(TokenKind::Semicolon, "';'")?;

        // Registered only now so the initializer cannot refer to the variable itself
        self.symbol_table_mut()
            .add_variable(&name, var_type, name_pos)
            .map_err(|_| ParserError::DuplicateDeclaration(name.clone(), name_pos))?;

        Ok(Statement::new(
            StatementKind::VarDecl {
                name,
                var_type,
                initializer,
            },
            pos,
        ))
    }

    /// Parse `name = expr;`, recognising the `name = name <op> operand;` form
    fn parse_assignment(&mut self) -> Result<Statement, ParserError> {
        let (name, pos) = self.expect_identifier()?;
        let target_type = self.resolve_variable(&name, pos)?;

        self.expect(TokenKind::Operator(Operator::Assign), "'='")?;
        let value = self.parse_expression()?;
        self.check_assignable(target_type, &value)?;
        self.expect(TokenKind::Semicolon, "';'")?;

        let kind = match value.kind {
            ExprKind::Binary { left, op, right }
                if !op.is_comparison()
                    && right.is_atom()
                    && matches!(&left.kind, ExprKind::Variable(v) if *v == name) =>
            {
                StatementKind::Arithmetic {
                    name,
                    op,
                    operand: *right,
                }
            }
            kind => StatementKind::Assign {
                name,
                value: Expression { kind, ..value },
            },
        };

        Ok(Statement::new(kind, pos))
    }

    /// Parse `out << item (<< item)*;`
    fn parse_output(&mut self, statements: &mut Vec<Statement>) -> Result<(), ParserError> {
        self.expect(TokenKind::Keyword(Keyword::Out), "'out'")?;

        loop {
            self.expect(TokenKind::Operator(Operator::LeftShift), "'<<'")?;

            if self.check_keyword(Keyword::Endl) {
                let pos = self.expect(TokenKind::Keyword(Keyword::Endl), "'endl'")?;
                statements.push(Statement::new(StatementKind::Output(OutputItem::Endl), pos));
            } else {
                let value = self.parse_expression()?;
                let pos = value.pos;
                statements.push(Statement::new(StatementKind::Output(OutputItem::Value(value)), pos));
            }

            if !self.check_operator(Operator::LeftShift) {
                break;
            }
        }

        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// Parse `in >> name (>> name)*;`
    fn parse_input(&mut self, statements: &mut Vec<Statement>) -> Result<(), ParserError> {
        self.expect(TokenKind::Keyword(Keyword::In), "'in'")?;

        loop {
            self.expect(TokenKind::Operator(Operator::RightShift), "'>>'")?;

            let (name, pos) = self.expect_identifier()?;
            self.resolve_variable(&name, pos)?;
            statements.push(Statement::new(StatementKind::Input { name }, pos));

            if !self.check_operator(Operator::RightShift) {
                break;
            }
        }

        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(())
    }

    /// Parse an if statement; `else if` nests a single `if` in the else block
    fn parse_if_statement(&mut self) -> Result<Statement, ParserError> {
        let pos = self.expect(TokenKind::Keyword(Keyword::If), "'if'")?;

        self.expect(TokenKind::OpenParen, "'('")?;
        let condition = self.parse_expression()?;
        if condition.expr_type == VarType::String {
            return Err(ParserError::TypeMismatch {
                expected: "numeric or boolean condition".to_string(),
                found: condition.expr_type.to_string(),
                pos: condition.pos,
            });
        }
        self.expect(TokenKind::CloseParen, "')'")?;

        let then_block = self.parse_block()?;

        let else_block = if self.check_keyword(Keyword::Else) {
            self.advance();
            if self.check_keyword(Keyword::If) {
                Some(vec![self.parse_if_statement()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(Statement::new(
            StatementKind::If {
                condition,
                then_block,
                else_block,
            },
            pos,
        ))
    }

    fn check_assignable(&self, target: VarType, value: &Expression) -> Result<(), ParserError> {
        if target.accepts(value.expr_type) {
            Ok(())
        } else {
            Err(ParserError::TypeMismatch {
                expected: target.to_string(),
                found: value.expr_type.to_string(),
                pos: value.pos,
            })
        }
    }
}
