use crate::lexer::{Operator, Position, VarType};
use std::fmt;

/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    /// Contents between the quotes, escape sequences left as written
    String(String),
    Char(char),
    Bool(bool),
}

impl LiteralValue {
    pub fn var_type(&self) -> VarType {
        match self {
            LiteralValue::Integer(_) => VarType::Int,
            LiteralValue::Float(_) => VarType::Float,
            LiteralValue::String(_) => VarType::String,
            LiteralValue::Char(_) => VarType::Char,
            LiteralValue::Bool(_) => VarType::Bool,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl BinaryOp {
    pub fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Plus => Some(BinaryOp::Add),
            Operator::Minus => Some(BinaryOp::Sub),
            Operator::Asterisk => Some(BinaryOp::Mul),
            Operator::Slash => Some(BinaryOp::Div),
            Operator::Percent => Some(BinaryOp::Mod),
            Operator::Equal => Some(BinaryOp::Equal),
            Operator::NotEqual => Some(BinaryOp::NotEqual),
            Operator::Less => Some(BinaryOp::Less),
            Operator::Greater => Some(BinaryOp::Greater),
            Operator::LessEqual => Some(BinaryOp::LessEqual),
            Operator::GreaterEqual => Some(BinaryOp::GreaterEqual),
            Operator::LeftShift | Operator::RightShift | Operator::Assign => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    /// Type of `left <op> right`, or `None` when the operands don't support it
    pub fn result_type(&self, left: VarType, right: VarType) -> Option<VarType> {
        let both_integral = left.is_integral() && right.is_integral();
        let both_float = left == VarType::Float && right == VarType::Float;

        match (self.is_comparison(), both_integral, both_float) {
            (true, true, _) | (true, _, true) => Some(VarType::Bool),
            (false, true, _) => Some(VarType::Int),
            (false, _, true) if *self != BinaryOp::Mod => Some(VarType::Float),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
        };
        f.write_str(s)
    }
}

/// Expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(LiteralValue),
    Variable(String),
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
}

/// Expression with type information
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub expr_type: VarType,
    pub pos: Position,
}

impl Expression {
    pub fn new(kind: ExprKind, expr_type: VarType, pos: Position) -> Self {
        Self {
            kind,
            expr_type,
            pos,
        }
    }

    pub fn literal(value: LiteralValue, pos: Position) -> Self {
        let expr_type = value.var_type();
        Self::new(ExprKind::Literal(value), expr_type, pos)
    }

    pub fn variable(name: impl Into<String>, var_type: VarType, pos: Position) -> Self {
        Self::new(ExprKind::Variable(name.into()), var_type, pos)
    }

    /// Literals and variable references need no intermediate register
    pub fn is_atom(&self) -> bool {
        !matches!(self.kind, ExprKind::Binary { .. })
    }
}

/// One `<<` item of an `out` statement
#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem {
    Value(Expression),
    Endl,
}

/// Statement variants
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    VarDecl {
        name: String,
        var_type: VarType,
        initializer: Expression,
    },
    Assign {
        name: String,
        value: Expression,
    },
    /// `x = x <op> operand;`
    Arithmetic {
        name: String,
        op: BinaryOp,
        operand: Expression,
    },
    Output(OutputItem),
    Input {
        name: String,
    },
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        else_block: Option<Vec<Statement>>,
    },
}

/// Statement with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub pos: Position,
}

impl Statement {
    pub fn new(kind: StatementKind, pos: Position) -> Self {
        Self { kind, pos }
    }
}

/// Complete program AST
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}
