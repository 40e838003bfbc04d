use crate::lexer::Position;
use std::fmt;

/// Language keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Start,
    Close,
    IntBox,
    FloatBox,
    StringBox,
    CharBox,
    BoolBox,
    Out,
    In,
    If,
    Else,
    True,
    False,
    Endl,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Keyword {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Keyword::Start),
            "close" => Some(Keyword::Close),
            "intbox" => Some(Keyword::IntBox),
            "floatbox" => Some(Keyword::FloatBox),
            "stringbox" => Some(Keyword::StringBox),
            "charbox" => Some(Keyword::CharBox),
            "boolbox" => Some(Keyword::BoolBox),
            "out" => Some(Keyword::Out),
            "in" => Some(Keyword::In),
            "if" => Some(Keyword::If),
            "else" => Some(Keyword::Else),
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            "endl" => Some(Keyword::Endl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Start => "start",
            Keyword::Close => "close",
            Keyword::IntBox => "intbox",
            Keyword::FloatBox => "floatbox",
            Keyword::StringBox => "stringbox",
            Keyword::CharBox => "charbox",
            Keyword::BoolBox => "boolbox",
            Keyword::Out => "out",
            Keyword::In => "in",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Endl => "endl",
        }
    }

    /// The variable type a type keyword declares, if this is one
    pub fn var_type(&self) -> Option<VarType> {
        match self {
            Keyword::IntBox => Some(VarType::Int),
            Keyword::FloatBox => Some(VarType::Float),
            Keyword::StringBox => Some(VarType::String),
            Keyword::CharBox => Some(VarType::Char),
            Keyword::BoolBox => Some(VarType::Bool),
            _ => None,
        }
    }
}

/// Operators, in longest-first match order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,        // ==
    NotEqual,     // !=
    LessEqual,    // <=
    GreaterEqual, // >=
    LeftShift,    // <<
    RightShift,   // >>
    Plus,         // +
    Minus,        // -
    Asterisk,     // *
    Slash,        // /
    Percent,      // %
    Less,         // <
    Greater,      // >
    Assign,       // =
}

impl Operator {
    /// Every operator, two-character ones first so `<=` wins over `<`
    pub const ALL: [Operator; 14] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::LeftShift,
        Operator::RightShift,
        Operator::Plus,
        Operator::Minus,
        Operator::Asterisk,
        Operator::Slash,
        Operator::Percent,
        Operator::Less,
        Operator::Greater,
        Operator::Assign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::LeftShift => "<<",
            Operator::RightShift => ">>",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Asterisk => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Assign => "=",
        }
    }

    /// Longest operator that `text` starts with
    pub fn match_prefix(text: &str) -> Option<Operator> {
        Self::ALL.into_iter().find(|op| text.starts_with(op.as_str()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Operator(Operator),
    OpenBrace,  // {
    CloseBrace, // }
    OpenParen,  // (
    CloseParen, // )
    Semicolon,  // ;
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "keyword '{kw}'"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::IntegerLiteral => write!(f, "integer literal"),
            TokenKind::FloatLiteral => write!(f, "float literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::CharLiteral => write!(f, "char literal"),
            TokenKind::Operator(op) => write!(f, "operator '{op}'"),
            TokenKind::OpenBrace => write!(f, "'{{'"),
            TokenKind::CloseBrace => write!(f, "'}}'"),
            TokenKind::OpenParen => write!(f, "'('"),
            TokenKind::CloseParen => write!(f, "')'"),
            TokenKind::Semicolon => write!(f, "';'"),
        }
    }
}

/// Types a variable can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Int,
    Float,
    String,
    Char,
    Bool,
}

impl VarType {
    /// Int, Char and Bool share the 32-bit accumulator
    pub fn is_integral(&self) -> bool {
        matches!(self, VarType::Int | VarType::Char | VarType::Bool)
    }

    /// Whether a value of type `value` may be stored into a slot of this type
    pub fn accepts(&self, value: VarType) -> bool {
        *self == value
            || (self.is_integral() && value.is_integral())
            || (*self == VarType::Float && value.is_integral())
    }

    pub fn keyword(&self) -> Keyword {
        match self {
            VarType::Int => Keyword::IntBox,
            VarType::Float => Keyword::FloatBox,
            VarType::String => Keyword::StringBox,
            VarType::Char => Keyword::CharBox,
            VarType::Bool => Keyword::BoolBox,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.keyword().as_str())
    }
}

/// A token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position, lexeme: String) -> Self {
        Self { kind, pos, lexeme }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::IntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral => write!(f, "{} {}", self.kind, self.lexeme),
            _ => write!(f, "{}", self.kind),
        }
    }
}
