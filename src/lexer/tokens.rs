use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{Position, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("func", TokenKind::Func);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("return", TokenKind::Return);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map
    };
}

/// Every kind of token the lexer produces.
///
/// The operators form one contiguous block, from `Ampersand` to `NotEquals`;
/// [`TokenKind::is_operator`] relies on that ordering.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Illegal,

    Identifier,
    Int,
    Float,
    String,
    True,
    False,
    Null,

    // Operators
    Ampersand,     // &
    Pipe,          // |
    Caret,         // ^
    Percent,       // %
    Plus,          // +
    Dash,          // -
    Not,           // !
    Star,          // *
    Slash,         // /
    And,           // &&
    Or,            // ||
    ShiftLeft,     // <<
    ShiftRight,    // >>
    AndNot,        // &^
    Less,          // <
    Greater,       // >
    Equals,        // =
    LessEquals,    // <=
    GreaterEquals, // >=
    NotEquals,     // !=

    Assignment, // <- or :=
    Comma,
    Colon,
    Semicolon,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,

    // Reserved
    Func,
    Let,
    Const,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// True for the contiguous operator block of the enumeration.
    pub fn is_operator(&self) -> bool {
        (TokenKind::Ampersand as u8..=TokenKind::NotEquals as u8).contains(&(*self as u8))
    }

    /// Literal and identifier kinds, i.e. everything that can stand alone as an operand.
    pub fn is_literal(&self) -> bool {
        (TokenKind::Identifier as u8..=TokenKind::Null as u8).contains(&(*self as u8))
    }

    pub fn is_keyword(&self) -> bool {
        (TokenKind::Func as u8..=TokenKind::Return as u8).contains(&(*self as u8))
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    /// The `+` the parser wraps around an operand that has no prefix operator.
    pub fn implicit_plus(position: Position) -> Token {
        Token {
            kind: TokenKind::Plus,
            value: String::from("+"),
            span: Span {
                start: position.clone(),
                end: position,
            },
        }
    }

    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Illegal,
        ]) {
            format!("{} ({})", self.kind, self.value)
        } else {
            format!("{} ()", self.kind)
        }
    }
}
