use std::{fmt::Display, rc::Rc};

use crate::{lexer::tokens::{Token, TokenKind}, Span};

use super::ast::Expr;

// LITERALS

/// Literal Expression
/// Integer, float, string, boolean or null literal, kept as source text.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for LiteralExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "{:?}", self.value),
            _ => write!(f, "{}", self.value),
        }
    }
}

/// Identifier Expression
///
/// `resolved` is filled in while parsing, from the binding visible at that
/// point. It is never looked up again later, so rebinding the name afterwards
/// does not change what this identifier evaluates to.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
    pub resolved: Option<Rc<Expr>>,
    pub span: Span,
}

impl IdentifierExpr {
    /// `_` discards: it is never declared and never resolved.
    pub fn is_discard(&self) -> bool {
        self.name == "_"
    }
}

// COMPLEX

/// Unary Expression
///
/// Every operand is wrapped in one of these. Without a prefix operator the
/// parser synthesizes `+` and sets `implicit`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub operand: Box<Expr>,
    pub implicit: bool,
    pub span: Span,
}

/// Binary Expression
/// Represents a binary operation between two expressions in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Paren Expression
/// Only delimits precedence while parsing; evaluates to its inner expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}
