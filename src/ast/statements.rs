use std::{fmt::Display, rc::Rc, slice::Iter};

use crate::Span;

use super::ast::{Expr, Stmt};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.body {
            write!(f, " {}", stmt)?;
        }
        write!(f, " }}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// `let` / `const` binding, also produced by a bare `name <- value;` re-assignment.
///
/// The value sits behind an `Rc` so identifiers resolved against this binding
/// can share it.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub is_constant: bool,
    pub value: Rc<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub body: BlockStmt,
    pub span: Span,
}
