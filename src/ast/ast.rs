use std::{fmt::Display, rc::Rc, slice::Iter};

use crate::{lexer::tokens::TokenKind, Position, Span};

use super::{
    expressions::{BinaryExpr, IdentifierExpr, LiteralExpr, ParenExpr, UnaryExpr},
    statements::{BlockStmt, ExpressionStmt, FnDeclStmt, ReturnStmt, VarDeclStmt},
};

/// Expression
///
/// Every expression node kind. Matching on this is exhaustive, so adding a
/// variant forces the evaluator and printer to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Paren(ParenExpr),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(literal) => &literal.span,
            Expr::Identifier(identifier) => &identifier.span,
            Expr::Unary(unary) => &unary.span,
            Expr::Binary(binary) => &binary.span,
            Expr::Paren(paren) => &paren.span,
        }
    }
}

enum Piece<'a> {
    Expr(&'a Expr),
    Text(&'a str),
}

// Printed with an explicit work list so arbitrarily deep trees cannot
// exhaust the stack.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pending = vec![Piece::Expr(self)];

        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Expr(Expr::Literal(literal)) => write!(f, "{}", literal)?,
                Piece::Expr(Expr::Identifier(identifier)) => f.write_str(&identifier.name)?,
                Piece::Expr(Expr::Unary(unary)) => {
                    if !unary.implicit {
                        f.write_str(&unary.operator.value)?;
                    }
                    pending.push(Piece::Expr(&unary.operand));
                }
                Piece::Expr(Expr::Binary(binary)) => {
                    f.write_str("(")?;
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Expr(&binary.right));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Text(&binary.operator.value));
                    pending.push(Piece::Text(" "));
                    pending.push(Piece::Expr(&binary.left));
                }
                // Binary nodes already print their own parentheses
                Piece::Expr(Expr::Paren(paren)) => pending.push(Piece::Expr(&paren.inner)),
            }
        }

        Ok(())
    }
}

impl Expr {
    /// Leaf left behind in a node whose child was moved out for dropping.
    fn detached() -> Expr {
        Expr::Literal(LiteralExpr {
            kind: TokenKind::Null,
            value: String::new(),
            span: Span {
                start: Position::null(),
                end: Position::null(),
            },
        })
    }

    /// Moves every child that has children of its own into `out`.
    fn take_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Unary(unary) => detach(&mut unary.operand, out),
            Expr::Binary(binary) => {
                detach(&mut binary.left, out);
                detach(&mut binary.right, out);
            }
            Expr::Paren(paren) => detach(&mut paren.inner, out),
            Expr::Identifier(identifier) => {
                // Only the last owner of a resolved value tears it down
                if let Some(value) = identifier.resolved.take() {
                    if let Ok(value) = Rc::try_unwrap(value) {
                        out.push(value);
                    }
                }
            }
            Expr::Literal(_) => {}
        }
    }

    fn has_children(&self) -> bool {
        match self {
            Expr::Literal(_) => false,
            Expr::Identifier(identifier) => identifier.resolved.is_some(),
            Expr::Unary(_) | Expr::Binary(_) | Expr::Paren(_) => true,
        }
    }
}

fn detach(child: &mut Expr, out: &mut Vec<Expr>) {
    if child.has_children() {
        out.push(std::mem::replace(child, Expr::detached()));
    }
}

// Dropping is flattened onto a work list for the same reason as printing.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = vec![];
        self.take_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Expression(ExpressionStmt),
    Return(ReturnStmt),
    Block(BlockStmt),
    FnDecl(FnDeclStmt),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(decl) => &decl.span,
            Stmt::Expression(expression) => &expression.span,
            Stmt::Return(ret) => &ret.span,
            Stmt::Block(block) => &block.span,
            Stmt::FnDecl(function) => &function.span,
        }
    }

    /// Whether a binding made by this statement forbids rebinding in the same scope.
    pub fn is_constant(&self) -> bool {
        matches!(self, Stmt::VarDecl(decl) if decl.is_constant)
    }

    /// The expression an identifier bound by this statement stands for.
    ///
    /// Functions bind a name but have no value.
    pub fn bound_value(&self) -> Option<Rc<Expr>> {
        match self {
            Stmt::VarDecl(decl) => Some(Rc::clone(&decl.value)),
            _ => None,
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::VarDecl(decl) => write!(
                f,
                "{} {} <- {};",
                if decl.is_constant { "const" } else { "let" },
                decl.identifier,
                decl.value
            ),
            Stmt::Expression(expression) => write!(f, "{};", expression.expression),
            Stmt::Return(ReturnStmt { value: Some(value), .. }) => write!(f, "return {};", value),
            Stmt::Return(_) => write!(f, "return;"),
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::FnDecl(function) => write!(f, "func {}() {}", function.identifier, function.body),
        }
    }
}

/// Program
///
/// The root of a parse: top-level statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
