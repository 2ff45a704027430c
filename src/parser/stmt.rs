use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::Stmt,
        statements::{BlockStmt, ExpressionStmt, FnDeclStmt, ReturnStmt, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::is_prefix_operator},
    Span,
};

use super::parser::Parser;

/// Parses the statement starting at the current token.
///
/// A lone `;` is an empty statement and yields `None`.
pub fn parse_stmt(parser: &mut Parser) -> Result<Option<Stmt>, Error> {
    let kind = parser.current_token_kind();
    trace!(%kind, "parsing statement");

    if kind == TokenKind::Semicolon {
        parser.advance();
        return Ok(None);
    }

    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser).map(Some);
    }

    if kind == TokenKind::OpenParen || kind.is_literal() || is_prefix_operator(kind) {
        return parse_expression_stmt(parser).map(Some);
    }

    Err(parser.stray_token())
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser, TokenKind::Semicolon)?;
    parser.expect_statement_end()?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.get_span().clone(),
        expression,
    }))
}

/// `let name <- value;` or `const name := value;`
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance();
    let is_constant = start_token.kind == TokenKind::Const;

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    parse_binding(parser, start_token.span, name, is_constant)
}

/// A statement starting with an identifier: either `name <- value;` or an
/// expression such as `name + 1;`.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.peek_token_kind() != TokenKind::Assignment {
        return parse_expression_stmt(parser);
    }

    let name = parser.advance();
    parse_binding(parser, name.span.clone(), name, false)
}

fn parse_binding(parser: &mut Parser, start: Span, name: Token, is_constant: bool) -> Result<Stmt, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected `<-` or `:=` after identifier"),
        },
        parser.get_position(),
    );
    parser.expect_error(TokenKind::Assignment, Some(error))?;

    let value = parse_expr(parser, TokenKind::Semicolon)?;
    let span = start.to(value.get_span());
    parser.expect_statement_end()?;

    let stmt = Stmt::VarDecl(VarDeclStmt {
        identifier: name.value.clone(),
        is_constant,
        value: Rc::new(value),
        span,
    });

    parser
        .scopes_mut()
        .declare(&name.value, stmt.clone(), name.span.start)?;

    Ok(stmt)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let value = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::EOF => None,
        _ => Some(parse_expr(parser, TokenKind::Semicolon)?),
    };

    let span = match &value {
        Some(value) => start.to(value.get_span()),
        None => start,
    };
    parser.expect_statement_end()?;

    Ok(Stmt::Return(ReturnStmt { value, span }))
}

/// A `{ ... }` block. Its declarations live in a child scope that is dropped
/// when the block ends.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.scopes_mut().open();
    let block = parse_block(parser);
    parser.scopes_mut().close();

    block.map(Stmt::Block)
}

fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span;

    let mut body = vec![];
    while !matches!(parser.current_token_kind(), TokenKind::CloseCurly | TokenKind::EOF) {
        if let Some(stmt) = parse_stmt(parser)? {
            body.push(stmt);
        }
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span;

    Ok(BlockStmt {
        body,
        span: start.to(&end),
    })
}

/// `func name() { ... }`
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected function name"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    parser.expect(TokenKind::OpenParen)?;
    parser.expect(TokenKind::CloseParen)?;

    parser.scopes_mut().open();
    let body = parse_block(parser);
    parser.scopes_mut().close();
    let body = body?;

    debug!(name = %name.value, statements = body.body.len(), "parsed function");

    let stmt = Stmt::FnDecl(FnDeclStmt {
        identifier: name.value.clone(),
        span: start.to(&body.span),
        body,
    });

    parser
        .scopes_mut()
        .declare(&name.value, stmt.clone(), name.span.start)?;

    Ok(stmt)
}
