use tracing::trace;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{IdentifierExpr, LiteralExpr, ParenExpr, UnaryExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    binary::BinaryBuilder,
    lookups::{is_binary_operator, is_operator, is_prefix_operator},
    parser::Parser,
};

/// Parses one expression, stopping in front of `terminator` or at end of input.
///
/// The terminator itself is left for the caller to consume.
pub fn parse_expr(parser: &mut Parser, terminator: TokenKind) -> Result<Expr, Error> {
    let kind = parser.current_token_kind();

    if kind == TokenKind::OpenParen || is_prefix_operator(kind) || is_operator(parser.peek_token_kind()) {
        return parse_binary_expr(parser, terminator);
    }

    let expr = parse_primary_expr(parser)?;

    if parser.current_token_kind() == TokenKind::CloseParen && terminator != TokenKind::CloseParen {
        return Err(unmatched_paren(parser.current_token()));
    }

    Ok(expr)
}

/// An operand: a parenthesised group, or a (possibly prefixed) literal or identifier.
pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::OpenParen => parse_paren_expr(parser),
        _ => parse_unary_expr(parser),
    }
}

/// Parses a chain of prefix operators applied to an operand, or a bare operand.
///
/// A bare operand is wrapped in an implicit `+`.
pub fn parse_unary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let prefixes = take_prefixes(parser);

    if prefixes.is_empty() {
        return Ok(implicit_plus(parse_operand(parser)?));
    }

    let operand = match parser.current_token_kind() {
        TokenKind::OpenParen => parse_paren_expr(parser)?,
        _ => parse_operand(parser)?,
    };

    Ok(apply_prefixes(prefixes, operand))
}

/// Parses a `(`, everything up to its matching `)`, and the `)`.
pub fn parse_paren_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() != TokenKind::OpenParen {
        return Err(parser.unexpected_token("expected `(`"));
    }

    let group = OpenGroup {
        open: parser.advance(),
        prefixes: vec![],
        outer: BinaryBuilder::new(),
    };

    climb(parser, vec![group], TokenKind::CloseParen)
}

/// Parses operands and binary operators until `terminator`.
pub fn parse_binary_expr(parser: &mut Parser, terminator: TokenKind) -> Result<Expr, Error> {
    climb(parser, vec![], terminator)
}

/// A `(` still waiting for its `)`, with the builder it interrupted.
struct OpenGroup {
    open: Token,
    prefixes: Vec<Token>,
    outer: BinaryBuilder,
}

/// Runs the builder over the input with nested groups kept on `groups`
/// instead of the call stack.
///
/// Started with an open group, returns as soon as that group closes.
/// Otherwise runs to `terminator`.
fn climb(parser: &mut Parser, mut groups: Vec<OpenGroup>, terminator: TokenKind) -> Result<Expr, Error> {
    let single_group = !groups.is_empty();
    let mut builder = BinaryBuilder::new();

    loop {
        let kind = parser.current_token_kind();

        if kind == TokenKind::CloseParen {
            if let Some(group) = groups.pop() {
                let inner = builder.finish(parser.current_token())?;
                let close = parser.advance();

                let paren = Expr::Paren(ParenExpr {
                    span: group.open.span.to(&close.span),
                    inner: Box::new(inner),
                });
                let paren = apply_prefixes(group.prefixes, paren);

                if single_group && groups.is_empty() {
                    return Ok(paren);
                }

                builder = group.outer;
                builder.push_operand(paren)?;
                continue;
            }
        }

        if kind == TokenKind::EOF || (kind == terminator && groups.is_empty()) {
            break;
        }

        if builder.expects_operand() {
            match kind {
                TokenKind::CloseParen | TokenKind::Semicolon => {
                    return Err(unmatched_paren(parser.current_token()))
                }
                kind if kind == TokenKind::OpenParen || kind.is_literal() || is_prefix_operator(kind) => {
                    let prefixes = take_prefixes(parser);

                    if parser.current_token_kind() == TokenKind::OpenParen {
                        groups.push(OpenGroup {
                            open: parser.advance(),
                            prefixes,
                            outer: std::mem::take(&mut builder),
                        });
                    } else if prefixes.is_empty() {
                        builder.push_operand(implicit_plus(parse_operand(parser)?))?;
                    } else {
                        builder.push_operand(apply_prefixes(prefixes, parse_operand(parser)?))?;
                    }
                }
                _ => return Err(parser.unexpected_token("expected an operand")),
            }
        } else if is_binary_operator(kind) {
            let operator = parser.advance();
            trace!(operator = %operator.value, "binary operator");
            builder.push_operator(operator)?;
        } else {
            return Err(match kind {
                TokenKind::CloseParen | TokenKind::Semicolon => unmatched_paren(parser.current_token()),
                _ => parser.unexpected_token("expected an operator"),
            });
        }
    }

    if let Some(group) = groups.last() {
        return Err(unmatched_paren(&group.open));
    }

    builder.finish(parser.current_token())
}

fn take_prefixes(parser: &mut Parser) -> Vec<Token> {
    let mut prefixes = vec![];
    while is_prefix_operator(parser.current_token_kind()) {
        prefixes.push(parser.advance());
    }

    prefixes
}

/// Wraps `operand` in explicit unary nodes, the last prefix innermost.
fn apply_prefixes(prefixes: Vec<Token>, operand: Expr) -> Expr {
    prefixes.into_iter().rev().fold(operand, |operand, operator| {
        Expr::Unary(UnaryExpr {
            span: operator.span.to(operand.get_span()),
            operator,
            operand: Box::new(operand),
            implicit: false,
        })
    })
}

fn implicit_plus(operand: Expr) -> Expr {
    let span = operand.get_span().clone();

    Expr::Unary(UnaryExpr {
        operator: Token::implicit_plus(span.start.clone()),
        operand: Box::new(operand),
        implicit: true,
        span,
    })
}

fn parse_operand(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => {
            let token = parser.advance();
            let mut identifier = IdentifierExpr {
                name: token.value,
                resolved: None,
                span: token.span,
            };

            resolve(parser, &mut identifier);
            Ok(Expr::Identifier(identifier))
        }
        TokenKind::Int => {
            if parser.current_token().value.parse::<i64>().is_err() {
                return Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ));
            }

            Ok(literal(parser.advance()))
        }
        TokenKind::Float
        | TokenKind::String
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Null => Ok(literal(parser.advance())),
        _ => Err(parser.unexpected_token("expected a literal or identifier")),
    }
}

fn literal(token: Token) -> Expr {
    Expr::Literal(LiteralExpr {
        kind: token.kind,
        value: token.value,
        span: token.span,
    })
}

/// Binds `identifier` to the value of its nearest visible declaration.
fn resolve(parser: &Parser, identifier: &mut IdentifierExpr) {
    if identifier.is_discard() {
        return;
    }

    identifier.resolved = parser
        .scopes()
        .lookup(&identifier.name)
        .and_then(Stmt::bound_value);

    trace!(
        name = %identifier.name,
        resolved = identifier.resolved.is_some(),
        "resolved identifier"
    );
}

fn unmatched_paren(token: &Token) -> Error {
    Error::new(
        ErrorImpl::UnmatchedParen {
            token: token.value.clone(),
        },
        token.span.start.clone(),
    )
}
