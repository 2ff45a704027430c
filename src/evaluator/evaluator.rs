//! Reference evaluator.
//!
//! Walks a parsed tree and computes its numeric value. Identifiers were bound
//! to their declarations while parsing, so no scope is needed here.

use std::{cmp::Ordering, collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{BinaryExpr, LiteralExpr, UnaryExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::number::Number;

/// What running one statement produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Name bound by the statement, if any
    pub identifier: Option<String>,
    pub value: Option<Number>,
}

/// Work left over on the way back up the tree.
enum Step<'a> {
    Unary(&'a UnaryExpr),
    /// Left operand is on its way; the right one is still to do
    Right(&'a BinaryExpr),
    Apply(&'a BinaryExpr, Number),
    /// Right operand of `&&` or `||`
    Truth,
    /// Value of a resolved declaration, kept for the other identifiers bound to it
    Remember(*const Expr),
}

/// Computes the value of `expr`.
///
/// The tree is walked with an explicit stack, so depth is bounded only by
/// memory. A declaration shared by several identifiers is evaluated once.
pub fn evaluate(expr: &Expr) -> Result<Number, Error> {
    let mut known: HashMap<*const Expr, Number> = HashMap::new();
    let mut steps: Vec<Step> = vec![];
    let mut next = expr;

    loop {
        let mut value = loop {
            match next {
                Expr::Literal(literal) => break evaluate_literal(literal)?,
                Expr::Identifier(identifier) => {
                    let Some(resolved) = &identifier.resolved else {
                        return Err(Error::new(
                            ErrorImpl::VariableNotDeclared {
                                variable: identifier.name.clone(),
                            },
                            identifier.span.start.clone(),
                        ));
                    };

                    let key = Rc::as_ptr(resolved);
                    if let Some(value) = known.get(&key) {
                        break *value;
                    }

                    steps.push(Step::Remember(key));
                    next = &**resolved;
                }
                Expr::Unary(unary) => {
                    steps.push(Step::Unary(unary));
                    next = &*unary.operand;
                }
                Expr::Binary(binary) => {
                    steps.push(Step::Right(binary));
                    next = &*binary.left;
                }
                Expr::Paren(paren) => next = &*paren.inner,
            }
        };

        loop {
            match steps.pop() {
                None => return Ok(value),
                Some(Step::Unary(unary)) => value = apply_unary(unary, value)?,
                Some(Step::Apply(binary, left)) => value = apply_binary(&binary.operator, left, value)?,
                Some(Step::Truth) => value = Number::from_bool(value.is_truthy()),
                Some(Step::Remember(key)) => {
                    known.insert(key, value);
                }
                Some(Step::Right(binary)) => {
                    // Logical operators short-circuit
                    let pending = match binary.operator.kind {
                        TokenKind::And if !value.is_truthy() => None,
                        TokenKind::Or if value.is_truthy() => None,
                        TokenKind::And | TokenKind::Or => Some(Step::Truth),
                        _ => Some(Step::Apply(binary, value)),
                    };

                    match pending {
                        Some(step) => {
                            steps.push(step);
                            next = &*binary.right;
                            break;
                        }
                        None => value = Number::from_bool(binary.operator.kind == TokenKind::Or),
                    }
                }
            }
        }
    }
}

fn evaluate_literal(literal: &LiteralExpr) -> Result<Number, Error> {
    let not_a_number = || {
        Error::new(
            ErrorImpl::NotANumber {
                value: literal.to_string(),
            },
            literal.span.start.clone(),
        )
    };

    match literal.kind {
        TokenKind::Int => literal.value.parse().map(Number::Int).map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: literal.value.clone(),
                },
                literal.span.start.clone(),
            )
        }),
        TokenKind::Float => literal.value.parse().map(Number::Float).map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: literal.value.clone(),
                },
                literal.span.start.clone(),
            )
        }),
        TokenKind::True => Ok(Number::Int(1)),
        TokenKind::False => Ok(Number::Int(0)),
        _ => Err(not_a_number()),
    }
}

fn apply_unary(unary: &UnaryExpr, operand: Number) -> Result<Number, Error> {
    match (unary.operator.kind, operand) {
        (TokenKind::Plus, value) => Ok(value),
        (TokenKind::Dash, Number::Int(value)) => Ok(Number::Int(value.wrapping_neg())),
        (TokenKind::Dash, Number::Float(value)) => Ok(Number::Float(-value)),
        (TokenKind::Not, value) => Ok(Number::from_bool(!value.is_truthy())),
        (TokenKind::Caret, Number::Int(value)) => Ok(Number::Int(!value)),
        _ => Err(unsupported(&unary.operator)),
    }
}

fn apply_binary(operator: &Token, left: Number, right: Number) -> Result<Number, Error> {
    match operator.kind {
        TokenKind::Plus => Ok(arithmetic(left, right, i64::wrapping_add, |a, b| a + b)),
        TokenKind::Dash => Ok(arithmetic(left, right, i64::wrapping_sub, |a, b| a - b)),
        TokenKind::Star => Ok(arithmetic(left, right, i64::wrapping_mul, |a, b| a * b)),
        TokenKind::Slash | TokenKind::Percent => {
            if right.is_zero() {
                return Err(Error::new(
                    ErrorImpl::DivisionByZero,
                    operator.span.start.clone(),
                ));
            }

            Ok(match operator.kind {
                TokenKind::Slash => arithmetic(left, right, i64::wrapping_div, |a, b| a / b),
                _ => arithmetic(left, right, i64::wrapping_rem, |a, b| a % b),
            })
        }
        TokenKind::Equals
        | TokenKind::NotEquals
        | TokenKind::Less
        | TokenKind::LessEquals
        | TokenKind::Greater
        | TokenKind::GreaterEquals => {
            let ordering = compare(left, right);
            let result = match operator.kind {
                TokenKind::Equals => ordering == Some(Ordering::Equal),
                TokenKind::NotEquals => ordering != Some(Ordering::Equal),
                TokenKind::Less => ordering == Some(Ordering::Less),
                TokenKind::LessEquals => {
                    matches!(ordering, Some(Ordering::Less | Ordering::Equal))
                }
                TokenKind::Greater => ordering == Some(Ordering::Greater),
                _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            };

            Ok(Number::from_bool(result))
        }
        _ => match (left, right) {
            (Number::Int(left), Number::Int(right)) => bitwise(operator, left, right),
            _ => Err(unsupported(operator)),
        },
    }
}

fn arithmetic(
    left: Number,
    right: Number,
    int: fn(i64, i64) -> i64,
    float: fn(f64, f64) -> f64,
) -> Number {
    match (left, right) {
        (Number::Int(left), Number::Int(right)) => Number::Int(int(left, right)),
        _ => Number::Float(float(left.as_f64(), right.as_f64())),
    }
}

fn compare(left: Number, right: Number) -> Option<Ordering> {
    match (left, right) {
        (Number::Int(left), Number::Int(right)) => Some(left.cmp(&right)),
        _ => left.as_f64().partial_cmp(&right.as_f64()),
    }
}

fn bitwise(operator: &Token, left: i64, right: i64) -> Result<Number, Error> {
    let value = match operator.kind {
        TokenKind::Ampersand => left & right,
        TokenKind::Pipe => left | right,
        TokenKind::Caret => left ^ right,
        TokenKind::AndNot => left & !right,
        TokenKind::ShiftLeft | TokenKind::ShiftRight => {
            let Ok(shift) = u32::try_from(right) else {
                return Err(unsupported(operator));
            };

            if operator.kind == TokenKind::ShiftLeft {
                left.checked_shl(shift).unwrap_or(0)
            } else {
                left.checked_shr(shift).unwrap_or(if left < 0 { -1 } else { 0 })
            }
        }
        _ => return Err(unsupported(operator)),
    };

    Ok(Number::Int(value))
}

fn unsupported(operator: &Token) -> Error {
    Error::new(
        ErrorImpl::UnsupportedOperator {
            operator: operator.value.clone(),
        },
        operator.span.start.clone(),
    )
}

/// Runs one statement.
///
/// Function bodies are not run; a block's value is that of the last `return`
/// reached inside it.
pub fn run_statement(stmt: &Stmt) -> Result<Outcome, Error> {
    let outcome = match stmt {
        Stmt::VarDecl(decl) => Outcome {
            identifier: Some(decl.identifier.clone()),
            value: Some(evaluate(&decl.value)?),
        },
        Stmt::Expression(expression) => Outcome {
            identifier: None,
            value: Some(evaluate(&expression.expression)?),
        },
        Stmt::Return(ret) => Outcome {
            identifier: None,
            value: ret.value.as_ref().map(evaluate).transpose()?,
        },
        Stmt::Block(block) => {
            let mut value = None;
            for stmt in block.iter() {
                let outcome = run_statement(stmt)?;
                if matches!(stmt, Stmt::Return(_) | Stmt::Block(_)) && outcome.value.is_some() {
                    value = outcome.value;
                }
            }

            Outcome {
                identifier: None,
                value,
            }
        }
        Stmt::FnDecl(function) => Outcome {
            identifier: Some(function.identifier.clone()),
            value: None,
        },
    };

    debug!(
        identifier = outcome.identifier.as_deref().unwrap_or(""),
        value = %outcome.value.map(|value| value.to_string()).unwrap_or_default(),
        "ran statement"
    );

    Ok(outcome)
}

/// Runs every top-level statement in order, stopping at the first error.
pub fn run_program(program: &Program) -> Result<Vec<Outcome>, Error> {
    program.iter().map(run_statement).collect()
}
