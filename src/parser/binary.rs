//! The precedence-climbing state machine behind `parse_binary_expr`.
//!
//! Operands and operators are fed in source order. The machine keeps two slots:
//!
//! - `building`: the binary node being filled at the current precedence level
//! - `parked`: lower-precedence nodes that already have a left operand and an
//!   operator and are waiting for their right operand, innermost last
//!
//! When the terminator is reached, [`BinaryBuilder::finish`] closes `building`
//! and hands the result to every parked node in turn.

use crate::{
    ast::{ast::Expr, expressions::BinaryExpr},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::lookups::{precedence, LOWEST_PREC};

/// A binary node under construction.
#[derive(Debug, Default)]
pub struct PartialBinaryExpr {
    pub left: Option<Expr>,
    pub operator: Option<Token>,
    pub right: Option<Expr>,
}

impl PartialBinaryExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_left(left: Expr) -> Self {
        PartialBinaryExpr {
            left: Some(left),
            operator: None,
            right: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.operator.is_none() && self.right.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.left.is_some()
            && self.operator.as_ref().is_some_and(|operator| operator.kind.is_operator())
            && self.right.is_some()
    }

    /// True while the next thing in the input has to be an operand.
    pub fn expects_operand(&self) -> bool {
        self.left.is_none() || (self.operator.is_some() && self.right.is_none())
    }

    pub fn expects_operator(&self) -> bool {
        self.left.is_some() && self.operator.is_none()
    }

    pub fn precedence(&self) -> u8 {
        self.operator
            .as_ref()
            .map(|operator| precedence(operator.kind))
            .unwrap_or(LOWEST_PREC)
    }

    /// Fills the first empty operand slot.
    ///
    /// A third operand means the state machine went wrong, not the input.
    pub fn add_child(&mut self, child: Expr) -> Result<(), Error> {
        if self.left.is_none() {
            self.left = Some(child);
            Ok(())
        } else if self.right.is_none() {
            self.right = Some(child);
            Ok(())
        } else {
            Err(Error::new(
                ErrorImpl::BinaryNodeFull,
                child.get_span().start.clone(),
            ))
        }
    }

    pub fn set_operator(&mut self, operator: Token) -> Result<(), Error> {
        if self.operator.is_some() {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: operator.value,
                    message: String::from("expected an operand"),
                },
                operator.span.start,
            ));
        }

        self.operator = Some(operator);
        Ok(())
    }

    /// Converts the node into an expression.
    ///
    /// A node holding only a left operand stands for that operand. Anything
    /// else short of complete is reported against `at`.
    pub fn close(self, at: &Token) -> Result<Expr, Error> {
        match (self.left, self.operator, self.right) {
            (Some(left), Some(operator), Some(right)) => Ok(Expr::Binary(BinaryExpr {
                span: left.get_span().to(right.get_span()),
                left: Box::new(left),
                operator,
                right: Box::new(right),
            })),
            (Some(left), None, None) => Ok(left),
            _ => Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: at.value.clone(),
                    message: String::from("expected an operand"),
                },
                at.span.start.clone(),
            )),
        }
    }
}

#[derive(Debug, Default)]
pub struct BinaryBuilder {
    building: PartialBinaryExpr,
    parked: Vec<PartialBinaryExpr>,
}

impl BinaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn building(&self) -> &PartialBinaryExpr {
        &self.building
    }

    pub fn parked(&self) -> &[PartialBinaryExpr] {
        &self.parked
    }

    pub fn expects_operand(&self) -> bool {
        self.building.expects_operand()
    }

    pub fn push_operand(&mut self, operand: Expr) -> Result<(), Error> {
        self.building.add_child(operand)
    }

    pub fn push_operator(&mut self, operator: Token) -> Result<(), Error> {
        if !self.building.is_complete() {
            return self.building.set_operator(operator);
        }

        if precedence(operator.kind) > self.building.precedence() {
            self.park(operator);
            Ok(())
        } else {
            self.shift(operator)
        }
    }

    /// `a + b` followed by `*`: park `a +`, keep building `b * _`.
    fn park(&mut self, operator: Token) {
        let PartialBinaryExpr {
            left,
            operator: parked_operator,
            right,
        } = std::mem::take(&mut self.building);

        self.parked.push(PartialBinaryExpr {
            left,
            operator: parked_operator,
            right: None,
        });
        self.building = PartialBinaryExpr {
            left: right,
            operator: Some(operator),
            right: None,
        };
    }

    /// Closes `building`, re-attaches every parked node that binds at least as
    /// tightly as `operator`, and makes the result the left operand of `operator`.
    fn shift(&mut self, operator: Token) -> Result<(), Error> {
        let incoming = precedence(operator.kind);
        let mut complete = std::mem::take(&mut self.building).close(&operator)?;

        while let Some(mut parked) = self.parked.pop() {
            if parked.precedence() < incoming {
                self.parked.push(parked);
                break;
            }

            parked.add_child(complete)?;
            complete = parked.close(&operator)?;
        }

        self.building = PartialBinaryExpr {
            left: Some(complete),
            operator: Some(operator),
            right: None,
        };
        Ok(())
    }

    /// Terminator reached: close the current node and unwind every parked one.
    ///
    /// `at` is the token that ended the expression, used for error positions.
    pub fn finish(mut self, at: &Token) -> Result<Expr, Error> {
        let mut complete = self.building.close(at)?;

        while let Some(mut parked) = self.parked.pop() {
            parked.add_child(complete)?;
            complete = parked.close(at)?;
        }

        Ok(complete)
    }
}
