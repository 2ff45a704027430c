use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::UnmatchedParen { .. } => "UnmatchedParen",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::ConstReassignment { .. } => "ConstReassignment",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::NotANumber { .. } => "NotANumber",
            ErrorImpl::UnsupportedOperator { .. } => "UnsupportedOperator",
            ErrorImpl::BinaryNodeFull => "BinaryNodeFull",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, no statement starts with it",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::UnmatchedParen { token } => ErrorTip::Suggestion(format!(
                "Parentheses do not balance near `{}`",
                token
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::ConstReassignment { variable } => ErrorTip::Suggestion(format!(
                "Constant `{}` cannot be reassigned in the same scope",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::DivisionByZero => ErrorTip::Suggestion(String::from(
                "The right hand side of `/` or `%` evaluated to zero",
            )),
            ErrorImpl::NotANumber { value } => ErrorTip::Suggestion(format!(
                "`{}` cannot be used as a number",
                value
            )),
            ErrorImpl::UnsupportedOperator { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` is not supported here",
                operator
            )),
            ErrorImpl::BinaryNodeFull => ErrorTip::Suggestion(String::from(
                "Internal parser error: a binary expression already has two operands",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("unmatched parenthesis near {token:?}")]
    UnmatchedParen { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("const {variable:?} cannot be reassigned")]
    ConstReassignment { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{value:?} is not a number")]
    NotANumber { value: String },
    #[error("unsupported operator {operator:?}")]
    UnsupportedOperator { operator: String },
    #[error("binary expression node is full")]
    BinaryNodeFull,
}
