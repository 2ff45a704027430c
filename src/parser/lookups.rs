use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{ast::ast::Stmt, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, stmt::*};

/// Operator precedence bands, lowest first. The discriminant is the band number.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum BindingPower {
    Default = 0,
    LogicalOr = 1,
    LogicalAnd = 2,
    Relational = 3,
    Additive = 4,
    Multiplicative = 5,
    Unary = 6,
}

pub const LOWEST_PREC: u8 = BindingPower::Default as u8;
/// Prefix operators bind tighter than every binary band.
pub const UNARY_PREC: u8 = BindingPower::Unary as u8;

lazy_static! {
    static ref BP_LOOKUP: HashMap<TokenKind, BindingPower> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Or, BindingPower::LogicalOr);
        map.insert(TokenKind::And, BindingPower::LogicalAnd);

        // Relational
        map.insert(TokenKind::Equals, BindingPower::Relational);
        map.insert(TokenKind::NotEquals, BindingPower::Relational);
        map.insert(TokenKind::Less, BindingPower::Relational);
        map.insert(TokenKind::LessEquals, BindingPower::Relational);
        map.insert(TokenKind::Greater, BindingPower::Relational);
        map.insert(TokenKind::GreaterEquals, BindingPower::Relational);

        // Additive and multiplicative
        map.insert(TokenKind::Plus, BindingPower::Additive);
        map.insert(TokenKind::Dash, BindingPower::Additive);
        map.insert(TokenKind::Pipe, BindingPower::Additive);
        map.insert(TokenKind::Caret, BindingPower::Additive);
        map.insert(TokenKind::Star, BindingPower::Multiplicative);
        map.insert(TokenKind::Slash, BindingPower::Multiplicative);
        map.insert(TokenKind::Percent, BindingPower::Multiplicative);
        map.insert(TokenKind::ShiftLeft, BindingPower::Multiplicative);
        map.insert(TokenKind::ShiftRight, BindingPower::Multiplicative);
        map.insert(TokenKind::Ampersand, BindingPower::Multiplicative);
        map.insert(TokenKind::AndNot, BindingPower::Multiplicative);
        map
    };
}

pub fn binding_power(kind: TokenKind) -> BindingPower {
    BP_LOOKUP.get(&kind).copied().unwrap_or(BindingPower::Default)
}

/// Precedence band of `kind` as a binary operator; 0 for anything else.
pub fn precedence(kind: TokenKind) -> u8 {
    binding_power(kind) as u8
}

pub fn is_operator(kind: TokenKind) -> bool {
    kind.is_operator()
}

/// Operators that may appear between two operands.
pub fn is_binary_operator(kind: TokenKind) -> bool {
    (LOWEST_PREC + 1..UNARY_PREC).contains(&precedence(kind))
}

/// Operators that may start an operand: `+ - ! ^ &`.
pub fn is_prefix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus | TokenKind::Dash | TokenKind::Not | TokenKind::Caret | TokenKind::Ampersand
    )
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.stmt(TokenKind::Let, parse_var_decl_stmt);
    parser.stmt(TokenKind::Const, parse_var_decl_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::Func, parse_fn_decl_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
